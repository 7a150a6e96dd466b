//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The analysis endpoint answered with a non-success HTTP status.
    #[error("HTTP error! status: {status}")]
    Transport { status: u16, body: String },

    /// The analysis endpoint answered, but not with a successful envelope.
    #[error("Invalid response format: {0}")]
    Format(String),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Not an image: {0}")]
    NotAnImage(String),

    #[error("Camera capture error: {0}")]
    Capture(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

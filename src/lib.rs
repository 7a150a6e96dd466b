//! Hill Calories AI - meal nutrition from one photo
//!
//! Sends a meal photo to an external analysis webhook and renders the
//! estimated calories, macros and per-item breakdown it returns.

pub mod analysis;
pub mod app;
pub mod error;
pub mod input;
pub mod models;
pub mod notify;
pub mod photo;
pub mod session;
pub mod views;

pub use error::{Error, Result};

use super::{CameraCapture, Photo, PhotoTrigger};
use crate::input::Prompt;
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Terminal-backed upload surface: the file picker reads a path from the
/// prompt and the camera delegates to [`CameraCapture`].
pub struct PhotoPicker {
    camera: CameraCapture,
    prompt: Arc<Prompt>,
}

impl PhotoPicker {
    pub fn new(camera: CameraCapture, prompt: Arc<Prompt>) -> Self {
        Self { camera, prompt }
    }

    /// Load the photo a terminal drop (or a typed path) refers to. Only the
    /// first file is used when several were dropped at once.
    pub async fn from_drop(text: &str) -> Result<Option<Photo>> {
        match parse_dropped_path(text) {
            Some(path) => Ok(Some(Photo::from_path(&path).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PhotoTrigger for PhotoPicker {
    async fn open_camera(&self) -> Result<Photo> {
        self.camera.capture().await
    }

    async fn open_file_picker(&self) -> Result<Option<Photo>> {
        match self.prompt.next_line().await? {
            Some(line) => Self::from_drop(&line).await,
            None => Ok(None),
        }
    }
}

/// Normalize what a terminal pastes when a file is dropped onto it.
///
/// Handles single or double quoting, backslash-escaped spaces and `file://`
/// URLs. Returns the first path only.
pub fn parse_dropped_path(text: &str) -> Option<PathBuf> {
    let text = text.trim();
    let mut chars = text.chars();
    let first = chars.next()?;

    let token = if first == '\'' || first == '"' {
        let rest = chars.as_str();
        match rest.find(first) {
            Some(end) => rest[..end].to_string(),
            None => rest.to_string(),
        }
    } else {
        let mut token = String::new();
        let mut escaped = false;
        for c in text.chars() {
            if escaped {
                token.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c.is_whitespace() {
                break;
            } else {
                token.push(c);
            }
        }
        token
    };

    if token.is_empty() {
        return None;
    }

    if token.starts_with("file://") {
        return reqwest::Url::parse(&token)
            .ok()
            .and_then(|url| url.to_file_path().ok());
    }

    Some(PathBuf::from(token))
}

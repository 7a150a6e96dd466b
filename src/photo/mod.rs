//! Photo capture and selection
//!
//! A meal photo arrives through one of three doors: the file picker, a path
//! dropped onto the terminal, or a single still frame grabbed from a camera.
//! All of them end up as one [`Photo`] handed to the session.

pub mod camera;
pub mod mime;
pub mod mock;
pub mod picker;
pub mod preview;

pub use camera::CameraCapture;
pub use mock::MockPhotoTrigger;
pub use picker::{parse_dropped_path, PhotoPicker};
pub use preview::Preview;

use crate::{Error, Result};
use async_trait::async_trait;
use std::path::Path;

/// An image selected for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    file_name: String,
    mime: &'static str,
    bytes: Vec<u8>,
}

impl Photo {
    /// Wrap raw bytes, refusing anything that does not sniff as an image.
    /// An empty name is replaced by `photo.<ext>`.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let mut file_name = file_name.into();
        let mime = mime::detect_image_mime(&bytes)
            .ok_or_else(|| Error::NotAnImage(file_name.clone()))?;
        if file_name.trim().is_empty() {
            file_name = format!("photo.{}", mime::extension_for(mime));
        }
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_bytes(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The two actions the upload surface exposes to callers outside it, such as
/// the hero call-to-action.
#[async_trait]
pub trait PhotoTrigger: Send + Sync {
    async fn open_camera(&self) -> Result<Photo>;

    /// `Ok(None)` when the picker was dismissed without a choice.
    async fn open_file_picker(&self) -> Result<Option<Photo>>;
}

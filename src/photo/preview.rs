use super::Photo;
use crate::{Error, Result};
use image::ImageFormat;
use std::path::Path;
use tempfile::TempPath;

const PREVIEW_MAX_EDGE: u32 = 320;

/// A downscaled JPEG thumbnail of the selected photo, kept in a temporary
/// file for as long as the photo is pending.
///
/// The file is removed when the preview is released or dropped.
#[derive(Debug)]
pub struct Preview {
    path: TempPath,
    width: u32,
    height: u32,
}

impl Preview {
    fn render_sync(bytes: Vec<u8>) -> Result<Self> {
        let img = image::load_from_memory(&bytes)?;
        let thumb = img.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE).to_rgb8();

        let mut file = tempfile::Builder::new()
            .prefix("meal-preview-")
            .suffix(".jpg")
            .tempfile()?;
        thumb.write_to(file.as_file_mut(), ImageFormat::Jpeg)?;

        Ok(Self {
            width: thumb.width(),
            height: thumb.height(),
            path: file.into_temp_path(),
        })
    }

    pub async fn create(photo: &Photo) -> Result<Self> {
        let bytes = photo.bytes().to_vec();
        tokio::task::spawn_blocking(move || Self::render_sync(bytes))
            .await
            .map_err(|e| Error::InvalidState(format!("preview task join error: {}", e)))?
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Delete the backing file now rather than on drop, surfacing any error.
    pub fn release(self) -> Result<()> {
        let released = self.path.display().to_string();
        self.path.close()?;
        tracing::debug!("Released preview {}", released);
        Ok(())
    }
}

use super::Photo;
use crate::{Error, Result};
use chrono::Local;
use image::ImageFormat;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Grabs one still frame by running an external capture command.
///
/// The command template is split on whitespace and `{output}` is replaced by
/// the path the frame must be written to. Whatever format the tool writes,
/// the frame is decoded and re-encoded as JPEG before it becomes a [`Photo`].
pub struct CameraCapture {
    command_template: String,
}

impl CameraCapture {
    pub fn new(command_template: String) -> Self {
        Self { command_template }
    }

    fn command_line(&self, output: &Path) -> Result<Vec<String>> {
        let output = output.to_string_lossy();
        let argv: Vec<String> = self
            .command_template
            .split_whitespace()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
            .collect();

        if argv.is_empty() {
            return Err(Error::Capture("camera command is empty".to_string()));
        }
        if !self.command_template.contains(OUTPUT_PLACEHOLDER) {
            return Err(Error::Capture(format!(
                "camera command has no {} placeholder",
                OUTPUT_PLACEHOLDER
            )));
        }
        Ok(argv)
    }

    fn encode_still(raw: &[u8]) -> Result<Vec<u8>> {
        let frame = image::load_from_memory(raw)?;
        let mut jpeg = Vec::new();
        frame
            .to_rgb8()
            .write_to(&mut std::io::Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;
        Ok(jpeg)
    }

    pub async fn capture(&self) -> Result<Photo> {
        let dir = tempfile::tempdir()?;
        let frame_path = dir.path().join("frame");
        let argv = self.command_line(&frame_path)?;

        tracing::info!("Capturing still frame with `{}`", argv[0]);
        let output = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Capture(format!("failed to run `{}`: {}", argv[0], e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("Camera command failed ({}): {}", output.status, stderr.trim());
            return Err(Error::Capture(format!(
                "`{}` exited with {}",
                argv[0], output.status
            )));
        }

        let raw = match tokio::fs::read(&frame_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::Capture(
                    "camera command did not produce a frame".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        let jpeg = tokio::task::spawn_blocking(move || Self::encode_still(&raw))
            .await
            .map_err(|e| Error::Capture(format!("frame encoding task join error: {}", e)))??;

        let file_name = format!("capture-{}.jpg", Local::now().format("%Y%m%d-%H%M%S"));
        tracing::debug!("Captured {} ({} bytes)", file_name, jpeg.len());
        Photo::from_bytes(file_name, jpeg)
    }
}

use super::{parse_envelope, AnalysisService};
use crate::models::NutritionData;
use crate::photo::Photo;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// Multipart field the webhook reads the photo from.
const IMAGE_FIELD: &str = "image";

/// Posts photos to the configured analysis webhook. One attempt per call; no
/// client-side timeout is applied.
pub struct WebhookAnalysisClient {
    client: Client,
    endpoint: String,
}

impl WebhookAnalysisClient {
    pub fn new(endpoint: String) -> Self {
        Self::new_with_client(endpoint, Client::new())
    }

    pub fn new_with_client(endpoint: String, client: Client) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(photo: &Photo) -> Result<Form> {
        let part = Part::bytes(photo.bytes().to_vec())
            .file_name(photo.file_name().to_string())
            .mime_str(photo.mime())?;
        Ok(Form::new().part(IMAGE_FIELD, part))
    }
}

#[async_trait]
impl AnalysisService for WebhookAnalysisClient {
    async fn analyze(&self, photo: &Photo) -> Result<NutritionData> {
        tracing::debug!(
            "Uploading {} ({} bytes, {}) to {}",
            photo.file_name(),
            photo.len(),
            photo.mime(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(Self::build_form(photo)?)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send photo to analysis webhook: {}", e);
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Analysis webhook error (status {}): {}", status, body);
            return Err(Error::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let data = parse_envelope(&body).map_err(|e| {
            tracing::error!("Rejected analysis response: {}\nBody: {}", e, body);
            e
        })?;

        tracing::info!(
            "Analysis returned {} food items, {} calories",
            data.food.len(),
            data.total.calories
        );
        Ok(data)
    }
}

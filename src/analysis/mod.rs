//! Meal analysis through the external nutrition webhook
//!
//! One photo goes out as a multipart upload, one validated
//! [`NutritionData`] comes back, or the call fails.

pub mod client;
pub mod mock;

pub use client::WebhookAnalysisClient;
pub use mock::{MockAnalysisClient, MockOutcome};

use crate::models::{is_success_status, NutritionData, WebhookResponse};
use crate::photo::Photo;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, photo: &Photo) -> Result<NutritionData>;
}

/// Validate a webhook body and extract its payload.
///
/// The body must be a JSON object whose `output` object reports
/// `status: "success"`. Array-wrapped bodies are rejected rather than
/// unwrapped.
pub fn parse_envelope(body: &str) -> Result<NutritionData> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::Format(format!("body is not JSON: {}", e)))?;

    let envelope = match &value {
        Value::Object(map) => map,
        Value::Array(_) => {
            return Err(Error::Format(
                "expected an object with an `output` field, got an array".to_string(),
            ))
        }
        other => {
            return Err(Error::Format(format!(
                "expected an object with an `output` field, got {}",
                other
            )))
        }
    };

    let output = envelope
        .get("output")
        .ok_or_else(|| Error::Format("missing `output` field".to_string()))?;

    // Status first, so a failed analysis is not reported as a missing field.
    let status = output.get("status").and_then(Value::as_str);
    if !status.is_some_and(is_success_status) {
        return Err(Error::Format(format!(
            "analysis status was {}",
            status.unwrap_or("missing")
        )));
    }

    let response: WebhookResponse = serde_json::from_value(value)
        .map_err(|e| Error::Format(format!("malformed nutrition payload: {}", e)))?;
    response.output.validate()?;
    Ok(response.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apple_body() -> Value {
        json!({
            "output": {
                "status": "success",
                "food": [{
                    "name": "Apple",
                    "quantity": "1 medium",
                    "calories": 95,
                    "protein": 0.5,
                    "carbs": 25,
                    "fat": 0.3
                }],
                "total": { "calories": 95, "protein": 0.5, "carbs": 25, "fat": 0.3 }
            }
        })
    }

    #[test]
    fn test_parse_success_envelope() {
        let data = parse_envelope(&apple_body().to_string()).unwrap();
        assert_eq!(data.food.len(), 1);
        assert_eq!(data.food[0].name, "Apple");
        assert_eq!(data.total.calories, 95.0);
        assert_eq!(data.total.carbs, 25.0);
    }

    #[test]
    fn test_parse_keeps_confidence() {
        let mut body = apple_body();
        body["output"]["confidence"] = json!(0.87);
        let data = parse_envelope(&body.to_string()).unwrap();
        assert_eq!(data.confidence, Some(0.87));
    }

    #[test]
    fn test_error_status_is_format_failure() {
        let err = parse_envelope(r#"{"output":{"status":"error"}}"#).unwrap_err();
        assert!(matches!(err, Error::Format(msg) if msg.contains("error")));
    }

    #[test]
    fn test_status_match_is_case_sensitive() {
        let mut body = apple_body();
        body["output"]["status"] = json!("Success");
        let err = parse_envelope(&body.to_string()).unwrap_err();
        assert!(matches!(err, Error::Format(msg) if msg.contains("Success")));
    }

    #[test]
    fn test_non_string_status_is_format_failure() {
        let mut body = apple_body();
        body["output"]["status"] = json!(true);
        assert!(matches!(
            parse_envelope(&body.to_string()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_missing_status_is_format_failure() {
        let err = parse_envelope(
            r#"{"output":{"food":[],"total":{"calories":0,"protein":0,"carbs":0,"fat":0}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Format(msg) if msg.contains("missing")));
    }

    #[test]
    fn test_array_wrapped_body_is_rejected() {
        let body = json!([apple_body()]).to_string();
        let err = parse_envelope(&body).unwrap_err();
        assert!(matches!(err, Error::Format(msg) if msg.contains("array")));
    }

    #[test]
    fn test_missing_output_is_rejected() {
        let err = parse_envelope(r#"{"status":"success"}"#).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_non_json_is_rejected() {
        let err = parse_envelope("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_missing_total_is_rejected() {
        let err = parse_envelope(r#"{"output":{"status":"success","food":[]}}"#).unwrap_err();
        assert!(matches!(err, Error::Format(msg) if msg.contains("malformed")));
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let mut body = apple_body();
        body["output"]["total"]["protein"] = json!(-2);
        assert!(matches!(
            parse_envelope(&body.to_string()),
            Err(Error::Format(_))
        ));
    }
}

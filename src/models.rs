//! Data models and structures
//!
//! Defines the nutrition payload returned by the analysis webhook and the
//! runtime configuration read from the environment.

use serde::{Deserialize, Serialize};

/// Status value the webhook reports for a completed analysis.
pub const SUCCESS_STATUS: &str = "success";

pub const DEFAULT_WEBHOOK_URL: &str = "http://localhost:5678/webhook-test/meal-ai";
pub const DEFAULT_CAMERA_COMMAND: &str = "fswebcam --no-banner -r 1280x720 {output}";

/// One recognized food in the photo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub name: String,
    /// Free-text portion description, e.g. "1 cup".
    pub quantity: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Aggregate values across every item of one analysis, as reported by the
/// service. Not reconciled against the per-item sum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionData {
    pub status: String,
    #[serde(default)]
    pub food: Vec<FoodItem>,
    pub total: NutritionTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// The one test for a successful analysis status. Case-sensitive.
pub fn is_success_status(status: &str) -> bool {
    status == SUCCESS_STATUS
}

impl NutritionData {
    /// Check that every reported quantity is a finite, non-negative number.
    pub fn validate(&self) -> crate::Result<()> {
        check_amounts("total", &totals_fields(&self.total))?;
        for item in &self.food {
            check_amounts(
                &item.name,
                &[
                    ("calories", item.calories),
                    ("protein", item.protein),
                    ("carbs", item.carbs),
                    ("fat", item.fat),
                ],
            )?;
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(crate::Error::Format(format!(
                    "confidence {} outside 0..=1",
                    confidence
                )));
            }
        }
        Ok(())
    }
}

fn totals_fields(total: &NutritionTotals) -> [(&'static str, f64); 4] {
    [
        ("calories", total.calories),
        ("protein", total.protein),
        ("carbs", total.carbs),
        ("fat", total.fat),
    ]
}

fn check_amounts(owner: &str, fields: &[(&str, f64)]) -> crate::Result<()> {
    for (field, value) in fields {
        if !value.is_finite() || *value < 0.0 {
            return Err(crate::Error::Format(format!(
                "{}: {} must be a non-negative number, got {}",
                owner, field, value
            )));
        }
    }
    Ok(())
}

/// Transport envelope returned by the webhook. Only `output` is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub output: NutritionData,
}

// Configuration
fn with_endpoint<F>(lookup: F, endpoint: Option<String>) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    move |key| match (key, &endpoint) {
        ("MEAL_WEBHOOK_URL", Some(url)) => Some(url.clone()),
        _ => lookup(key),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: String,
    pub camera_command: String,
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        Self::from_env_with_endpoint(None)
    }

    /// Like [`Config::from_env`], but an explicit endpoint replaces
    /// MEAL_WEBHOOK_URL before anything is validated.
    pub fn from_env_with_endpoint(endpoint: Option<String>) -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(with_endpoint(|key| std::env::var(key).ok(), endpoint))
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_url = match lookup("MEAL_WEBHOOK_URL") {
            Some(url) => url,
            None => {
                tracing::warn!(
                    "MEAL_WEBHOOK_URL not set, using local development endpoint {}",
                    DEFAULT_WEBHOOK_URL
                );
                DEFAULT_WEBHOOK_URL.to_string()
            }
        };
        reqwest::Url::parse(&webhook_url).map_err(|e| {
            crate::Error::Config(format!(
                "MEAL_WEBHOOK_URL '{}' is invalid: {}",
                webhook_url, e
            ))
        })?;

        let camera_command = lookup("MEAL_CAMERA_COMMAND")
            .unwrap_or_else(|| DEFAULT_CAMERA_COMMAND.to_string());
        if !camera_command.contains("{output}") {
            return Err(crate::Error::Config(
                "MEAL_CAMERA_COMMAND must contain an {output} placeholder".to_string(),
            ));
        }

        let dry_run = lookup("MEAL_DRY_RUN")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            webhook_url,
            camera_command,
            dry_run,
        })
    }
}

//! Text rendering for each screen of the analyzer.
//!
//! Numbers are rounded for display only; the [`NutritionData`] passed in is
//! never modified.

use crate::models::NutritionData;
use crate::photo::{Photo, Preview};
use std::fmt::Write as _;

pub const APP_NAME: &str = "Hill Calories AI";

/// Round to one decimal place, e.g. `35.26 -> 35.3`.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn amount(value: f64) -> String {
    format!("{}", round_one_decimal(value))
}

pub fn render_hero() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", APP_NAME);
    let _ = writeln!(out, "Instant meal nutrition from one photo");
    let _ = writeln!(out, "Fast. Accurate. Powered by AI.");
    let _ = writeln!(out);
    let _ = writeln!(out, "  [u] Get Started    [c] Try with a Photo");
    let _ = writeln!(
        out,
        "  Instant results | Private by default | No signup required"
    );
    out
}

pub fn render_upload() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Upload or take a photo");
    let _ = writeln!(out, "Supported: JPG, PNG • Max 10MB");
    let _ = writeln!(out, "  [c] Use Camera    [u] Upload File    [q] Quit");
    let _ = writeln!(out, "  Drag & drop image here, or type its path");
    out
}

pub fn render_analyzing(photo: Option<&Photo>, preview: Option<&Preview>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analyzing Your Meal");
    if let Some(photo) = photo {
        let _ = write!(out, "  {} ({} KB)", photo.file_name(), photo.len().div_ceil(1024));
        if let Some(preview) = preview {
            let _ = write!(out, ", preview at {}", preview.path().display());
        }
        let _ = writeln!(out);
    }
    let _ = writeln!(
        out,
        "Our AI is identifying ingredients and calculating nutritional content..."
    );
    out
}

pub fn render_results(data: &NutritionData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Nutrition Analysis");
    let _ = writeln!(out, "{} calories total", data.total.calories);
    if let Some(confidence) = data.confidence.filter(|c| *c > 0.0) {
        let _ = writeln!(out, "Confidence: {}%", (confidence * 100.0).round());
    }
    let _ = writeln!(out);

    let macros = [
        ("Protein", data.total.protein),
        ("Carbs", data.total.carbs),
        ("Fat", data.total.fat),
    ];
    for (name, value) in macros {
        let _ = writeln!(out, "  {:<8}{:>8}g", name, amount(value));
    }

    if !data.food.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Breakdown");
        for (index, item) in data.food.iter().enumerate() {
            let _ = writeln!(out, "  {}. {} ({})", index + 1, item.name, item.quantity);
            let _ = writeln!(
                out,
                "     {} kcal | protein {}g | carbs {}g | fat {}g",
                amount(item.calories),
                amount(item.protein),
                amount(item.carbs),
                amount(item.fat)
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  [r] Analyze Another Meal    [q] Quit");
    out
}

pub fn render_footer() -> String {
    "Powered by AI • Results are estimates\n".to_string()
}

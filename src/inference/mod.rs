//! Remote detection and verdict derivation.
//!
//! The client submits one encoded frame per call and hands the raw
//! response to [`derive_verdict`], a pure function that selects the best
//! prediction, classifies the sample, normalizes every box and fills in
//! the user-facing text. Keeping derivation separate from transport lets
//! it be tested without a server.

pub mod client;
pub mod messages;

pub use client::{DetectionClient, RequestPolicy};

use chrono::{DateTime, Local};

use crate::types::{CaptureFrame, NormalizedBox, SampleStatus, Verdict};
use messages::{DetectionResponse, Prediction};

/// Location label attached to verdicts; the device performs no geolocation.
pub(crate) const DEFAULT_LOCATION_LABEL: &str = "Field capture (location not recorded)";

const NO_FISH_DESCRIPTION: &str =
    "No fish detected in the image. The sample may be out of frame, obscured, or poorly lit.";
const NO_FISH_GUIDANCE: &str =
    "Retake the photo with the whole fish centered in the frame, in good light, against a plain background.";

/// Build a verdict from one detection response.
///
/// The best prediction drives the classification: `Safe` when its class
/// label contains "healthy" (case-insensitive), `Contaminated` otherwise,
/// and `NoFishDetected` when the response holds no predictions at all.
/// All predictions, not just the best, become overlay boxes.
pub fn derive_verdict(
    response: &DetectionResponse,
    frame: &CaptureFrame,
    captured_at: DateTime<Local>,
    location: &str,
) -> Verdict {
    let timestamp = format_timestamp(captured_at);

    let Some(best) = best_prediction(&response.predictions) else {
        return Verdict {
            status: SampleStatus::NoFishDetected,
            confidence: 0.0,
            description: NO_FISH_DESCRIPTION.to_string(),
            guidance: NO_FISH_GUIDANCE.to_string(),
            timestamp,
            image: frame.image.clone(),
            location: Some(location.to_string()),
            primary_symptom: Some("NONE".to_string()),
            bounding_boxes: Vec::new(),
        };
    };

    let status = if best.class.to_lowercase().contains("healthy") {
        SampleStatus::Safe
    } else {
        SampleStatus::Contaminated
    };
    let label = best.class.replace('-', " ");
    let percent = rounded_percent(best.confidence);
    let (description, guidance) = match status {
        SampleStatus::Safe => (
            format!(
                "Identified {label} with {percent} confidence. No contamination indicators were found in this sample."
            ),
            "No immediate action is required. Follow routine handling and storage practice for the catch.".to_string(),
        ),
        _ => (
            format!(
                "Detected {label} with {percent} confidence. This indicator is consistent with harmful algal bloom exposure."
            ),
            "Do not consume or sell this catch. Isolate the sample and report it to your regional fisheries office.".to_string(),
        ),
    };

    let bounding_boxes = response
        .predictions
        .iter()
        .map(|p| {
            NormalizedBox::from_detection(
                p.x,
                p.y,
                p.width,
                p.height,
                response.image.width,
                response.image.height,
            )
        })
        .collect();

    Verdict {
        status,
        confidence: best.confidence,
        description,
        guidance,
        timestamp,
        image: frame.image.clone(),
        location: Some(location.to_string()),
        primary_symptom: Some(label.to_uppercase()),
        bounding_boxes,
    }
}

/// Highest-confidence prediction; the first occurrence wins ties so the
/// selection is deterministic across runs.
fn best_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    predictions.iter().fold(None, |best, p| match best {
        Some(b) if p.confidence <= b.confidence => Some(b),
        _ => Some(p),
    })
}

/// Capture moment as `MM/DD/YY, hh:mm:ss AM/PM`.
fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%m/%d/%y, %I:%M:%S %p").to_string()
}

/// Confidence as an integer percentage, e.g. `82%` for 0.823.
fn rounded_percent(confidence: f32) -> String {
    format!("{}%", (confidence * 100.0).round() as i32)
}

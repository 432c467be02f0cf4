//! Wire types for the hosted detection endpoint.
//!
//! The endpoint accepts a single encoded image per request and answers
//! with a JSON document listing the raw predictions plus the pixel
//! dimensions of the image it evaluated. Everything here mirrors that
//! document one-to-one; interpretation happens in the verdict derivation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single detection returned by the remote model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// X-coordinate of the box center in source-image pixels
    pub x: f32,
    /// Y-coordinate of the box center in source-image pixels
    pub y: f32,
    /// Box width in source-image pixels
    pub width: f32,
    /// Box height in source-image pixels
    pub height: f32,
    /// Classification label for the detection
    pub class: String,
    /// Confidence score (0.0 to 1.0)
    pub confidence: f32,
}

/// Pixel dimensions of the image the detector evaluated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Raw response document from the detection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResponse {
    /// Every prediction above the requested confidence threshold
    pub predictions: Vec<Prediction>,
    /// Dimensions the prediction coordinates refer to
    pub image: ImageSize,
}

impl fmt::Display for DetectionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} prediction(s) on {}x{} source: ",
            self.predictions.len(),
            self.image.width,
            self.image.height
        )?;
        for p in &self.predictions {
            write!(
                f,
                "{}({:.2}%) at ({},{},{},{}) ",
                p.class,
                p.confidence * 100.0,
                p.x,
                p.y,
                p.width,
                p.height
            )?;
        }
        Ok(())
    }
}

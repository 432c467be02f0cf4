//! Core types shared across the capture-to-verdict pipeline.
//!
//! This module contains the data structures that flow between the capture
//! sources, the detection client and the report renderer: encoded capture
//! frames, normalized bounding boxes and the per-capture verdict.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of the resolution-independent coordinate space.
pub const NORMALIZED_SPACE: f32 = 1000.0;

/// A bounding box in the resolution-independent 0-1000 coordinate space.
///
/// Boxes are produced from detector-space predictions (pixel center plus
/// size) and consumed by the overlay renderer, which scales them back into
/// display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    /// Top bound in normalized units
    pub ymin: f32,
    /// Left bound in normalized units
    pub xmin: f32,
    /// Bottom bound in normalized units
    pub ymax: f32,
    /// Right bound in normalized units
    pub xmax: f32,
}

impl NormalizedBox {
    /// Normalize a detector-space box into the 0-1000 space.
    ///
    /// `cx`/`cy` are the box center and `width`/`height` its size, all in
    /// source-image pixels. Zero image dimensions are treated as 1 so the
    /// result stays finite. Every bound is clamped into `[0, 1000]`.
    pub fn from_detection(
        cx: f32,
        cy: f32,
        width: f32,
        height: f32,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let iw = if image_width == 0 { 1.0 } else { image_width as f32 };
        let ih = if image_height == 0 { 1.0 } else { image_height as f32 };
        Self {
            ymin: ((cy - height / 2.0) / ih * NORMALIZED_SPACE).clamp(0.0, NORMALIZED_SPACE),
            xmin: ((cx - width / 2.0) / iw * NORMALIZED_SPACE).clamp(0.0, NORMALIZED_SPACE),
            ymax: ((cy + height / 2.0) / ih * NORMALIZED_SPACE).clamp(0.0, NORMALIZED_SPACE),
            xmax: ((cx + width / 2.0) / iw * NORMALIZED_SPACE).clamp(0.0, NORMALIZED_SPACE),
        }
    }

    /// Box center in normalized units.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
        )
    }
}

/// Overall classification of a scanned sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleStatus {
    /// The best detection matched a healthy class
    Safe,
    /// The best detection matched a contamination indicator
    Contaminated,
    /// The detections did not support a call either way
    Inconclusive,
    /// The detector returned no predictions at all
    NoFishDetected,
}

impl SampleStatus {
    /// Banner text shown in reports and result views.
    pub fn banner(&self) -> &'static str {
        match self {
            SampleStatus::Safe => "SAFE",
            SampleStatus::Contaminated => "CONTAMINATED",
            SampleStatus::Inconclusive => "INCONCLUSIVE",
            SampleStatus::NoFishDetected => "NO FISH DETECTED",
        }
    }
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.banner())
    }
}

/// An encoded still image ready for transmission.
///
/// Camera and file capture produce JPEG bytes directly; browser-style
/// inputs arrive as base64 data-URIs. Either way `payload` yields the
/// request body, with any data-URI prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedImage {
    /// Raw JPEG bytes as produced by the capture sources
    Jpeg(Vec<u8>),
    /// A `data:image/...;base64,` string as produced by canvas exports
    DataUri(String),
}

impl EncodedImage {
    /// Bytes to transmit as the detection request body.
    pub fn payload(&self) -> &[u8] {
        match self {
            EncodedImage::Jpeg(bytes) => bytes,
            EncodedImage::DataUri(text) => match text.split_once("base64,") {
                Some((_, encoded)) => encoded.as_bytes(),
                None => text.as_bytes(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.payload().len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }
}

/// A single captured still image plus its pixel dimensions.
///
/// Created per capture action and held only long enough to submit to the
/// detector and to keep the last frame on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureFrame {
    /// The encoded still
    pub image: EncodedImage,
    /// Width in pixels, recovered from the stream or the decoded file
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// The structured classification result for one capture.
///
/// Constructed once per successful detection call, immutable afterwards,
/// and discarded when the user requests a new scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Overall call for this sample
    pub status: SampleStatus,
    /// Raw confidence of the best prediction, 0 when nothing was detected
    pub confidence: f32,
    /// Result text referencing the best prediction
    pub description: String,
    /// What the user should do next
    pub guidance: String,
    /// Capture moment, formatted as `MM/DD/YY, hh:mm:ss AM/PM`
    pub timestamp: String,
    /// Source image the verdict was derived from
    pub image: EncodedImage,
    /// Location label; no geolocation is performed
    pub location: Option<String>,
    /// Best prediction's class, hyphens replaced and upper-cased
    pub primary_symptom: Option<String>,
    /// Every returned prediction, normalized for overlay rendering
    pub bounding_boxes: Vec<NormalizedBox>,
}

impl Verdict {
    /// Display confidence with one decimal, e.g. `82.3%` for 0.823.
    pub fn display_confidence(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_normalized_bounds_hold_for_random_inputs() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let image_width: u32 = rng.gen_range(0..4000);
            let image_height: u32 = rng.gen_range(0..4000);
            let cx: f32 = rng.gen_range(-500.0..4500.0);
            let cy: f32 = rng.gen_range(-500.0..4500.0);
            let w: f32 = rng.gen_range(0.0..5000.0);
            let h: f32 = rng.gen_range(0.0..5000.0);
            let bx = NormalizedBox::from_detection(cx, cy, w, h, image_width, image_height);
            assert!(
                0.0 <= bx.xmin && bx.xmin <= bx.xmax && bx.xmax <= 1000.0,
                "x bounds out of order for {bx:?}"
            );
            assert!(
                0.0 <= bx.ymin && bx.ymin <= bx.ymax && bx.ymax <= 1000.0,
                "y bounds out of order for {bx:?}"
            );
        }
    }

    #[test]
    fn test_normalization_maps_pixel_space() {
        let bx = NormalizedBox::from_detection(320.0, 240.0, 100.0, 80.0, 640, 480);
        assert_eq!(bx.xmin, 421.875);
        assert_eq!(bx.xmax, 578.125);
        assert!((bx.ymin - 416.6667).abs() < 1e-3);
        assert!((bx.ymax - 583.3333).abs() < 1e-3);
    }

    #[test]
    fn test_zero_image_dimensions_are_guarded() {
        let bx = NormalizedBox::from_detection(5.0, 5.0, 10.0, 10.0, 0, 0);
        assert_eq!(bx.xmin, 0.0);
        assert_eq!(bx.xmax, 1000.0);
        assert!(bx.ymin.is_finite() && bx.ymax.is_finite());
    }

    #[test]
    fn test_data_uri_prefix_is_stripped() {
        let image = EncodedImage::DataUri("data:image/jpeg;base64,QUJD".to_string());
        assert_eq!(image.payload(), b"QUJD");
    }

    #[test]
    fn test_plain_payloads_pass_through() {
        let bare = EncodedImage::DataUri("QUJD".to_string());
        assert_eq!(bare.payload(), b"QUJD");

        let jpeg = EncodedImage::Jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9]);
        assert_eq!(jpeg.payload(), &[0xFF, 0xD8, 0xFF, 0xD9]);
        assert_eq!(jpeg.len(), 4);
    }
}

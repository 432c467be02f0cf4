//! Frame acquisition for the screening pipeline.
//!
//! Capture sources produce one encoded still per user action. Two are
//! provided: [`FileSource`] decodes a user-selected image file, and
//! [`CameraSource`] (behind the `camera` feature) snapshots a live video
//! stream. Both implement [`FrameSource`], so the rest of the pipeline
//! does not care where a frame came from.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use tracing::warn;

use crate::error::CaptureError;
use crate::types::{CaptureFrame, EncodedImage};

/// Ideal live-capture width requested from camera streams.
pub const PREFERRED_WIDTH: u32 = 1280;
/// Ideal live-capture height requested from camera streams.
pub const PREFERRED_HEIGHT: u32 = 720;

/// JPEG quality used when encoding captured frames.
const JPEG_QUALITY: u8 = 85;

/// A source of single still frames.
pub trait FrameSource {
    /// Snapshot the current frame as an encoded still image.
    ///
    /// No network traffic or inference happens here; the returned frame
    /// is ready to hand to the detection client.
    fn capture_still(&mut self) -> Result<CaptureFrame, CaptureError>;

    /// Toggle the illumination aid on sources that have one.
    ///
    /// Sources without a torch capability log a warning and ignore the
    /// request; the condition is never surfaced to the caller.
    fn set_illumination(&mut self, on: bool) {
        let _ = on;
        warn!("illumination control is not supported by this capture source");
    }
}

/// Encode an RGB frame to JPEG, recording its dimensions.
pub(crate) fn encode_jpeg(rgb: &RgbImage) -> Result<CaptureFrame, CaptureError> {
    let (width, height) = rgb.dimensions();
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder.encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)?;
    Ok(CaptureFrame {
        image: EncodedImage::Jpeg(jpeg),
        width,
        height,
    })
}

mod file;
pub use file::FileSource;

#[cfg(feature = "camera")]
mod camera;
#[cfg(feature = "camera")]
pub use camera::{CameraSettings, CameraSource};

//! Error types for the screening pipeline.
//!
//! Failures split along the pipeline's seams: `CaptureError` covers frame
//! acquisition, `DetectionError` covers the remote detection call, and
//! `ScanError` is the umbrella the application state machine consumes.
//! Capture failures are non-fatal to the pipeline as a whole; detection
//! failures abort the current attempt without producing a partial verdict.

use std::fmt;
use thiserror::Error;

/// Top-level error for one scan attempt.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A frame could not be acquired from the active source.
    ///
    /// The session state is left untouched; the capture view stays usable.
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    /// The detection call failed and no verdict was produced.
    #[error("detection failed: {0}")]
    Detection(#[from] DetectionError),

    /// The state machine refused a transition.
    ///
    /// This error occurs when:
    /// - A capture is requested while a scan is already analyzing
    /// - A result arrives with no scan in progress
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Errors from camera and file frame sources.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The camera could not be opened (missing device, permission refused).
    ///
    /// Non-fatal to the pipeline: the file-input path stays available.
    #[error("camera unavailable: {0}")]
    Permission(String),

    /// The live stream failed after it was opened.
    #[error("capture stream error: {0}")]
    Stream(String),

    /// No frame was available to snapshot.
    #[error("no frame available")]
    NoFrame,

    /// The selected file does not carry an image MIME type.
    #[error("unsupported input type: {0}")]
    UnsupportedMedia(String),

    /// Image decoding or re-encoding failed.
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the remote detection endpoint.
#[derive(Debug)]
pub enum DetectionError {
    Server { status_code: u16, message: String },
    Config(String),
    Network(reqwest::Error),
    Json(serde_json::Error),
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionError::Server {
                status_code,
                message,
            } => {
                write!(f, "Server error {}: {}", status_code, message)
            }
            DetectionError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DetectionError::Network(e) => write!(f, "Network error: {}", e),
            DetectionError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for DetectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DetectionError::Network(e) => Some(e),
            DetectionError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DetectionError {
    fn from(err: reqwest::Error) -> Self {
        DetectionError::Network(err)
    }
}

impl From<serde_json::Error> for DetectionError {
    fn from(err: serde_json::Error) -> Self {
        DetectionError::Json(err)
    }
}

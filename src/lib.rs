pub mod capture;
pub mod config;
mod error;
pub mod inference;
mod pipeline;
pub mod report;
mod session;
pub mod types;

pub use capture::{FileSource, FrameSource};
pub use config::{ConfigError, ScanConfig};
pub use error::{CaptureError, DetectionError, ScanError};
pub use inference::{DetectionClient, RequestPolicy};
pub use pipeline::{ScanPipeline, DETECTION_FAILED_MESSAGE};
pub use session::{ScanPhase, ScanSession};
pub use types::{CaptureFrame, EncodedImage, NormalizedBox, SampleStatus, Verdict};

//! End-to-end scan driver.

use chrono::Local;
use tracing::{error, info};

use crate::capture::FrameSource;
use crate::error::ScanError;
use crate::inference::DetectionClient;
use crate::session::ScanSession;
use crate::types::Verdict;

/// User-facing message stored in the session when detection fails; the
/// underlying cause goes to the log only.
pub const DETECTION_FAILED_MESSAGE: &str =
    "Detection failed. Check your connection and try again.";

/// Wires a frame source, the detection client and the session state into
/// the capture-to-verdict flow. At most one detection call is in flight;
/// the session refuses a second capture while one is analyzing.
pub struct ScanPipeline<S> {
    source: S,
    client: DetectionClient,
    session: ScanSession,
}

impl<S: FrameSource> ScanPipeline<S> {
    pub fn new(source: S, client: DetectionClient) -> Self {
        Self {
            source,
            client,
            session: ScanSession::new(),
        }
    }

    /// Run one capture-and-analyze cycle.
    ///
    /// A capture failure aborts before the session is touched. A
    /// detection failure moves the session to its error state with a
    /// generic message and returns the cause to the caller.
    pub async fn scan(&mut self) -> Result<Verdict, ScanError> {
        let frame = self.source.capture_still()?;
        let captured_at = Local::now();
        self.session.begin_scan(frame.clone())?;

        match self.client.detect(&frame, captured_at).await {
            Ok(verdict) => {
                info!("sample classified as {}", verdict.status);
                self.session.complete(verdict.clone())?;
                Ok(verdict)
            }
            Err(err) => {
                error!("scan failed: {err}");
                self.session.fail(DETECTION_FAILED_MESSAGE)?;
                Err(ScanError::Detection(err))
            }
        }
    }

    /// Discard the current result and return the session to idle.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

//! Scan lifecycle state.
//!
//! One [`ScanSession`] owns everything the capture view shows: the frozen
//! frame while analyzing, the verdict on success, or the failure message.
//! A single enum keeps impossible combinations (analyzing with an error,
//! a verdict without a frame) unrepresentable.

use crate::error::ScanError;
use crate::types::{CaptureFrame, Verdict};

/// Discriminant of the session state, for view dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Analyzing,
    Success,
    Error,
}

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    Analyzing {
        frame: CaptureFrame,
    },
    Success {
        frame: CaptureFrame,
        verdict: Verdict,
    },
    Error {
        frame: CaptureFrame,
        message: String,
    },
}

/// Sequences Idle -> Analyzing -> Success/Error -> Idle, one capture at a
/// time.
#[derive(Debug, Default)]
pub struct ScanSession {
    state: ScanState,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ScanPhase {
        match self.state {
            ScanState::Idle => ScanPhase::Idle,
            ScanState::Analyzing { .. } => ScanPhase::Analyzing,
            ScanState::Success { .. } => ScanPhase::Success,
            ScanState::Error { .. } => ScanPhase::Error,
        }
    }

    /// Accept a captured frame and enter `Analyzing`.
    ///
    /// The frame is stored immediately so the view keeps showing it while
    /// the request is in flight. A second capture while one is analyzing
    /// is refused; starting over from `Success` or `Error` discards the
    /// previous outcome.
    pub fn begin_scan(&mut self, frame: CaptureFrame) -> Result<(), ScanError> {
        if matches!(self.state, ScanState::Analyzing { .. }) {
            return Err(ScanError::InvalidOperation(
                "a scan is already in progress".to_string(),
            ));
        }
        self.state = ScanState::Analyzing { frame };
        Ok(())
    }

    /// Store the verdict for the pending scan.
    pub fn complete(&mut self, verdict: Verdict) -> Result<(), ScanError> {
        match std::mem::take(&mut self.state) {
            ScanState::Analyzing { frame } => {
                self.state = ScanState::Success { frame, verdict };
                Ok(())
            }
            other => {
                self.state = other;
                Err(ScanError::InvalidOperation(
                    "no scan in progress".to_string(),
                ))
            }
        }
    }

    /// Record a failure for the pending scan.
    ///
    /// The frame is retained so the view stays on the captured image.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), ScanError> {
        match std::mem::take(&mut self.state) {
            ScanState::Analyzing { frame } => {
                self.state = ScanState::Error {
                    frame,
                    message: message.into(),
                };
                Ok(())
            }
            other => {
                self.state = other;
                Err(ScanError::InvalidOperation(
                    "no scan in progress".to_string(),
                ))
            }
        }
    }

    /// Discard any verdict or error and return to `Idle`.
    pub fn reset(&mut self) {
        self.state = ScanState::Idle;
    }

    /// Frame owned by the session in any non-idle state.
    pub fn frame(&self) -> Option<&CaptureFrame> {
        match &self.state {
            ScanState::Idle => None,
            ScanState::Analyzing { frame }
            | ScanState::Success { frame, .. }
            | ScanState::Error { frame, .. } => Some(frame),
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.state {
            ScanState::Success { verdict, .. } => Some(verdict),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ScanState::Error { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EncodedImage, SampleStatus};

    fn test_frame() -> CaptureFrame {
        CaptureFrame {
            image: EncodedImage::Jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9]),
            width: 2,
            height: 2,
        }
    }

    fn test_verdict() -> Verdict {
        Verdict {
            status: SampleStatus::Safe,
            confidence: 0.8,
            description: "ok".to_string(),
            guidance: "none".to_string(),
            timestamp: "02/03/26, 04:05:06 PM".to_string(),
            image: EncodedImage::Jpeg(vec![0xFF, 0xD8]),
            location: None,
            primary_symptom: Some("HEALTHY".to_string()),
            bounding_boxes: Vec::new(),
        }
    }

    #[test]
    fn test_full_cycle_returns_to_empty_idle() {
        let mut session = ScanSession::new();
        assert_eq!(session.phase(), ScanPhase::Idle);

        session.begin_scan(test_frame()).unwrap();
        assert_eq!(session.phase(), ScanPhase::Analyzing);
        assert!(session.frame().is_some());

        session.complete(test_verdict()).unwrap();
        assert_eq!(session.phase(), ScanPhase::Success);
        assert!(session.verdict().is_some());

        session.reset();
        assert_eq!(session.phase(), ScanPhase::Idle);
        assert!(session.verdict().is_none());
        assert!(session.error_message().is_none());
        assert!(session.frame().is_none());
    }

    #[test]
    fn test_no_concurrent_scans() {
        let mut session = ScanSession::new();
        session.begin_scan(test_frame()).unwrap();
        match session.begin_scan(test_frame()) {
            Err(ScanError::InvalidOperation(_)) => (),
            other => panic!("expected InvalidOperation, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_keeps_the_frame() {
        let mut session = ScanSession::new();
        session.begin_scan(test_frame()).unwrap();
        session.fail("detection failed").unwrap();
        assert_eq!(session.phase(), ScanPhase::Error);
        assert_eq!(session.error_message(), Some("detection failed"));
        assert_eq!(session.frame(), Some(&test_frame()));
    }

    #[test]
    fn test_retry_from_error_without_reset() {
        let mut session = ScanSession::new();
        session.begin_scan(test_frame()).unwrap();
        session.fail("detection failed").unwrap();
        session.begin_scan(test_frame()).unwrap();
        assert_eq!(session.phase(), ScanPhase::Analyzing);
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_results_need_a_pending_scan() {
        let mut session = ScanSession::new();
        assert!(session.complete(test_verdict()).is_err());
        assert!(session.fail("late failure").is_err());
        assert_eq!(session.phase(), ScanPhase::Idle);
    }
}

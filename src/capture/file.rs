use std::path::{Path, PathBuf};

use tracing::debug;

use super::{encode_jpeg, FrameSource};
use crate::error::CaptureError;
use crate::types::CaptureFrame;

/// Frame source backed by a user-selected image file.
///
/// Accepts any `image/*` input, decodes it eagerly and re-encodes to
/// JPEG so downstream handling matches the live-capture path.
pub struct FileSource {
    path: PathBuf,
    frame: CaptureFrame,
}

impl FileSource {
    /// Open and decode an image file.
    ///
    /// Returns [`CaptureError::UnsupportedMedia`] when the file does not
    /// carry an image MIME type; decoding failures map to
    /// [`CaptureError::Image`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path)
            .first()
            .ok_or_else(|| CaptureError::UnsupportedMedia(path.display().to_string()))?;
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(CaptureError::UnsupportedMedia(mime.essence_str().to_string()));
        }

        let decoded = image::open(path)?;
        let frame = encode_jpeg(&decoded.to_rgb8())?;
        debug!(
            "decoded {} as {}x{} {}",
            path.display(),
            frame.width,
            frame.height,
            mime
        );
        Ok(Self {
            path: path.to_path_buf(),
            frame,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for FileSource {
    fn capture_still(&mut self) -> Result<CaptureFrame, CaptureError> {
        Ok(self.frame.clone())
    }
}

use gstreamer as gst;
use gstreamer_app as gst_app;

use gst::prelude::*;
use gstreamer_video::VideoCapsBuilder;
use image::RgbImage;
use tracing::{debug, warn};

use super::{encode_jpeg, FrameSource, PREFERRED_HEIGHT, PREFERRED_WIDTH};
use crate::error::CaptureError;
use crate::types::CaptureFrame;

/// Requested stream geometry.
#[derive(Debug, Clone, Copy)]
pub struct CameraSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            width: PREFERRED_WIDTH,
            height: PREFERRED_HEIGHT,
        }
    }
}

/// Frame source backed by a live camera stream.
///
/// The underlying pipeline is a scoped hardware resource: dropping the
/// source returns it to the Null state on every exit path, releasing the
/// device for other consumers.
pub struct CameraSource {
    pipeline: gst::Pipeline,
    appsink: gst_app::AppSink,
    width: u32,
    height: u32,
}

impl CameraSource {
    /// Open the default camera and start streaming at the requested size.
    ///
    /// Failure here (no device, permission refused) leaves the rest of
    /// the pipeline usable; callers fall back to [`super::FileSource`].
    pub fn start(settings: CameraSettings) -> Result<Self, CaptureError> {
        gst::init().map_err(|e| CaptureError::Stream(e.to_string()))?;

        let pipeline = gst::Pipeline::new();
        let src = gst::ElementFactory::make("autovideosrc")
            .build()
            .map_err(|e| CaptureError::Permission(e.to_string()))?;
        let convert = gst::ElementFactory::make("videoconvert")
            .build()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        let scale = gst::ElementFactory::make("videoscale")
            .build()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        let sink = gst::ElementFactory::make("appsink")
            .build()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;

        pipeline
            .add_many([&src, &convert, &scale, &sink])
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        gst::Element::link_many([&src, &convert, &scale, &sink])
            .map_err(|e| CaptureError::Stream(e.to_string()))?;

        let appsink = sink
            .dynamic_cast::<gst_app::AppSink>()
            .map_err(|_| CaptureError::Stream("appsink cast failed".to_string()))?;
        let caps = VideoCapsBuilder::new()
            .format(gstreamer_video::VideoFormat::Rgb)
            .width(settings.width as i32)
            .height(settings.height as i32)
            .build();
        appsink.set_caps(Some(&caps));

        pipeline
            .set_state(gst::State::Playing)
            .map_err(|e| CaptureError::Permission(e.to_string()))?;
        debug!(
            "camera stream started at {}x{}",
            settings.width, settings.height
        );

        Ok(Self {
            pipeline,
            appsink,
            width: settings.width,
            height: settings.height,
        })
    }
}

impl FrameSource for CameraSource {
    fn capture_still(&mut self) -> Result<CaptureFrame, CaptureError> {
        let sample = self
            .appsink
            .try_pull_sample(gst::ClockTime::from_seconds(2))
            .ok_or(CaptureError::NoFrame)?;
        let buffer = sample.buffer().ok_or(CaptureError::NoFrame)?;
        let map = buffer
            .map_readable()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        let rgb = RgbImage::from_raw(self.width, self.height, map.as_slice().to_vec())
            .ok_or(CaptureError::NoFrame)?;
        encode_jpeg(&rgb)
    }

    fn set_illumination(&mut self, on: bool) {
        // No portable torch control exists on this stack; the toggle is
        // best-effort only.
        let _ = on;
        warn!("torch requested but the active stream exposes no illumination control");
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if let Err(err) = self.pipeline.set_state(gst::State::Null) {
            warn!("failed to stop camera pipeline: {err}");
        }
    }
}

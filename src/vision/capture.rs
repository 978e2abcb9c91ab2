//! Camera and video file capture through `OpenCV`.

use super::conversion::mat_to_rgb;
use crate::{collaborators::CaptureDevice, frame::Frame, Error, Result};
use log::{info, warn};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
};
use std::path::PathBuf;

/// Video source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(PathBuf),
}

/// `VideoCapture` backed frame source
pub struct OpenCvCapture {
    source: VideoSource,
    frame_size: (u32, u32),
    capture: Option<VideoCapture>,
}

impl OpenCvCapture {
    /// Create a closed capture; `frame_size` is requested from cameras
    #[must_use]
    pub const fn new(source: VideoSource, frame_size: (u32, u32)) -> Self {
        Self {
            source,
            frame_size,
            capture: None,
        }
    }
}

impl CaptureDevice for OpenCvCapture {
    fn open(&mut self) -> Result<()> {
        let capture = match &self.source {
            VideoSource::Camera(index) => {
                info!("Opening camera {}", index);
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;
                cap.set(CAP_PROP_FRAME_WIDTH, f64::from(self.frame_size.0))?;
                cap.set(CAP_PROP_FRAME_HEIGHT, f64::from(self.frame_size.1))?;

                // Reduce buffer size for lower latency
                cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;
                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {}", path.display());
                VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?
            }
        };

        if !capture.is_opened()? {
            return Err(Error::Capture(format!("Failed to open {:?}", self.source)));
        }

        self.capture = Some(capture);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut capture) = self.capture.take() {
            capture.release()?;
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Option<Frame>> {
        let capture = self
            .capture
            .as_mut()
            .ok_or_else(|| Error::Capture("Capture device is not open".to_string()))?;

        let mut mat = Mat::default();
        if !capture.read(&mut mat)? || mat.empty() {
            if matches!(self.source, VideoSource::File(_)) {
                return Err(Error::EndOfStream);
            }
            warn!("Failed to read frame");
            return Ok(None);
        }

        mat_to_rgb(&mat).map(Some)
    }
}

//! Interfaces to the services the pipeline drives but does not implement.
//!
//! Capture, face location and classification are required; robot motion,
//! expression output, speech, overlay and display are optional and their
//! absence only disables the matching reaction.

use crate::{
    emotion::{CategoricalResult, DimensionalResult, Emotion},
    frame::{normalize_face, FaceDetection, Frame, NormalizedImage},
    Result,
};
use image::RgbImage;

/// Source of video frames
pub trait CaptureDevice {
    /// Acquire the device
    fn open(&mut self) -> Result<()>;

    /// Release the device
    fn close(&mut self) -> Result<()>;

    /// Grab the next frame. `Ok(None)` means no valid frame this tick;
    /// `Err(Error::EndOfStream)` means the source is exhausted.
    fn read(&mut self) -> Result<Option<Frame>>;
}

/// Finds faces in a frame
pub trait FaceLocator {
    /// Detect faces, best candidate first
    fn detect_faces(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>>;

    /// Turn a face crop into classifier input
    fn pre_process(&self, crop: &RgbImage, target_size: u32) -> Result<NormalizedImage> {
        normalize_face(crop, target_size)
    }
}

/// A pretrained model producing one score per class
pub trait Classifier {
    /// Class labels matching the positions of [`Classifier::classify`] output
    fn classes_order(&self) -> &[String];

    /// Score a normalized face
    fn classify(&mut self, face: &NormalizedImage) -> Result<Vec<f32>>;
}

/// Robot joint control
pub trait RobotMotion {
    /// Rotate a joint relative to its current angle
    fn change_angle(&mut self, joint: &str, degrees: f64, speed: f64) -> Result<()>;

    /// Move a joint to an absolute angle
    fn set_angle(&mut self, joint: &str, degrees: f64, speed: f64) -> Result<()>;
}

/// Displays an emotion on the robot's face
pub trait ExpressionOutput {
    fn send_face_expression(&mut self, emotion: Emotion) -> Result<()>;
}

/// Draws detections and scores onto the display canvas
pub trait OverlayRenderer {
    fn render(
        &mut self,
        canvas: &mut RgbImage,
        detections: &[FaceDetection],
        categorical: &CategoricalResult,
        dimensional: &DimensionalResult,
    ) -> Result<()>;
}

/// On-screen window
pub trait FrameDisplay {
    /// Present a canvas
    fn show(&mut self, canvas: &RgbImage) -> Result<()>;

    /// Return a pressed key, if any, without blocking
    fn poll_key(&mut self) -> Result<Option<char>>;

    /// Tear the window down
    fn close(&mut self) -> Result<()>;
}

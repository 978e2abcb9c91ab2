//! `OpenCV` implementations of the capture, face locator and display
//! collaborators.

pub mod capture;
pub mod conversion;
pub mod display;
pub mod locator;

pub use capture::{OpenCvCapture, VideoSource};
pub use display::HighGuiDisplay;
pub use locator::HaarFaceLocator;

//! Frame, face region and classifier input types.

use crate::{Error, Result};
use image::{imageops, imageops::FilterType, RgbImage};

/// A captured RGB frame
pub type Frame = RgbImage;

/// Bounding box of a detected face in frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Center point of the box
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Pixel coordinates fit in f64
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Clip the box to a frame, returning `None` if nothing is left
    #[must_use]
    pub fn clipped(&self, frame_width: u32, frame_height: u32) -> Option<Self> {
        if self.x >= frame_width || self.y >= frame_height {
            return None;
        }
        let width = self.width.min(frame_width - self.x);
        let height = self.height.min(frame_height - self.y);
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self::new(self.x, self.y, width, height))
    }
}

/// A face found by the locator: its box and the RGB crop
#[derive(Debug, Clone)]
pub struct FaceDetection {
    pub region: FaceRegion,
    pub crop: RgbImage,
}

impl FaceDetection {
    /// Cut the region out of a frame
    ///
    /// # Errors
    ///
    /// Returns an error if the region lies outside the frame
    pub fn from_frame(frame: &Frame, region: FaceRegion) -> Result<Self> {
        let clipped = region.clipped(frame.width(), frame.height()).ok_or_else(|| {
            Error::InvalidInput(format!(
                "Face region {region:?} outside {}x{} frame",
                frame.width(),
                frame.height()
            ))
        })?;
        let crop = imageops::crop_imm(frame, clipped.x, clipped.y, clipped.width, clipped.height).to_image();
        Ok(Self { region, crop })
    }
}

/// Square grayscale classifier input, values in `[0, 1]`, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    size: u32,
    pixels: Vec<f32>,
}

impl NormalizedImage {
    /// Wrap pixel data of a `size` x `size` image
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel count does not match the size
    pub fn new(size: u32, pixels: Vec<f32>) -> Result<Self> {
        let expected = (size as usize) * (size as usize);
        if pixels.len() != expected {
            return Err(Error::InvalidInput(format!(
                "Normalized image of size {size} needs {expected} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self { size, pixels })
    }

    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}

/// Convert a face crop to the classifier input: grayscale, resized, scaled
///
/// # Errors
///
/// Returns an error if the crop is empty or the target size is zero
pub fn normalize_face(crop: &RgbImage, target_size: u32) -> Result<NormalizedImage> {
    if crop.width() == 0 || crop.height() == 0 {
        return Err(Error::InvalidInput("Empty face crop".to_string()));
    }
    if target_size == 0 {
        return Err(Error::InvalidInput("Target face size must be greater than 0".to_string()));
    }

    let gray = imageops::grayscale(crop);
    let resized = imageops::resize(&gray, target_size, target_size, FilterType::Triangle);
    let pixels = resized.pixels().map(|p| f32::from(p.0[0]) / 255.0).collect();

    NormalizedImage::new(target_size, pixels)
}

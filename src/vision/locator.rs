//! Haar cascade face locator.

use super::conversion::rgb_to_mat;
use crate::{
    collaborators::FaceLocator,
    frame::{FaceDetection, FaceRegion, Frame},
    Error, Result,
};
use log::{debug, info, warn};
use opencv::{
    core::{Mat, Rect, Size, Vector},
    imgproc,
    objdetect::CascadeClassifier,
    prelude::*,
};
use std::path::Path;

const SCALE_FACTOR: f64 = 1.1;
const MIN_NEIGHBORS: i32 = 5;
const MIN_FACE_SIZE: i32 = 40;

/// Face locator using an `OpenCV` Haar cascade
pub struct HaarFaceLocator {
    classifier: CascadeClassifier,
}

impl HaarFaceLocator {
    /// Load a cascade file
    ///
    /// # Errors
    ///
    /// Returns an error if the cascade cannot be loaded or is empty
    pub fn new<P: AsRef<Path>>(cascade_path: P) -> Result<Self> {
        let path = cascade_path.as_ref();
        info!("Loading face cascade: {}", path.display());

        let classifier = CascadeClassifier::new(&path.to_string_lossy())?;
        if classifier.empty()? {
            return Err(Error::ModelError(format!("Haar cascade is empty: {}", path.display())));
        }

        Ok(Self { classifier })
    }
}

impl FaceLocator for HaarFaceLocator {
    #[allow(clippy::cast_sign_loss)] // Cascade rectangles are non-negative
    fn detect_faces(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>> {
        let bgr = rgb_to_mat(frame)?;
        let mut gray = Mat::default();
        imgproc::cvt_color(&bgr, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;

        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            &gray,
            &mut faces,
            SCALE_FACTOR,
            MIN_NEIGHBORS,
            0,
            Size::new(MIN_FACE_SIZE, MIN_FACE_SIZE),
            Size::new(0, 0),
        )?;

        // Largest face first
        let mut rects = faces.to_vec();
        rects.sort_by_key(|r| std::cmp::Reverse(r.area()));

        let mut detections = Vec::with_capacity(rects.len());
        for r in rects {
            let region = FaceRegion::new(r.x.max(0) as u32, r.y.max(0) as u32, r.width as u32, r.height as u32);
            match FaceDetection::from_frame(frame, region) {
                Ok(detection) => detections.push(detection),
                Err(e) => warn!("Failed to extract face region: {}", e),
            }
        }

        debug!("Found {} faces", detections.len());
        Ok(detections)
    }
}

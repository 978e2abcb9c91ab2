//! Conversion between `image` RGB buffers and `OpenCV` BGR `Mat`s.

use crate::{frame::Frame, Error, Result};
use image::RgbImage;
use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::prelude::*;

/// Convert u32 to i32 with overflow checking
///
/// # Errors
///
/// Returns an error if the value exceeds `i32::MAX`
pub fn u32_to_i32(value: u32) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} too large to fit in i32")))
}

/// Convert an RGB image to a BGR `Mat` with the same dimensions
///
/// # Errors
///
/// Returns an error if the image is too large for `OpenCV` or the `Mat`
/// cannot be allocated
pub fn rgb_to_mat(image: &RgbImage) -> Result<Mat> {
    let rows = u32_to_i32(image.height())?;
    let cols = u32_to_i32(image.width())?;

    let mut mat = Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(0.0))?;
    let data = mat.data_bytes_mut()?;
    for (bgr, rgb) in data.chunks_exact_mut(3).zip(image.pixels()) {
        bgr[0] = rgb[2];
        bgr[1] = rgb[1];
        bgr[2] = rgb[0];
    }

    Ok(mat)
}

/// Convert a BGR `Mat` to an RGB frame
///
/// # Errors
///
/// Returns an error if the `Mat` is empty or not 8-bit three-channel
#[allow(clippy::cast_sign_loss)] // OpenCV dimensions are positive
pub fn mat_to_rgb(mat: &Mat) -> Result<Frame> {
    let rows = mat.rows();
    let cols = mat.cols();
    if rows <= 0 || cols <= 0 || mat.typ() != CV_8UC3 {
        return Err(Error::InvalidInput(format!(
            "Expected a non-empty 8-bit BGR image, got {}x{} of type {}",
            cols,
            rows,
            mat.typ()
        )));
    }

    let continuous;
    let source = if mat.is_continuous() {
        mat
    } else {
        continuous = mat.try_clone()?;
        &continuous
    };

    let raw: Vec<u8> = source
        .data_bytes()?
        .chunks_exact(3)
        .flat_map(|bgr| [bgr[2], bgr[1], bgr[0]])
        .collect();

    RgbImage::from_raw(cols as u32, rows as u32, raw)
        .ok_or_else(|| Error::InvalidInput("Mat data does not match its dimensions".to_string()))
}

//! Display canvas composition and the score overlay.
//!
//! The canvas is larger than the camera frame: the frame sits in the top-left
//! corner, and the panel to its right holds the dimensional bars (arousal and
//! valence, drawn from the panel center) and one bar per categorical class
//! starting at the configured vertical offset.

use crate::{
    collaborators::OverlayRenderer,
    config::DisplayConfig,
    emotion::{CategoricalResult, DimensionalResult, Emotion},
    frame::{FaceDetection, Frame},
    Result,
};
use image::{imageops, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut},
    rect::Rect,
};

const PANEL_MARGIN: u32 = 20;
const BAR_HEIGHT: u32 = 24;
const BAR_SPACING: u32 = 40;
const DIMENSIONAL_TOP: u32 = 40;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const TRACK_COLOR: Rgb<u8> = Rgb([60, 60, 60]);
const AROUSAL_COLOR: Rgb<u8> = Rgb([255, 140, 0]);
const VALENCE_COLOR: Rgb<u8> = Rgb([0, 160, 255]);

/// Copy a frame onto a black canvas of the given size
#[must_use]
pub fn compose_canvas(frame: &Frame, width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::new(width.max(frame.width()), height.max(frame.height()));
    imageops::replace(&mut canvas, frame, 0, 0);
    canvas
}

/// Bar color of a categorical class
#[must_use]
pub const fn emotion_color(emotion: Emotion) -> Rgb<u8> {
    match emotion {
        Emotion::Neutral => Rgb([200, 200, 200]),
        Emotion::Happiness => Rgb([255, 220, 0]),
        Emotion::Surprise => Rgb([255, 120, 220]),
        Emotion::Sadness => Rgb([70, 110, 255]),
        Emotion::Anger => Rgb([255, 40, 40]),
        Emotion::Disgust => Rgb([120, 200, 60]),
        Emotion::Fear => Rgb([160, 60, 220]),
        Emotion::Contempt => Rgb([150, 100, 60]),
    }
}

/// Draws detection boxes and score bars
#[derive(Debug, Clone)]
pub struct ScoreOverlay {
    panel_x: u32,
    panel_width: u32,
    categorical_offset: u32,
}

impl ScoreOverlay {
    /// Lay the panel out to the right of a `frame_width` wide frame
    #[must_use]
    pub fn new(display: &DisplayConfig, frame_width: u32) -> Self {
        let panel_x = frame_width + PANEL_MARGIN;
        let panel_width = display
            .canvas_width
            .saturating_sub(panel_x)
            .saturating_sub(PANEL_MARGIN);

        Self {
            panel_x,
            panel_width,
            categorical_offset: display.categorical_offset,
        }
    }

    /// Length in pixels of a bar for `score` out of `full_scale`
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn bar_length(score: f32, full_scale: f32, max_length: u32) -> u32 {
        if !score.is_finite() || score <= 0.0 || full_scale <= 0.0 {
            return 0;
        }
        let fraction = (score / full_scale).min(1.0);
        (fraction * max_length as f32).round() as u32
    }

    fn draw_categorical(&self, canvas: &mut RgbImage, categorical: &CategoricalResult) {
        let highlighted = categorical.highest_matching();

        for (i, &(emotion, score)) in categorical.scores().iter().enumerate() {
            let y = self.categorical_offset + BAR_SPACING * i as u32;
            fill(canvas, self.panel_x, y, self.panel_width, BAR_HEIGHT, TRACK_COLOR);

            let length = Self::bar_length(score, 100.0, self.panel_width);
            fill(canvas, self.panel_x, y, length, BAR_HEIGHT, emotion_color(emotion));

            if Some(emotion) == highlighted {
                outline(canvas, self.panel_x, y, self.panel_width, BAR_HEIGHT, Rgb([255, 255, 255]));
            }
        }
    }

    fn draw_dimensional(&self, canvas: &mut RgbImage, dimensional: &DimensionalResult) {
        let half = self.panel_width / 2;
        let center = self.panel_x + half;

        for (i, (value, color)) in [
            (dimensional.arousal(), AROUSAL_COLOR),
            (dimensional.valence(), VALENCE_COLOR),
        ]
        .into_iter()
        .enumerate()
        {
            let y = DIMENSIONAL_TOP + BAR_SPACING * i as u32;
            fill(canvas, self.panel_x, y, self.panel_width, BAR_HEIGHT, TRACK_COLOR);

            let Some(value) = value else { continue };
            let length = Self::bar_length(value.abs(), 100.0, half);
            if value >= 0.0 {
                fill(canvas, center, y, length, BAR_HEIGHT, color);
            } else {
                fill(canvas, center - length, y, length, BAR_HEIGHT, color);
            }
        }
    }
}

impl OverlayRenderer for ScoreOverlay {
    fn render(
        &mut self,
        canvas: &mut RgbImage,
        detections: &[FaceDetection],
        categorical: &CategoricalResult,
        dimensional: &DimensionalResult,
    ) -> Result<()> {
        for detection in detections {
            let r = detection.region;
            outline(canvas, r.x, r.y, r.width, r.height, BOX_COLOR);
        }

        if self.panel_width > 0 {
            self.draw_dimensional(canvas, dimensional);
            self.draw_categorical(canvas, categorical);
        }

        Ok(())
    }
}

#[allow(clippy::cast_possible_wrap)]
fn rect(x: u32, y: u32, width: u32, height: u32) -> Option<Rect> {
    (width > 0 && height > 0).then(|| Rect::at(x as i32, y as i32).of_size(width, height))
}

fn fill(canvas: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    if let Some(r) = rect(x, y, width, height) {
        draw_filled_rect_mut(canvas, r, color);
    }
}

fn outline(canvas: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    if let Some(r) = rect(x, y, width, height) {
        draw_hollow_rect_mut(canvas, r, color);
    }
}

//! `highgui` window.

use super::conversion::rgb_to_mat;
use crate::{collaborators::FrameDisplay, Result};
use image::RgbImage;
use opencv::highgui::{self, WINDOW_AUTOSIZE};

/// A named `highgui` window, created on first use
pub struct HighGuiDisplay {
    title: String,
    created: bool,
}

impl HighGuiDisplay {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created: false,
        }
    }
}

impl FrameDisplay for HighGuiDisplay {
    fn show(&mut self, canvas: &RgbImage) -> Result<()> {
        if !self.created {
            highgui::named_window(&self.title, WINDOW_AUTOSIZE)?;
            self.created = true;
        }
        highgui::imshow(&self.title, &rgb_to_mat(canvas)?)?;
        Ok(())
    }

    #[allow(clippy::cast_sign_loss)]
    fn poll_key(&mut self) -> Result<Option<char>> {
        let key = highgui::wait_key(1)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(char::from_u32((key & 0xff) as u32))
    }

    fn close(&mut self) -> Result<()> {
        if self.created {
            highgui::destroy_window(&self.title)?;
            self.created = false;
        }
        Ok(())
    }
}

//! Horizontal text layout: ligature substitution, kerning and advances.
//!
//! Measuring and drawing share one walk over the codes so that the width
//! `measure` reports is exactly how far `draw` moves the pen.

use super::font_driver::{Antialias, FontDriver};
use super::font_manager::Font;
use super::SUBPIX;
use crate::color::Rgb;
use crate::compositor::Framebuffer;
use crate::error::Result;
use crate::gamma::GammaTable;
use crate::text::{LIG_FI, LIG_FL};

/// Yields codes with "fi" and "fl" folded into their ligature codes.
///
/// Substitution is greedy from left to right and only happens when enabled.
#[derive(Debug, Clone)]
pub struct Ligatures<'a> {
    text: &'a [u8],
    pos: usize,
    enabled: bool,
}

impl<'a> Ligatures<'a> {
    pub fn new(text: &'a [u8], enabled: bool) -> Self {
        Self {
            text,
            pos: 0,
            enabled,
        }
    }
}

impl Iterator for Ligatures<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let c = *self.text.get(self.pos)?;
        self.pos += 1;
        if self.enabled && c == b'f' {
            match self.text.get(self.pos) {
                Some(b'i') => {
                    self.pos += 1;
                    return Some(LIG_FI);
                }
                Some(b'l') => {
                    self.pos += 1;
                    return Some(LIG_FL);
                }
                _ => {}
            }
        }
        Some(c)
    }
}

/// Borrowed rasterization settings for one layout call.
pub struct Shaper<'a, D: FontDriver> {
    driver: &'a D,
    gamma: &'a GammaTable,
    mode: Antialias,
}

impl<'a, D: FontDriver> Shaper<'a, D> {
    pub fn new(driver: &'a D, gamma: &'a GammaTable, mode: Antialias) -> Self {
        Self {
            driver,
            gamma,
            mode,
        }
    }

    /// Width of `text` in 1/`SUBPIX` pixel units.
    ///
    /// `space_width`, when given and non-negative, replaces the advance of
    /// the space character.
    pub fn measure(&self, font: &mut Font<D>, text: &[u8], space_width: Option<i32>) -> Result<i32> {
        self.walk(font, 0, text, space_width, |_, _, _| {})
    }

    /// Draws `text` with the pen starting at subpixel `x` on baseline `y`
    /// and returns the final pen position.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        font: &mut Font<D>,
        fb: &mut Framebuffer,
        x: i32,
        y: i32,
        color: Rgb,
        text: &[u8],
        space_width: Option<i32>,
    ) -> Result<i32> {
        let mode = self.mode;
        self.walk(font, x, text, space_width, |font, code, pen| {
            let px = pen.div_euclid(SUBPIX);
            let phase = pen.rem_euclid(SUBPIX) as usize;
            if let Some(bitmap) = font.bitmap(code, phase) {
                bitmap.draw(fb, px, y, color, mode);
            }
        })
    }

    /// Steps the pen over `text`, calling `visit` with each code and the pen
    /// position it is placed at after kerning.
    fn walk(
        &self,
        font: &mut Font<D>,
        start: i32,
        text: &[u8],
        space_width: Option<i32>,
        mut visit: impl FnMut(&Font<D>, u8, i32),
    ) -> Result<i32> {
        let space_width = space_width.filter(|w| *w >= 0);
        let mut pen = start;
        let mut prev: Option<u8> = None;

        for code in Ligatures::new(text, font.ligatures()) {
            font.load_glyph(self.driver, self.gamma, self.mode, code)?;
            if let Some(p) = prev {
                pen += font.kerning(self.driver, p, code)?;
            }
            visit(font, code, pen);
            pen += match space_width {
                Some(w) if code == b' ' => w,
                _ => font.advance(code),
            };
            prev = Some(code);
        }
        Ok(pen)
    }
}

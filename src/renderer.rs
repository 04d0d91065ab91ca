// src/renderer.rs

//! The drawing context.
//!
//! A `TextRenderer` owns everything the drawing calls need: the font driver,
//! the gamma table, the eight fonts with their glyph caches, and the line and
//! caret metrics. Callers own the `Framebuffer` and pass it to each call;
//! the renderer never resizes or keeps it.
//!
//! Horizontal text positions are in subpixel units (`SUBPIX` per pixel);
//! vertical positions, pictures, rectangles and the caret's `y` are pixels.

use crate::caret::{caret_rects, CaretMetrics, CaretShape};
use crate::color::{ChannelOrder, Rgb};
use crate::compositor::{Framebuffer, Picture, Rect};
use crate::config::DrawConfig;
use crate::error::{FontError, Result};
use crate::gamma::GammaTable;
use crate::rasterizer::layout::Shaper;
use crate::rasterizer::{
    Antialias, BuiltinFonts, Font, FontDriver, FontSet, FontSlot, FreeTypeDriver, SUBPIX,
};
use log::*;

pub struct TextRenderer<D: FontDriver = FreeTypeDriver> {
    driver: D,
    gamma: GammaTable,
    fonts: FontSet<D>,
    antialias: Antialias,
    channel_order: ChannelOrder,
    cell_width: i32,
    cell_height: i32,
    baseline: i32,
    leading: i32,
    caret_shape: CaretShape,
    caret_color: Rgb,
}

impl TextRenderer<FreeTypeDriver> {
    /// Starts FreeType and loads the configured fonts.
    pub fn with_freetype(config: &DrawConfig, builtins: &dyn BuiltinFonts) -> Result<Self> {
        let driver = FreeTypeDriver::new().map_err(FontError::EngineInit)?;
        Self::new(config, driver, builtins)
    }
}

impl<D: FontDriver> TextRenderer<D> {
    /// Loads all eight fonts and derives the cell size from the width of
    /// `'0'` in the regular monospace font.
    pub fn new(config: &DrawConfig, driver: D, builtins: &dyn BuiltinFonts) -> Result<Self> {
        info!(
            "TextRenderer: antialias={:?}, gamma={}, channel order {:?}",
            config.antialias, config.gamma, config.channel_order
        );
        let gamma = GammaTable::new(config.gamma);
        let mut fonts = FontSet::load(&driver, builtins, config)?;

        let mono = fonts.get_mut(FontSlot::MonoRegular);
        mono.load_glyph(&driver, &gamma, config.antialias, b'0')?;
        let cell_width = (mono.advance(b'0') + SUBPIX - 1) / SUBPIX;
        let cell_height = config.leading;
        info!("TextRenderer: cell size {}x{}", cell_width, cell_height);

        Ok(Self {
            driver,
            gamma,
            fonts,
            antialias: config.antialias,
            channel_order: config.channel_order,
            cell_width,
            cell_height,
            baseline: config.baseline,
            leading: config.leading,
            caret_shape: CaretShape::from(config.caret_shape),
            caret_color: config.caret_color,
        })
    }

    /// `(width, height)` of a monospace cell in pixels.
    pub fn cell_size(&self) -> (i32, i32) {
        (self.cell_width, self.cell_height)
    }

    pub fn font(&self, slot: FontSlot) -> &Font<D> {
        self.fonts.get(slot)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// A blank framebuffer in the configured channel order.
    pub fn framebuffer(&self, width: usize, height: usize) -> Framebuffer {
        Framebuffer::new(width, height, self.channel_order)
    }

    /// Width of `text` in `slot`, in subpixel units.
    ///
    /// `space_width` (subpixels) replaces the advance of spaces when given.
    pub fn measure_string(
        &mut self,
        slot: FontSlot,
        text: &[u8],
        space_width: Option<i32>,
    ) -> Result<i32> {
        let shaper = Shaper::new(&self.driver, &self.gamma, self.antialias);
        shaper.measure(self.fonts.get_mut(slot), text, space_width)
    }

    /// Draws `text` with the pen at subpixel `x` on baseline `y` and returns
    /// the pen position after the last glyph.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_string(
        &mut self,
        fb: &mut Framebuffer,
        slot: FontSlot,
        x: i32,
        y: i32,
        color: Rgb,
        text: &[u8],
        space_width: Option<i32>,
    ) -> Result<i32> {
        trace!("draw_string: {:?} at ({}, {}), {} codes", slot, x, y, text.len());
        let shaper = Shaper::new(&self.driver, &self.gamma, self.antialias);
        shaper.draw(self.fonts.get_mut(slot), fb, x, y, color, text, space_width)
    }

    /// Draws the configured caret with its pen at subpixel `x` on baseline `y`.
    pub fn draw_caret(&self, fb: &mut Framebuffer, x: i32, y: i32) {
        for r in caret_rects(x, y, self.caret_shape, self.caret_metrics()) {
            fb.fill_rect(r.x, r.y, r.w, r.h, self.caret_color);
        }
    }

    pub fn caret_metrics(&self) -> CaretMetrics {
        CaretMetrics {
            baseline: self.baseline,
            leading: self.leading,
            cell_width: self.cell_width,
        }
    }

    /// Composites `pic` at pixel `(x, y)`, limited to `clip`.
    pub fn draw_picture(&self, fb: &mut Framebuffer, pic: &Picture, x: i32, y: i32, clip: Rect) {
        fb.composite_picture(pic, x, y, clip);
    }

    /// Fills a pixel rectangle; returns the number of pixels written.
    pub fn draw_rect(&self, fb: &mut Framebuffer, x: i32, y: i32, w: i32, h: i32, rgb: Rgb) -> usize {
        fb.fill_rect(x, y, w, h, rgb)
    }

    pub fn clear(&self, fb: &mut Framebuffer, rgb: Rgb) {
        fb.clear(rgb);
    }
}

//! Per-font glyph cache.
//!
//! Each of the 256 character codes is rasterized lazily, once per subpixel
//! phase, and kept until the font is dropped. There is no eviction; the code
//! space is closed.

use super::font_driver::{Antialias, FontDriver, RawGlyph};
use super::SUBPIXEL_PHASES;
use crate::color::Rgb;
use crate::compositor::Framebuffer;
use crate::error::EngineError;
use crate::gamma::GammaTable;
use crate::text;
use log::trace;

/// LCD filter taps, in 1/255ths, centered on the sample being filtered.
const LCD_FILTER: [u32; 5] = [28, 56, 85, 56, 28];

/// Gamma-corrected coverage for one glyph at one subpixel phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphBitmap {
    /// Samples per row; three per pixel for LCD bitmaps.
    pub width: usize,
    pub height: usize,
    pub lsb: i32,
    pub top: i32,
    pub pitch: usize,
    pub data: Vec<u8>,
}

impl GlyphBitmap {
    fn from_raw(raw: &RawGlyph, gamma: &GammaTable, mode: Antialias) -> Self {
        let data = match mode {
            Antialias::Grayscale => gamma_copy(gamma, &raw.buffer),
            Antialias::Lcd => gamma_copy_lcd(gamma, &raw.buffer, raw.width, raw.rows, raw.pitch),
        };
        Self {
            width: raw.width,
            height: raw.rows,
            lsb: raw.left,
            top: raw.top,
            pitch: raw.pitch,
            data,
        }
    }

    /// Blends the bitmap with its pen position at pixel `(x, y)` on the baseline.
    pub fn draw(&self, fb: &mut Framebuffer, x: i32, y: i32, color: Rgb, mode: Antialias) {
        let x0 = x + self.lsb;
        let y0 = y - self.top;
        for (k, row) in self.data.chunks(self.pitch.max(1)).take(self.height).enumerate() {
            let py = y0 + k as i32;
            match mode {
                Antialias::Grayscale => {
                    for (i, &c) in row[..self.width].iter().enumerate() {
                        fb.blend_pixel(x0 + i as i32, py, c, color);
                    }
                }
                Antialias::Lcd => {
                    for (j, c) in row[..self.width].chunks_exact(3).enumerate() {
                        fb.blend_pixel_lcd(x0 + j as i32, py, [c[0], c[1], c[2]], color);
                    }
                }
            }
        }
    }
}

/// Remaps grayscale coverage through the gamma table.
pub fn gamma_copy(gamma: &GammaTable, src: &[u8]) -> Vec<u8> {
    src.iter().map(|&c| gamma.map(c)).collect()
}

/// Gamma-corrects LCD coverage and runs the 5-tap filter along each row.
///
/// `width` counts samples (three per pixel). Samples beyond either end of a
/// row read as zero. Each tap is rounded down on its own before summing, so
/// a uniform interior run of 255 comes out as 253.
///
/// Every sample the filter reads is gamma-mapped first, neighbours
/// included. Filtering raw neighbours around a mapped centre only agrees
/// with this at gamma 1.0.
pub fn gamma_copy_lcd(gamma: &GammaTable, src: &[u8], width: usize, rows: usize, pitch: usize) -> Vec<u8> {
    let mut dst = vec![0u8; pitch * rows];
    let mut corrected = vec![0u8; width];
    for y in 0..rows {
        let row = &src[y * pitch..y * pitch + width];
        for (c, &s) in corrected.iter_mut().zip(row) {
            *c = gamma.map(s);
        }
        let sample = |i: isize| -> u32 {
            if i < 0 || i as usize >= width {
                0
            } else {
                u32::from(corrected[i as usize])
            }
        };
        let out = &mut dst[y * pitch..y * pitch + width];
        for (i, d) in out.iter_mut().enumerate() {
            let i = i as isize;
            let sum: u32 = LCD_FILTER
                .iter()
                .enumerate()
                .map(|(t, &w)| sample(i + t as isize - 2) * w / 255)
                .sum();
            *d = sum as u8;
        }
    }
    dst
}

/// The 256-slot table for one font.
///
/// A code's bitmaps are `None` until first use; once filled they never change.
#[derive(Debug, Clone)]
pub struct GlyphCache {
    advances: [i32; 256],
    glyphs: Vec<Option<Box<[GlyphBitmap]>>>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self {
            advances: [0; 256],
            glyphs: vec![None; 256],
        }
    }

    pub fn is_loaded(&self, code: u8) -> bool {
        self.glyphs[code as usize].is_some()
    }

    /// Advance width in 1/`SUBPIXEL_PHASES` pixel units; 0 if not loaded.
    pub fn advance(&self, code: u8) -> i32 {
        self.advances[code as usize]
    }

    /// Bitmap for `code` at `phase`, if loaded.
    pub fn bitmap(&self, code: u8, phase: usize) -> Option<&GlyphBitmap> {
        self.glyphs[code as usize].as_ref().and_then(|g| g.get(phase))
    }

    /// Rasterizes `code` at every subpixel phase. Does nothing if already
    /// loaded. Leaves the slot untouched if any phase fails.
    pub fn load<D: FontDriver>(
        &mut self,
        driver: &D,
        face: &mut D::Face,
        gamma: &GammaTable,
        mode: Antialias,
        code: u8,
    ) -> Result<(), EngineError> {
        if self.is_loaded(code) {
            return Ok(());
        }

        let ch = text::to_unicode(code);
        let glyph = driver
            .glyph_index(face, ch)
            .or_else(|| driver.glyph_index(face, '?'))
            .unwrap_or(0);
        trace!("GlyphCache: loading code {:#04x} ({:?}) as glyph {}", code, ch, glyph);

        let mut phases = Vec::with_capacity(SUBPIXEL_PHASES);
        let mut advance = 0;
        for phase in 0..SUBPIXEL_PHASES {
            let offset = (phase as i64 * 64) / SUBPIXEL_PHASES as i64;
            let raw = driver.rasterize(face, glyph, offset, mode)?;
            advance = ((raw.advance_x * SUBPIXEL_PHASES as i64 + 32) / 64) as i32;
            phases.push(GlyphBitmap::from_raw(&raw, gamma, mode));
        }

        self.advances[code as usize] = advance;
        self.glyphs[code as usize] = Some(phases.into_boxed_slice());
        Ok(())
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        GlyphCache::new()
    }
}

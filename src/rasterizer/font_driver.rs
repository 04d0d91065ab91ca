//! Font engine primitives.
//!
//! This module defines the `FontDriver` trait, a thin layer over the engine
//! that opens faces and rasterizes glyphs (FreeType in production, a
//! deterministic mock in tests).

use crate::error::EngineError;
use std::path::Path;

/// Antialiasing mode used when rasterizing glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Antialias {
    /// One coverage byte per pixel.
    #[default]
    Grayscale,
    /// Three horizontal coverage samples per pixel.
    Lcd,
}

/// A glyph as the engine rendered it, before gamma correction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawGlyph {
    /// Horizontal offset from the pen position to the bitmap's left edge.
    pub left: i32,
    /// Distance from the baseline up to the bitmap's top row.
    pub top: i32,
    /// Samples per row (three per pixel in LCD mode).
    pub width: usize,
    pub rows: usize,
    /// Bytes per row in `buffer`, at least `width`.
    pub pitch: usize,
    /// Horizontal advance in 26.6 fixed point.
    pub advance_x: i64,
    /// `pitch * rows` coverage bytes.
    pub buffer: Vec<u8>,
}

/// Platform font engine.
///
/// Implementors wrap the engine calls; `FontSet`, the glyph cache and layout
/// are written against this trait only.
pub trait FontDriver {
    /// Engine face handle.
    type Face;

    /// Opens a face from font file bytes.
    fn open_memory_face(&self, bytes: Vec<u8>) -> Result<Self::Face, EngineError>;

    /// Opens a face from a file on disk.
    fn open_file_face(&self, path: &Path) -> Result<Self::Face, EngineError>;

    /// Attaches an auxiliary metrics file (AFM for Type 1 fonts).
    fn attach_metrics(&self, face: &mut Self::Face, path: &Path) -> Result<(), EngineError>;

    /// Sets the nominal size. Widths are 26.6 points at `dpi`.
    fn set_char_size(
        &self,
        face: &mut Self::Face,
        width_26_6: i64,
        height_26_6: i64,
        dpi: u32,
    ) -> Result<(), EngineError>;

    fn select_unicode_charmap(&self, face: &mut Self::Face) -> Result<(), EngineError>;

    fn is_fixed_width(&self, face: &Self::Face) -> bool;

    /// Glyph index for a Unicode scalar, `None` if the face lacks it.
    fn glyph_index(&self, face: &Self::Face, ch: char) -> Option<u32>;

    /// Loads `glyph` (no embedded bitmaps, no hinting) translated right by
    /// `offset_x` 26.6 units, and renders it in `mode`.
    fn rasterize(
        &self,
        face: &mut Self::Face,
        glyph: u32,
        offset_x: i64,
        mode: Antialias,
    ) -> Result<RawGlyph, EngineError>;

    /// Unfitted kerning between two glyphs, horizontal component in 26.6.
    fn kerning(&self, face: &Self::Face, left: u32, right: u32) -> Result<i64, EngineError>;
}

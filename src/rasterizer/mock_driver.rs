// src/rasterizer/mock_driver.rs

//! Deterministic in-memory `FontDriver` for unit tests.

#![cfg(test)]

use super::font_driver::{Antialias, FontDriver, RawGlyph};
use crate::error::EngineError;
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Default advance: 8 px in 26.6.
const DEFAULT_ADVANCE: i64 = 8 * 64;

#[derive(Debug, Clone, Default)]
pub struct MockFace {
    glyphs: HashMap<char, u32>,
    advances: HashMap<u32, i64>,
    kerning: HashMap<(u32, u32), i64>,
    fixed_width: bool,
    fail_rasterize: HashSet<u32>,
    fail_kerning: bool,
    pub fail_size: bool,
    pub fail_charmap: bool,
    pub char_size: Option<(i64, i64, u32)>,
    pub charmap_selected: bool,
    pub attached: Vec<PathBuf>,
}

impl MockFace {
    fn with_chars(chars: impl IntoIterator<Item = char>, fixed_width: bool) -> Self {
        let mut face = MockFace {
            fixed_width,
            ..Default::default()
        };
        for (i, ch) in chars.into_iter().enumerate() {
            let gid = i as u32 + 1;
            face.glyphs.insert(ch, gid);
            face.advances.insert(gid, DEFAULT_ADVANCE);
        }
        face
    }

    fn latin1() -> impl Iterator<Item = char> {
        (0x20u8..0x7F).chain(0xA0..=0xFF).map(char::from)
    }

    /// Latin-1, both ligatures, curly quotes and the en dash; no em dash.
    /// Space is 4 px wide, 'A' followed by 'V' kerns by -1.5 px.
    pub fn proportional() -> Self {
        let extra = ['\u{FB01}', '\u{FB02}', '‘', '’', '“', '”', '–'];
        let mut face = Self::with_chars(Self::latin1().chain(extra), false);
        face.set_advance(' ', 4 * 64);
        face.set_kerning('A', 'V', -96);
        face
    }

    /// Fixed-width face that still carries the ligature glyphs.
    pub fn monospace() -> Self {
        Self::with_chars(Self::latin1().chain(['\u{FB01}', '\u{FB02}']), true)
    }

    pub fn without(mut self, ch: char) -> Self {
        self.glyphs.remove(&ch);
        self
    }

    pub fn glyph_for(&self, ch: char) -> Option<u32> {
        self.glyphs.get(&ch).copied()
    }

    pub fn set_advance(&mut self, ch: char, advance_26_6: i64) {
        if let Some(gid) = self.glyph_for(ch) {
            self.advances.insert(gid, advance_26_6);
        }
    }

    pub fn set_kerning(&mut self, left: char, right: char, kern_26_6: i64) {
        if let (Some(l), Some(r)) = (self.glyph_for(left), self.glyph_for(right)) {
            self.kerning.insert((l, r), kern_26_6);
        }
    }

    pub fn fail_rasterize_on(&mut self, ch: char) {
        if let Some(gid) = self.glyph_for(ch) {
            self.fail_rasterize.insert(gid);
        }
    }

    pub fn fail_kerning(&mut self) {
        self.fail_kerning = true;
    }
}

/// Serves faces registered by path or by memory contents.
///
/// Memory faces: the bytes `b"prop"` open a proportional face, `b"mono"` a
/// monospace one; anything else is rejected as an unknown format.
#[derive(Debug, Default)]
pub struct MockDriver {
    files: HashMap<PathBuf, MockFace>,
    metrics: HashSet<PathBuf>,
    rasterize_calls: Cell<usize>,
    kerning_calls: Cell<usize>,
    last_glyph: Cell<Option<u32>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, face: MockFace) -> Self {
        self.files.insert(path.into(), face);
        self
    }

    pub fn with_metrics(mut self, path: impl Into<PathBuf>) -> Self {
        self.metrics.insert(path.into());
        self
    }

    pub fn rasterize_calls(&self) -> usize {
        self.rasterize_calls.get()
    }

    pub fn kerning_calls(&self) -> usize {
        self.kerning_calls.get()
    }

    pub fn last_glyph(&self) -> Option<u32> {
        self.last_glyph.get()
    }
}

impl FontDriver for MockDriver {
    type Face = MockFace;

    fn open_memory_face(&self, bytes: Vec<u8>) -> Result<MockFace, EngineError> {
        match bytes.as_slice() {
            b"prop" => Ok(MockFace::proportional()),
            b"mono" => Ok(MockFace::monospace()),
            _ => Err(EngineError::new("FT_New_Memory_Face", "UnknownFileFormat")),
        }
    }

    fn open_file_face(&self, path: &Path) -> Result<MockFace, EngineError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| EngineError::new("FT_New_Face", "CannotOpenResource"))
    }

    fn attach_metrics(&self, face: &mut MockFace, path: &Path) -> Result<(), EngineError> {
        if !self.metrics.contains(path) {
            return Err(EngineError::new("FT_Attach_File", "CannotOpenResource"));
        }
        face.attached.push(path.to_path_buf());
        Ok(())
    }

    fn set_char_size(
        &self,
        face: &mut MockFace,
        width_26_6: i64,
        height_26_6: i64,
        dpi: u32,
    ) -> Result<(), EngineError> {
        if face.fail_size {
            return Err(EngineError::new("FT_Set_Char_Size", "InvalidPixelSize"));
        }
        face.char_size = Some((width_26_6, height_26_6, dpi));
        Ok(())
    }

    fn select_unicode_charmap(&self, face: &mut MockFace) -> Result<(), EngineError> {
        if face.fail_charmap {
            return Err(EngineError::new("FT_Select_Charmap", "InvalidCharMapHandle"));
        }
        face.charmap_selected = true;
        Ok(())
    }

    fn is_fixed_width(&self, face: &MockFace) -> bool {
        face.fixed_width
    }

    fn glyph_index(&self, face: &MockFace, ch: char) -> Option<u32> {
        face.glyph_for(ch)
    }

    /// Bitmaps are 2 px wide and 3 rows tall, filled with 200. The 26.6
    /// offset comes back as the left bearing so tests can see which phase
    /// produced which bitmap.
    fn rasterize(
        &self,
        face: &mut MockFace,
        glyph: u32,
        offset_x: i64,
        mode: Antialias,
    ) -> Result<RawGlyph, EngineError> {
        self.rasterize_calls.set(self.rasterize_calls.get() + 1);
        self.last_glyph.set(Some(glyph));
        if face.fail_rasterize.contains(&glyph) {
            return Err(EngineError::new("FT_Render_Glyph", "CannotRenderGlyph"));
        }
        let width = match mode {
            Antialias::Grayscale => 2,
            Antialias::Lcd => 6,
        };
        let rows = 3;
        Ok(RawGlyph {
            left: offset_x as i32,
            top: 3,
            width,
            rows,
            pitch: width,
            advance_x: face.advances.get(&glyph).copied().unwrap_or(DEFAULT_ADVANCE),
            buffer: vec![200; width * rows],
        })
    }

    fn kerning(&self, face: &MockFace, left: u32, right: u32) -> Result<i64, EngineError> {
        self.kerning_calls.set(self.kerning_calls.get() + 1);
        if face.fail_kerning {
            return Err(EngineError::new("FT_Get_Kerning", "InvalidGlyphIndex"));
        }
        Ok(face.kerning.get(&(left, right)).copied().unwrap_or(0))
    }
}

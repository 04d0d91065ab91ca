//! FreeType implementation of `FontDriver`.

use super::font_driver::{Antialias, FontDriver, RawGlyph};
use crate::error::EngineError;
use freetype::face::{KerningMode, LoadFlag};
use freetype::render_mode::RenderMode;
use freetype::{ffi, Face, Library};
use log::info;
use std::path::Path;
use std::ptr;
use std::rc::Rc;

/// Owns the FreeType library handle shared by every face it opens.
pub struct FreeTypeDriver {
    library: Library,
}

impl FreeTypeDriver {
    pub fn new() -> Result<Self, EngineError> {
        let library = Library::init().map_err(|e| EngineError::new("FT_Init_FreeType", e))?;
        info!("FreeTypeDriver: library initialized");
        Ok(Self { library })
    }

    /// Translates every subsequently loaded glyph by `delta`; `None` resets.
    fn set_transform(face: &mut Face, delta: Option<ffi::FT_Vector>) {
        let mut delta = delta;
        let delta_ptr = delta.as_mut().map_or(ptr::null_mut(), |d| d as *mut _);
        // SAFETY: the face pointer is live for the duration of the borrow and
        // FreeType copies the delta vector.
        unsafe {
            ffi::FT_Set_Transform(face.raw_mut() as *mut _, ptr::null_mut(), delta_ptr);
        }
    }
}

fn render_slot(face: &Face, glyph: u32, mode: Antialias) -> Result<RawGlyph, EngineError> {
    face.load_glyph(glyph, LoadFlag::NO_BITMAP | LoadFlag::NO_HINTING)
        .map_err(|e| EngineError::new("FT_Load_Glyph", e))?;

    let slot = face.glyph();
    let render_mode = match mode {
        Antialias::Grayscale => RenderMode::Light,
        Antialias::Lcd => RenderMode::Lcd,
    };
    slot.render_glyph(render_mode)
        .map_err(|e| EngineError::new("FT_Render_Glyph", e))?;

    let bitmap = slot.bitmap();
    let width = bitmap.width().max(0) as usize;
    let rows = bitmap.rows().max(0) as usize;
    let pitch = bitmap.pitch().unsigned_abs() as usize;
    let buffer = if width == 0 || rows == 0 {
        Vec::new()
    } else {
        bitmap.buffer()[..pitch * rows].to_vec()
    };

    Ok(RawGlyph {
        left: slot.bitmap_left(),
        top: slot.bitmap_top(),
        width,
        rows,
        pitch: if buffer.is_empty() { 0 } else { pitch },
        advance_x: slot.advance().x as i64,
        buffer,
    })
}

impl FontDriver for FreeTypeDriver {
    type Face = Face;

    fn open_memory_face(&self, bytes: Vec<u8>) -> Result<Face, EngineError> {
        self.library
            .new_memory_face(Rc::new(bytes), 0)
            .map_err(|e| EngineError::new("FT_New_Memory_Face", e))
    }

    fn open_file_face(&self, path: &Path) -> Result<Face, EngineError> {
        self.library
            .new_face(path.as_os_str(), 0)
            .map_err(|e| EngineError::new("FT_New_Face", e))
    }

    fn attach_metrics(&self, face: &mut Face, path: &Path) -> Result<(), EngineError> {
        let path = path
            .to_str()
            .ok_or_else(|| EngineError::new("FT_Attach_File", "non-UTF-8 path"))?;
        face.attach_file(path)
            .map_err(|e| EngineError::new("FT_Attach_File", e))
    }

    fn set_char_size(
        &self,
        face: &mut Face,
        width_26_6: i64,
        height_26_6: i64,
        dpi: u32,
    ) -> Result<(), EngineError> {
        face.set_char_size(width_26_6 as isize, height_26_6 as isize, dpi, dpi)
            .map_err(|e| EngineError::new("FT_Set_Char_Size", e))
    }

    fn select_unicode_charmap(&self, face: &mut Face) -> Result<(), EngineError> {
        // SAFETY: plain FFI call on a live face.
        let err = unsafe { ffi::FT_Select_Charmap(face.raw_mut() as *mut _, ffi::FT_ENCODING_UNICODE) };
        if err != 0 {
            return Err(EngineError::new("FT_Select_Charmap", err));
        }
        Ok(())
    }

    fn is_fixed_width(&self, face: &Face) -> bool {
        face.is_fixed_width()
    }

    fn glyph_index(&self, face: &Face, ch: char) -> Option<u32> {
        face.get_char_index(ch as usize).filter(|&g| g != 0)
    }

    fn rasterize(
        &self,
        face: &mut Face,
        glyph: u32,
        offset_x: i64,
        mode: Antialias,
    ) -> Result<RawGlyph, EngineError> {
        let delta = ffi::FT_Vector {
            x: offset_x as ffi::FT_Pos,
            y: 0,
        };
        Self::set_transform(face, Some(delta));

        let result = render_slot(face, glyph, mode);
        Self::set_transform(face, None);
        result
    }

    fn kerning(&self, face: &Face, left: u32, right: u32) -> Result<i64, EngineError> {
        face.get_kerning(left, right, KerningMode::KerningUnfitted)
            .map(|v| v.x as i64)
            .map_err(|e| EngineError::new("FT_Get_Kerning", e))
    }
}

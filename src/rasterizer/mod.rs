//! Glyph rasterization, caching and text layout.
//!
//! ```text
//! DrawConfig → FontSet (8 faces) → GlyphCache (256 codes × K phases)
//!                                       ↓
//!                 layout: codes, kerning, advances → Framebuffer
//! ```
//!
//! Horizontal positions are kept in fixed point with `SUBPIXEL_PHASES`
//! subdivisions per pixel. Each glyph is rasterized once per phase, so drawing
//! at a fractional position is a table lookup rather than a resample.

pub mod font_driver;
pub mod font_manager;
pub mod freetype_driver;
pub mod glyph_cache;
pub mod layout;

#[cfg(test)]
pub(crate) mod mock_driver;

pub use font_driver::{Antialias, FontDriver, RawGlyph};
pub use font_manager::{
    BuiltinFonts, Font, FontDirectory, FontSet, FontSlot, FontSource, FontStyle, NoBuiltinFonts,
    BUILTIN_FONT_NAMES,
};
pub use freetype_driver::FreeTypeDriver;
pub use glyph_cache::{GlyphBitmap, GlyphCache};

/// Number of horizontal subpixel phases each glyph is rasterized at.
pub const SUBPIXEL_PHASES: usize = 4;

/// `SUBPIXEL_PHASES` as a signed coordinate divisor.
pub const SUBPIX: i32 = SUBPIXEL_PHASES as i32;

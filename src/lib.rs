//! Glyph rasterization and framebuffer compositing for a text-adventure
//! display.
//!
//! Text is drawn from eight font slots (monospace and proportional, each in
//! regular, bold, italic and bold italic) onto a caller-owned RGB
//! [`Framebuffer`]. Glyphs are rasterized through FreeType at four horizontal
//! subpixel phases, gamma-corrected (and LCD-filtered in subpixel mode), and
//! cached per font on first use.
//!
//! ```no_run
//! use textfb::{DrawConfig, FontDirectory, FontSlot, Rgb, TextRenderer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = DrawConfig::default();
//! let mut renderer = TextRenderer::with_freetype(&config, &FontDirectory::new("fonts"))?;
//! let mut fb = renderer.framebuffer(320, 40);
//! renderer.clear(&mut fb, Rgb::WHITE);
//! let text = textfb::text::encode("Hello, world");
//! renderer.draw_string(&mut fb, FontSlot::PropRegular, 0, 20, Rgb::BLACK, &text, None)?;
//! # Ok(())
//! # }
//! ```

pub mod caret;
pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod gamma;
pub mod rasterizer;
pub mod renderer;
pub mod text;

pub use caret::{CaretMetrics, CaretShape};
pub use color::{ChannelOrder, Rgb};
pub use compositor::{mul255, Framebuffer, Picture, Rect};
pub use config::DrawConfig;
pub use error::{EngineError, FontError};
pub use gamma::GammaTable;
pub use rasterizer::{
    Antialias, BuiltinFonts, FontDirectory, FontSlot, FontStyle, NoBuiltinFonts, SUBPIX,
};
pub use renderer::TextRenderer;

// src/error.rs

//! Error types for font loading and glyph rendering.
//!
//! Font engine failures are surfaced as typed errors instead of aborting.
//! The caller of [`crate::renderer::TextRenderer::new`] decides whether a
//! broken font is fatal.

use std::fmt;

/// A failed call into the font engine.
///
/// `op` names the engine entry point (e.g. `FT_Load_Glyph`), `detail` carries
/// whatever the engine reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{op}: {detail}")]
pub struct EngineError {
    pub op: &'static str,
    pub detail: String,
}

impl EngineError {
    pub fn new(op: &'static str, detail: impl fmt::Debug) -> Self {
        Self {
            op,
            detail: format!("{:?}", detail),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("font engine initialization failed: {0}")]
    EngineInit(#[source] EngineError),

    #[error("failed to load font '{name}': {source}")]
    FontLoad {
        name: String,
        #[source]
        source: EngineError,
    },

    #[error("built-in font '{name}' (index {index}) is not available")]
    MissingBuiltin { name: String, index: usize },

    #[error("failed to rasterize code {code:#04x} in font '{font}': {source}")]
    GlyphRaster {
        font: String,
        code: u8,
        #[source]
        source: EngineError,
    },

    #[error("kerning query failed in font '{font}' for pair ({left:#04x}, {right:#04x}): {source}")]
    Kerning {
        font: String,
        left: u8,
        right: u8,
        #[source]
        source: EngineError,
    },
}

pub type Result<T> = std::result::Result<T, FontError>;

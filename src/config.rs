// src/config.rs

//! Drawing configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes. Files are JSON:
//!
//! ```json
//! { "antialias": "lcd", "gamma": 1.8, "prop_size": 16.0, "caret_shape": 4 }
//! ```

use crate::color::{ChannelOrder, Rgb};
use crate::rasterizer::{Antialias, FontSlot, BUILTIN_FONT_NAMES};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resolved font and drawing settings for a `TextRenderer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub antialias: Antialias,
    /// Exponent of the coverage remap; 1.0 is linear.
    pub gamma: f32,

    // Font names: a built-in identifier or a path.
    pub mono_regular: String,
    pub mono_bold: String,
    pub mono_italic: String,
    pub mono_bold_italic: String,
    pub prop_regular: String,
    pub prop_bold: String,
    pub prop_italic: String,
    pub prop_bold_italic: String,

    /// Point size at 72 dpi, so one point is one pixel.
    pub mono_size: f32,
    /// Horizontal scale applied on top of the size.
    pub mono_aspect: f32,
    pub prop_size: f32,
    pub prop_aspect: f32,

    /// Line height in pixels.
    pub leading: i32,
    /// Distance from the top of a line to its baseline, in pixels.
    pub baseline: i32,

    /// 0 and 1 are small triangles below the baseline, 2 a thin line,
    /// 3 a thick line, anything else a block.
    pub caret_shape: i32,
    pub caret_color: Rgb,

    pub channel_order: ChannelOrder,
}

impl Default for DrawConfig {
    fn default() -> Self {
        let [mr, mb, mi, mz, pr, pb, pi, pz] = BUILTIN_FONT_NAMES.map(String::from);
        DrawConfig {
            antialias: Antialias::Grayscale,
            gamma: 1.0,
            mono_regular: mr,
            mono_bold: mb,
            mono_italic: mi,
            mono_bold_italic: mz,
            prop_regular: pr,
            prop_bold: pb,
            prop_italic: pi,
            prop_bold_italic: pz,
            mono_size: 12.5,
            mono_aspect: 1.0,
            prop_size: 14.7,
            prop_aspect: 1.0,
            leading: 20,
            baseline: 15,
            caret_shape: 2,
            caret_color: Rgb::BLACK,
            channel_order: ChannelOrder::native(),
        }
    }
}

impl DrawConfig {
    /// Reads a JSON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DrawConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded draw config from {}", path.display());
        Ok(config)
    }

    /// Font name, point size and aspect for `slot`.
    pub fn font_for(&self, slot: FontSlot) -> (&str, f32, f32) {
        let name = match slot {
            FontSlot::MonoRegular => &self.mono_regular,
            FontSlot::MonoBold => &self.mono_bold,
            FontSlot::MonoItalic => &self.mono_italic,
            FontSlot::MonoBoldItalic => &self.mono_bold_italic,
            FontSlot::PropRegular => &self.prop_regular,
            FontSlot::PropBold => &self.prop_bold,
            FontSlot::PropItalic => &self.prop_italic,
            FontSlot::PropBoldItalic => &self.prop_bold_italic,
        };
        if slot.is_proportional() {
            (name, self.prop_size, self.prop_aspect)
        } else {
            (name, self.mono_size, self.mono_aspect)
        }
    }
}

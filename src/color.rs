// src/color.rs

//! Defines the RGB color value used by every drawing call and the byte order
//! (`ChannelOrder`) in which the framebuffer stores it.

use serde::{Deserialize, Serialize};

/// An opaque 24-bit color.
///
/// Serialized as a plain `[r, g, b]` array so configuration files stay terse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Byte order of a framebuffer pixel.
///
/// Windows DIB sections store pixels as BGR; everything else this library
/// targets uses RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// The native order for the platform this crate was compiled for.
    pub const fn native() -> Self {
        if cfg!(windows) {
            ChannelOrder::Bgr
        } else {
            ChannelOrder::Rgb
        }
    }

    /// Lays out `color` as the three bytes stored in the framebuffer.
    #[inline]
    pub fn encode(self, color: Rgb) -> [u8; 3] {
        match self {
            ChannelOrder::Rgb => [color.r, color.g, color.b],
            ChannelOrder::Bgr => [color.b, color.g, color.r],
        }
    }

    /// Reorders a per-channel triple given in R, G, B order into storage order.
    #[inline]
    pub fn arrange<T: Copy>(self, rgb: [T; 3]) -> [T; 3] {
        match self {
            ChannelOrder::Rgb => rgb,
            ChannelOrder::Bgr => [rgb[2], rgb[1], rgb[0]],
        }
    }
}

impl Default for ChannelOrder {
    fn default() -> Self {
        ChannelOrder::native()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_encode_swaps_red_and_blue_for_bgr() {
        let c = Rgb::new(1, 2, 3);
        assert_eq!(ChannelOrder::Rgb.encode(c), [1, 2, 3]);
        assert_eq!(ChannelOrder::Bgr.encode(c), [3, 2, 1]);
    }

    #[test]
    fn test_rgb_serializes_as_array() {
        let json = serde_json::to_string(&Rgb::new(10, 20, 30)).unwrap();
        assert_eq!(json, "[10,20,30]");
        let back: Rgb = serde_json::from_str("[255,0,128]").unwrap();
        assert_eq!(back, Rgb::new(255, 0, 128));
    }
}

// src/compositor.rs

//! Pixel-level blending onto a 3-bytes-per-pixel framebuffer.
//!
//! All arithmetic is 8-bit fixed point through [`mul255`]. Output must stay
//! bit-exact with existing renders; do not replace it with floating point.

use crate::color::{ChannelOrder, Rgb};
use log::trace;
use std::io::{self, Write};

/// Fixed-point approximation of `a * b / 255`.
///
/// `a` may be negative (blend deltas are signed); the shift is arithmetic.
#[inline]
pub const fn mul255(a: i32, b: i32) -> i32 {
    (a * (b + 1)) >> 8
}

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a rectangle from inclusive-exclusive edges.
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            w: right.saturating_sub(left),
            h: bottom.saturating_sub(top),
        }
    }

    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }
}

/// An RGBA source image, straight (non-premultiplied) alpha, rows packed at
/// `width * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl Picture {
    /// Returns `None` if `rgba` is shorter than `width * height * 4`.
    pub fn new(width: usize, height: usize, rgba: Vec<u8>) -> Option<Self> {
        let needed = width.checked_mul(height)?.checked_mul(4)?;
        if rgba.len() < needed {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    /// A picture filled with one RGBA value.
    pub fn solid(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            rgba: rgba.repeat(width * height),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Straight-alpha RGBA bytes, `width * 4` per row.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

/// `usize` to `i32`, saturating at `i32::MAX`.
#[inline]
fn to_coord(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// The shared drawing surface.
///
/// Owned by the display layer, which presents `as_bytes()` however it likes.
/// The core writes into it and never changes its dimensions.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    stride: usize,
    order: ChannelOrder,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Allocates a black framebuffer with tightly packed rows.
    pub fn new(width: usize, height: usize, order: ChannelOrder) -> Self {
        let stride = width * 3;
        Self {
            width,
            height,
            stride,
            order,
            pixels: vec![0; stride * height],
        }
    }

    /// Wraps an existing pixel buffer. Returns `None` if the buffer cannot
    /// hold `height` rows of `stride` bytes or the stride is narrower than a row.
    pub fn from_raw(
        pixels: Vec<u8>,
        width: usize,
        height: usize,
        stride: usize,
        order: ChannelOrder,
    ) -> Option<Self> {
        if stride < width * 3 || pixels.len() < stride * height {
            return None;
        }
        Some(Self {
            width,
            height,
            stride,
            order,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    /// Reads back a pixel in R, G, B order regardless of storage order.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = y * self.stride + x * 3;
        let [r, g, b] = self.order.arrange([self.pixels[o], self.pixels[o + 1], self.pixels[o + 2]]);
        Some(Rgb::new(r, g, b))
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.stride + x as usize * 3)
    }

    /// Blends `rgb` over the pixel at `(x, y)` with a single coverage value.
    pub fn blend_pixel(&mut self, x: i32, y: i32, coverage: u8, rgb: Rgb) {
        self.blend_pixel_lcd(x, y, [coverage; 3], rgb);
    }

    /// Blends `rgb` over the pixel at `(x, y)` with one coverage value per
    /// channel, given in R, G, B subpixel order.
    pub fn blend_pixel_lcd(&mut self, x: i32, y: i32, coverage: [u8; 3], rgb: Rgb) {
        let Some(o) = self.offset(x, y) else {
            return;
        };
        let src = self.order.encode(rgb);
        let cov = self.order.arrange(coverage);
        for c in 0..3 {
            let dst = i32::from(self.pixels[o + c]);
            let s = i32::from(src[c]);
            let inv = 255 - i32::from(cov[c]);
            self.pixels[o + c] = (s + mul255(dst - s, inv)) as u8;
        }
    }

    /// Fills every pixel with `rgb`.
    pub fn clear(&mut self, rgb: Rgb) {
        let px = self.order.encode(rgb);
        let row_bytes = self.width * 3;
        for row in self.pixels.chunks_mut(self.stride).take(self.height) {
            for p in row[..row_bytes].chunks_exact_mut(3) {
                p.copy_from_slice(&px);
            }
        }
    }

    /// Fills a rectangle with `rgb`, clamped to the framebuffer.
    ///
    /// Returns the number of pixels written.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, rgb: Rgb) -> usize {
        let (fw, fh) = (self.width as i32, self.height as i32);
        let x0 = x.clamp(0, fw);
        let y0 = y.clamp(0, fh);
        let x1 = x.saturating_add(w).clamp(0, fw);
        let y1 = y.saturating_add(h).clamp(0, fh);
        if x0 >= x1 || y0 >= y1 {
            return 0;
        }

        let px = self.order.encode(rgb);
        for row in y0..y1 {
            let start = row as usize * self.stride + x0 as usize * 3;
            let end = row as usize * self.stride + x1 as usize * 3;
            for p in self.pixels[start..end].chunks_exact_mut(3) {
                p.copy_from_slice(&px);
            }
        }
        ((x1 - x0) * (y1 - y0)) as usize
    }

    /// Alpha-composites `pic` with its top-left corner at `(x, y)`, writing
    /// only inside `clip` (which is itself limited to the framebuffer).
    pub fn composite_picture(&mut self, pic: &Picture, x: i32, y: i32, clip: Rect) {
        let clip = Rect::from_edges(
            clip.x.max(0),
            clip.y.max(0),
            clip.right().min(to_coord(self.width)),
            clip.bottom().min(to_coord(self.height)),
        );

        if clip.w <= 0 || clip.h <= 0 {
            return;
        }

        let (mut x0, mut y0) = (x, y);
        let mut x1 = x.saturating_add(to_coord(pic.width));
        let mut y1 = y.saturating_add(to_coord(pic.height));
        if x1 <= clip.x || x0 >= clip.right() || y1 <= clip.y || y0 >= clip.bottom() {
            trace!("composite_picture: placement outside clip, skipping");
            return;
        }

        let (mut sx0, mut sy0) = (0, 0);
        if x0 < clip.x {
            sx0 += clip.x - x0;
            x0 = clip.x;
        }
        if y0 < clip.y {
            sy0 += clip.y - y0;
            y0 = clip.y;
        }
        x1 = x1.min(clip.right());
        y1 = y1.min(clip.bottom());

        let w = (x1 - x0) as usize;
        let h = (y1 - y0) as usize;
        let src_stride = pic.width * 4;

        for row in 0..h {
            let sp = (sy0 as usize + row) * src_stride + sx0 as usize * 4;
            let dp = (y0 as usize + row) * self.stride + x0 as usize * 3;
            let src = &pic.rgba[sp..sp + w * 4];
            let dst = &mut self.pixels[dp..dp + w * 3];
            for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
                let sa = i32::from(s[3]);
                let na = 255 - sa;
                let premul = self.order.arrange([
                    mul255(i32::from(s[0]), sa),
                    mul255(i32::from(s[1]), sa),
                    mul255(i32::from(s[2]), sa),
                ]);
                for c in 0..3 {
                    d[c] = (premul[c] + mul255(i32::from(d[c]), na)) as u8;
                }
            }
        }
    }

    /// Writes the framebuffer as a binary PPM (P6), always in RGB order.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut line = Vec::with_capacity(self.width * 3);
        for row in self.pixels.chunks(self.stride).take(self.height) {
            line.clear();
            for p in row[..self.width * 3].chunks_exact(3) {
                line.extend_from_slice(&self.order.arrange([p[0], p[1], p[2]]));
            }
            out.write_all(&line)?;
        }
        out.flush()
    }
}

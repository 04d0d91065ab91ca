//! Text caret shapes.

use crate::compositor::Rect;
use crate::rasterizer::SUBPIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretShape {
    /// Three-row triangle hanging below the baseline.
    SmallTriangle,
    /// Four-row triangle hanging below the baseline.
    LargeTriangle,
    /// One pixel wide line spanning the line height.
    #[default]
    ThinLine,
    ThickLine,
    /// A full cell.
    Block,
}

impl From<i32> for CaretShape {
    fn from(value: i32) -> Self {
        match value {
            0 => CaretShape::SmallTriangle,
            1 => CaretShape::LargeTriangle,
            2 => CaretShape::ThinLine,
            3 => CaretShape::ThickLine,
            _ => CaretShape::Block,
        }
    }
}

/// Line geometry the caret is sized against, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretMetrics {
    pub baseline: i32,
    pub leading: i32,
    pub cell_width: i32,
}

/// Rectangles making up a caret whose pen is at subpixel `x_sub` on the
/// baseline `y`.
pub fn caret_rects(x_sub: i32, y: i32, shape: CaretShape, metrics: CaretMetrics) -> Vec<Rect> {
    let x = x_sub / SUBPIX;
    let top = y - metrics.baseline + 1;
    let height = metrics.leading - 2;
    match shape {
        CaretShape::SmallTriangle | CaretShape::LargeTriangle => {
            let rows = if shape == CaretShape::SmallTriangle { 3 } else { 4 };
            (0..rows)
                .map(|i| Rect::new(x - i, y + 1 + i, 2 * i + 1, 1))
                .collect()
        }
        CaretShape::ThinLine => vec![Rect::new(x, top, 1, height)],
        CaretShape::ThickLine => vec![Rect::new(x, top, 2, height)],
        CaretShape::Block => vec![Rect::new(x, top, metrics.cell_width, height)],
    }
}

// src/rect.rs
//! Rectangle value type shared by every blit entry point.
//!
//! Origins are signed so callers can position regions partially (or fully)
//! outside a bitmap and let the clipping protocol sort it out; extents are
//! unsigned. Both are deliberately narrow: blit geometry lives comfortably
//! in `i16`/`u16`, and the intersection math widens to `i32` internally so
//! the extreme corners cannot overflow.

use serde::{Deserialize, Serialize};

/// A pixel-space rectangle: signed origin, unsigned extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: i16, y: i16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// A `w` by `h` rectangle anchored at the origin.
    pub const fn from_size(w: u16, h: u16) -> Self {
        Self::new(0, 0, w, h)
    }

    /// True when the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Exclusive right edge, widened so `x + w` cannot wrap.
    pub const fn right(&self) -> i32 {
        self.x as i32 + self.w as i32
    }

    /// Exclusive bottom edge, widened so `y + h` cannot wrap.
    pub const fn bottom(&self) -> i32 {
        self.y as i32 + self.h as i32
    }

    /// Intersects two rectangles.
    ///
    /// Returns `None` when they share no pixels, including the edge-touching
    /// case (extents are exclusive on the far side). The result's extent
    /// never exceeds either input's, so the narrowing back to `u16` is safe.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x) as i32;
        let y1 = self.y.max(other.y) as i32;
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(Rect {
            x: x1 as i16,
            y: y1 as i16,
            w: (x2 - x1) as u16,
            h: (y2 - y1) as u16,
        })
    }
}

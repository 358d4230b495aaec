// src/bitmap/fill.rs
//! Rectangle filling.
//!
//! Byte-aligned depths seed the first pixel of a row through the normal
//! pixel store, then double the initialized span with in-row copies, so a
//! row of any width costs a handful of `copy_within` calls. Sub-byte depths
//! fall back to per-pixel stores.

use crate::rect::Rect;

use super::blit::bounds;
use super::Bitmap;

impl Bitmap<'_> {
    /// Fills `rect`, clipped to the bitmap, with a native value.
    pub fn fill_rect(&mut self, rect: Rect, native: u32) {
        let Some(r) = rect.intersection(&bounds(self)) else {
            return;
        };

        let bpp = self.mode().bits_per_pixel();
        if bpp < 8 {
            for y in r.y as usize..r.bottom() as usize {
                for x in r.x as usize..r.right() as usize {
                    self.write_native(x, y, native);
                }
            }
            return;
        }

        let bytes_pp = (bpp / 8) as usize;
        let row_bytes = r.w as usize * bytes_pp;
        let x0 = r.x as usize * bytes_pp;

        // Seed the first pixel of the first row, then double the filled
        // span until the row is complete.
        let y0 = r.y as usize;
        self.write_native(r.x as usize, y0, native);
        let first = self.row_mut(y0);
        let mut filled = bytes_pp;
        while filled * 2 <= row_bytes {
            first.copy_within(x0..x0 + filled, x0 + filled);
            filled *= 2;
        }
        if filled < row_bytes {
            first.copy_within(x0..x0 + (row_bytes - filled), x0 + filled);
        }

        // Remaining rows copy the finished first row.
        let stride = self.stride();
        let base = y0 * stride + x0;
        let buf = self.pixels_mut();
        for y in 1..r.h as usize {
            buf.copy_within(base..base + row_bytes, base + y * stride);
        }
    }

    /// Fills the whole bitmap with its clear color.
    pub fn clear(&mut self) {
        let full = bounds(self);
        let color = self.clear_color();
        self.fill_rect(full, color);
    }

    /// Fills the horizontal span `[x0, x1)` on row `y`, clipped.
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, native: u32) {
        if y < 0 || y >= self.height() as i32 {
            return;
        }
        let x0 = x0.max(0) as usize;
        let x1 = (x1.min(self.width() as i32)).max(0) as usize;
        if x0 >= x1 {
            return;
        }
        for x in x0..x1 {
            self.write_native(x, y as usize, native);
        }
    }
}

// src/bitmap/draw.rs
//! Line and shape primitives.
//!
//! Everything here writes through the bounds-checked pixel store, so the
//! primitives clip themselves pixel by pixel and accept coordinates
//! anywhere in the signed plane.

use crate::rect::Rect;

use super::Bitmap;

fn put(bmp: &mut Bitmap, x: i32, y: i32, native: u32) {
    if x >= 0 && y >= 0 {
        bmp.put_pixel(x as usize, y as usize, native);
    }
}

impl Bitmap<'_> {
    /// Draws a line from `(x0, y0)` to `(x1, y1)` with Bresenham's
    /// algorithm. Both endpoints are drawn.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, native: u32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        let (mut x, mut y) = (x0, y0);
        loop {
            put(self, x, y, native);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draws the outline of `area`. Degenerate extents collapse to a line
    /// or a single pixel.
    pub fn draw_rectangle(&mut self, area: Rect, native: u32) {
        let x0 = i32::from(area.x);
        let y0 = i32::from(area.y);
        let x1 = x0 + i32::from(area.w);
        let y1 = y0 + i32::from(area.h);

        let horizontal = y0 == y1;
        let vertical = x0 == x1;

        if horizontal && vertical {
            put(self, x0, y0, native);
            return;
        }
        if horizontal {
            self.draw_line(x0, y0, x1, y0, native);
            return;
        }
        if vertical {
            self.draw_line(x0, y0, x0, y1, native);
            return;
        }

        self.draw_line(x0, y0, x1, y0, native);
        self.draw_line(x0, y1, x1, y1, native);
        self.draw_line(x0, y0 + 1, x0, y1 - 1, native);
        self.draw_line(x1, y0 + 1, x1, y1 - 1, native);
    }

    /// Fills `area` solid.
    pub fn draw_filled_rectangle(&mut self, area: Rect, native: u32) {
        self.fill_rect(area, native);
    }

    /// Draws the outline of the triangle `(x0,y0) (x1,y1) (x2,y2)`.
    pub fn draw_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        native: u32,
    ) {
        self.draw_line(x0, y0, x1, y1, native);
        self.draw_line(x1, y1, x2, y2, native);
        self.draw_line(x2, y2, x0, y0, native);
    }

    /// Draws a circle outline with the midpoint algorithm, plotting all
    /// eight octants per step. `radius == 0` draws the center pixel.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: u32, native: u32) {
        let r = radius as i32;
        if r == 0 {
            put(self, cx, cy, native);
            return;
        }

        let mut x = r;
        let mut y = 0;
        let mut err = 1 - r;

        while x >= y {
            put(self, cx + x, cy + y, native);
            put(self, cx + y, cy + x, native);
            put(self, cx - y, cy + x, native);
            put(self, cx - x, cy + y, native);
            put(self, cx - x, cy - y, native);
            put(self, cx - y, cy - x, native);
            put(self, cx + y, cy - x, native);
            put(self, cx + x, cy - y, native);

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Draws consecutive segments through `points`, closing the loop from
    /// the last point back to the first when `closed` is set. Fewer than
    /// two points draw nothing.
    pub fn draw_polyline(&mut self, points: &[(i32, i32)], closed: bool, native: u32) {
        if points.len() < 2 {
            return;
        }
        for pair in points.windows(2) {
            self.draw_line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, native);
        }
        if closed {
            let first = points[0];
            let last = points[points.len() - 1];
            self.draw_line(last.0, last.1, first.0, first.1, native);
        }
    }
}

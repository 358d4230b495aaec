// src/bitmap/blit.rs
//! Clipped blits between bitmaps: the shared rectangle setup, same-mode
//! fast row kernels, the any-to-any conversion kernel and the nearest
//! neighbor stretch.

use log::trace;

use crate::pixel::PixelMode;
use crate::rect::Rect;
use crate::rop::{self, BlitOp};

use super::Bitmap;

fn clamp_extent(dim: usize) -> u16 {
    dim.min(u16::MAX as usize) as u16
}

/// The addressable area of a bitmap as a rectangle at the origin.
pub(crate) fn bounds(bmp: &Bitmap) -> Rect {
    Rect::from_size(clamp_extent(bmp.width()), clamp_extent(bmp.height()))
}

/// Resolves the requested rectangles into a source/destination pair of
/// equal extent, clipped to both bitmaps.
///
/// `src_rect` defaults to the full source. `dst_rect` contributes only its
/// origin; the blitted extent is always the clipped source extent. Clipping
/// the source against its bounds shifts the destination origin by the same
/// amount, and clipping the destination shifts the source origin back, so
/// the pixels that survive are exactly the ones both bitmaps can hold.
/// Returns `None` when nothing survives.
pub(crate) fn setup_rects(
    src: &Bitmap,
    src_rect: Option<Rect>,
    dst: &Bitmap,
    dst_rect: Option<Rect>,
) -> Option<(Rect, Rect)> {
    let src_bounds = bounds(src);
    let (req_dx, req_dy) = dst_rect.map_or((0, 0), |r| (i32::from(r.x), i32::from(r.y)));

    let (sr, dx, dy) = match src_rect {
        Some(requested) => {
            let clipped = requested.intersection(&src_bounds)?;
            (
                clipped,
                req_dx + i32::from(clipped.x) - i32::from(requested.x),
                req_dy + i32::from(clipped.y) - i32::from(requested.y),
            )
        }
        None => {
            if src_bounds.is_empty() {
                return None;
            }
            (src_bounds, req_dx, req_dy)
        }
    };

    // Origins beyond the coordinate range cannot address any pixel.
    let dr = Rect::new(
        i16::try_from(dx).ok()?,
        i16::try_from(dy).ok()?,
        sr.w,
        sr.h,
    );
    let dst_clipped = dr.intersection(&bounds(dst))?;

    let sx = i16::try_from(i32::from(sr.x) + i32::from(dst_clipped.x) - i32::from(dr.x)).ok()?;
    let sy = i16::try_from(i32::from(sr.y) + i32::from(dst_clipped.y) - i32::from(dr.y)).ok()?;
    Some((
        Rect::new(sx, sy, dst_clipped.w, dst_clipped.h),
        dst_clipped,
    ))
}

/// Copies `src_rect` of `src` onto `dst` with `dst_rect` naming the target
/// origin, combining pixels with `op`.
///
/// Both rectangles are clipped as described on [`setup_rects`]; pixels equal
/// to the source's enabled colorkey are skipped. Returns `false` without
/// touching `dst` when the clipped area is empty.
pub fn blit(
    src: &Bitmap,
    src_rect: Option<Rect>,
    dst: &mut Bitmap,
    dst_rect: Option<Rect>,
    op: BlitOp,
) -> bool {
    let Some((sr, dr)) = setup_rects(src, src_rect, dst, dst_rect) else {
        return false;
    };
    blit_unclipped(src, sr, dst, dr, op);
    true
}

/// Dispatches a pre-clipped blit to the best kernel for the mode pair.
pub(crate) fn blit_unclipped(src: &Bitmap, sr: Rect, dst: &mut Bitmap, dr: Rect, op: BlitOp) {
    let mode = src.mode();
    let key = src.colorkey();

    if mode == dst.mode() {
        let bpp = mode.bits_per_pixel();
        if bpp >= 8 {
            let bytes_pp = (bpp / 8) as usize;
            let rowbytes = dr.w as usize * bytes_pp;
            let s0 = sr.x as usize * bytes_pp;
            let d0 = dr.x as usize * bytes_pp;

            if op == BlitOp::Copy && key.is_none() {
                for y in 0..dr.h as usize {
                    let srow = &src.row(sr.y as usize + y)[s0..s0 + rowbytes];
                    dst.row_mut(dr.y as usize + y)[d0..d0 + rowbytes].copy_from_slice(srow);
                }
                return;
            }

            // Row kernels exist for the 16/24/32bpp pixel sizes only; a
            // keyed or combining 8bpp blit is per-pixel work regardless.
            if bpp >= 16 {
                for y in 0..dr.h as usize {
                    let srow = &src.row(sr.y as usize + y)[s0..s0 + rowbytes];
                    let drow = &mut dst.row_mut(dr.y as usize + y)[d0..d0 + rowbytes];
                    match bytes_pp {
                        4 => rop_row_u32(srow, drow, op, key, mode),
                        2 => rop_row_u16(srow, drow, op, key, mode),
                        _ => rop_row_u24(srow, drow, op, key),
                    }
                }
                return;
            }
        }
        // Indexed modes go through the per-pixel kernel.
    }

    blit_general(src, sr, dst, dr, op);
}

/// Same-mode 32bpp row: whole natives through the ROP unit.
fn rop_row_u32(srow: &[u8], drow: &mut [u8], op: BlitOp, key: Option<u32>, mode: PixelMode) {
    for (s, d) in srow.chunks_exact(4).zip(drow.chunks_exact_mut(4)) {
        let sv = u32::from_le_bytes([s[0], s[1], s[2], s[3]]);
        if key == Some(sv) {
            continue;
        }
        let dv = u32::from_le_bytes([d[0], d[1], d[2], d[3]]);
        d.copy_from_slice(&rop::apply_native(dv, sv, op, mode).to_le_bytes());
    }
}

/// Same-mode 16bpp row; saturating ops split on the mode's channel widths.
fn rop_row_u16(srow: &[u8], drow: &mut [u8], op: BlitOp, key: Option<u32>, mode: PixelMode) {
    for (s, d) in srow.chunks_exact(2).zip(drow.chunks_exact_mut(2)) {
        let sv = u32::from(u16::from_le_bytes([s[0], s[1]]));
        if key == Some(sv) {
            continue;
        }
        let dv = u32::from(u16::from_le_bytes([d[0], d[1]]));
        let out = rop::apply_native(dv, sv, op, mode) as u16;
        d.copy_from_slice(&out.to_le_bytes());
    }
}

/// Same-mode 24bpp row: channels are byte-aligned, so every op is a
/// straight per-byte pass.
fn rop_row_u24(srow: &[u8], drow: &mut [u8], op: BlitOp, key: Option<u32>) {
    for (s, d) in srow.chunks_exact(3).zip(drow.chunks_exact_mut(3)) {
        let sv = u32::from(s[0]) | u32::from(s[1]) << 8 | u32::from(s[2]) << 16;
        if key == Some(sv) {
            continue;
        }
        for (dc, sc) in d.iter_mut().zip(s) {
            *dc = rop::apply_channel(*dc, *sc, op);
        }
    }
}

/// Per-pixel kernel for any mode pair, including sub-byte ones.
///
/// Same-mode pixels are combined natively. Across modes the source is
/// unpacked to RGB, combined with the unpacked destination channel by
/// channel, and repacked in the destination mode.
fn blit_general(src: &Bitmap, sr: Rect, dst: &mut Bitmap, dr: Rect, op: BlitOp) {
    let key = src.colorkey();
    let same_mode = src.mode() == dst.mode();

    for y in 0..dr.h as usize {
        let sy = sr.y as usize + y;
        let dy = dr.y as usize + y;
        for x in 0..dr.w as usize {
            let sx = sr.x as usize + x;
            let dx = dr.x as usize + x;

            let sv = src.read_native(sx, sy);
            if key == Some(sv) {
                continue;
            }

            let out = if same_mode {
                if op == BlitOp::Copy {
                    sv
                } else {
                    rop::apply_native(dst.read_native(dx, dy), sv, op, dst.mode())
                }
            } else {
                let (mut r, mut g, mut b) = src.pixel_rgb(sv);
                if op != BlitOp::Copy {
                    let (dr8, dg8, db8) = dst.pixel_rgb(dst.read_native(dx, dy));
                    r = rop::apply_channel(dr8, r, op);
                    g = rop::apply_channel(dg8, g, op);
                    b = rop::apply_channel(db8, b, op);
                }
                dst.pixel_value(r, g, b)
            };
            dst.write_native(dx, dy, out);
        }
    }
}

impl Bitmap<'_> {
    /// Blits a region of this bitmap onto itself.
    ///
    /// Overlapping `Copy` regions are handled like a `memmove`: the visit
    /// order is reversed when the destination starts after the source, so
    /// the copy never reads a pixel it already wrote. Other ops combine
    /// with whatever the destination holds when a pixel is visited.
    pub fn blit_within(
        &mut self,
        src_rect: Option<Rect>,
        dst_rect: Option<Rect>,
        op: BlitOp,
    ) -> bool {
        let Some((sr, dr)) = setup_rects(self, src_rect, self, dst_rect) else {
            return false;
        };

        let bpp = self.mode().bits_per_pixel();
        let key = self.colorkey();
        let mode = self.mode();
        let stride = self.stride();

        // Position in bits decides the safe direction for every depth.
        let s_bit = sr.y as usize * stride * 8 + sr.x as usize * bpp as usize;
        let d_bit = dr.y as usize * stride * 8 + dr.x as usize * bpp as usize;
        let backwards = d_bit > s_bit;

        if op == BlitOp::Copy && key.is_none() && bpp >= 8 {
            let bytes_pp = (bpp / 8) as usize;
            let rowbytes = dr.w as usize * bytes_pp;
            let s_base = sr.y as usize * stride + sr.x as usize * bytes_pp;
            let d_base = dr.y as usize * stride + dr.x as usize * bytes_pp;
            let rows = dr.h as usize;
            let buf = self.pixels_mut();

            for step in 0..rows {
                let y = if backwards { rows - 1 - step } else { step };
                let s0 = s_base + y * stride;
                buf.copy_within(s0..s0 + rowbytes, d_base + y * stride);
            }
            return true;
        }

        let rows = dr.h as usize;
        let cols = dr.w as usize;
        for ry in 0..rows {
            let y = if backwards { rows - 1 - ry } else { ry };
            for rx in 0..cols {
                let x = if backwards { cols - 1 - rx } else { rx };
                let sv = self.read_native(sr.x as usize + x, sr.y as usize + y);
                if key == Some(sv) {
                    continue;
                }
                let dx = dr.x as usize + x;
                let dy = dr.y as usize + y;
                let out = if op == BlitOp::Copy {
                    sv
                } else {
                    rop::apply_native(self.read_native(dx, dy), sv, op, mode)
                };
                self.write_native(dx, dy, out);
            }
        }
        true
    }
}

fn map_nn(i: u32, src_len: u32, dst_len: u32) -> u32 {
    ((u64::from(i) * u64::from(src_len)) / u64::from(dst_len)) as u32
}

/// Remaps the source window when destination clipping shaved pixels off,
/// so the surviving span still shows what it would have shown unclipped.
/// The window keeps at least one source pixel per axis.
pub(crate) fn adjust_stretch_source(s: Rect, d_req: Rect, d: Rect) -> Rect {
    if d == d_req {
        return s;
    }

    let left = (i32::from(d.x) - i32::from(d_req.x)) as u32;
    let top = (i32::from(d.y) - i32::from(d_req.y)) as u32;

    let sx0 = s.x as u32 + map_nn(left, u32::from(s.w), u32::from(d_req.w));
    let sx1 = (s.x as u32 + map_nn(left + u32::from(d.w), u32::from(s.w), u32::from(d_req.w)))
        .clamp(sx0 + 1, s.right() as u32);

    let sy0 = s.y as u32 + map_nn(top, u32::from(s.h), u32::from(d_req.h));
    let sy1 = (s.y as u32 + map_nn(top + u32::from(d.h), u32::from(s.h), u32::from(d_req.h)))
        .clamp(sy0 + 1, s.bottom() as u32);

    Rect::new(
        sx0 as i16,
        sy0 as i16,
        (sx1 - sx0) as u16,
        (sy1 - sy0) as u16,
    )
}

/// Nearest-neighbor stretch of `src_rect` onto `dst_rect`.
///
/// Source coordinates advance by a 16.16 fixed point step per destination
/// pixel, so each row costs two adds instead of two divisions. When the
/// two rectangles end up the same size this is a plain [`blit`]. Returns
/// `false` when either clipped rectangle is empty.
pub fn blit_stretched(
    src: &Bitmap,
    src_rect: Option<Rect>,
    dst: &mut Bitmap,
    dst_rect: Option<Rect>,
    op: BlitOp,
) -> bool {
    let src_bounds = bounds(src);
    let dst_bounds = bounds(dst);
    let s_req = src_rect.unwrap_or(src_bounds);
    let d_req = dst_rect.unwrap_or(dst_bounds);
    if s_req.is_empty() || d_req.is_empty() {
        return false;
    }

    let Some(s) = s_req.intersection(&src_bounds) else {
        return false;
    };
    let Some(d) = d_req.intersection(&dst_bounds) else {
        return false;
    };
    let s = adjust_stretch_source(s, d_req, d);

    if s.w == d.w && s.h == d.h {
        blit_unclipped(src, s, dst, d, op);
        return true;
    }

    trace!(
        "stretch {}x{} -> {}x{} ({:?} -> {:?})",
        s.w,
        s.h,
        d.w,
        d.h,
        src.mode(),
        dst.mode()
    );

    let key = src.colorkey();
    let same_mode = src.mode() == dst.mode();
    let x_step = (u32::from(s.w) << 16) / u32::from(d.w);
    let y_step = (u32::from(s.h) << 16) / u32::from(d.h);

    let mut y_acc: u32 = 0;
    for row in 0..d.h as usize {
        let sy = s.y as usize + (y_acc >> 16) as usize;
        y_acc += y_step;
        let dy = d.y as usize + row;

        let mut x_acc: u32 = 0;
        for col in 0..d.w as usize {
            let sx = s.x as usize + (x_acc >> 16) as usize;
            x_acc += x_step;
            let dx = d.x as usize + col;

            let sv = src.read_native(sx, sy);
            if key == Some(sv) {
                continue;
            }

            let out = if same_mode {
                if op == BlitOp::Copy {
                    sv
                } else {
                    rop::apply_native(dst.read_native(dx, dy), sv, op, dst.mode())
                }
            } else {
                let (mut r, mut g, mut b) = src.pixel_rgb(sv);
                if op != BlitOp::Copy {
                    let (dr8, dg8, db8) = dst.pixel_rgb(dst.read_native(dx, dy));
                    r = rop::apply_channel(dr8, r, op);
                    g = rop::apply_channel(dg8, g, op);
                    b = rop::apply_channel(db8, b, op);
                }
                dst.pixel_value(r, g, b)
            };
            dst.write_native(dx, dy, out);
        }
    }
    true
}

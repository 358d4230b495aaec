// src/bitmap/mask.rs
//! Coverage-mask compositing, the machinery behind glyph and text drawing.
//!
//! A mask is an 8-bits-per-pixel bitmap whose bytes are linear coverage:
//! 0 means the destination shows through, 255 means the foreground covers
//! the pixel completely, anything in between blends. Three background modes
//! decide what happens around the covered shape.
//!
//! 32bpp destinations get dedicated kernels working on whole words; every
//! other depth shares a generic kernel going through the mode registry.
//! The blend itself is integer-only and division-free.

use serde::{Deserialize, Serialize};

use crate::pixel::PixelMode;
use crate::rect::Rect;

use super::blit::{adjust_stretch_source, bounds};
use super::Bitmap;

/// How a coverage mask treats the pixels around the covered shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskMode {
    /// Foreground over the destination; uncovered pixels stay untouched.
    Transparent,
    /// Foreground mixed with the background everywhere, destination ignored.
    Opaque,
    /// Background painted *around* the shape, carving it out of a fill;
    /// fully covered pixels stay untouched.
    RevTransparent,
}

/// Blends `s` over `d` with coverage `a`, approximating `/255` by
/// shift-and-add so the inner loops never divide.
#[inline]
fn mix(d: u8, s: u8, a: u8) -> u8 {
    let x = u32::from(d) * (255 - u32::from(a)) + u32::from(s) * u32::from(a);
    ((x + 128 + (x >> 8)) >> 8) as u8
}

#[inline]
fn mix_rgb(d: (u8, u8, u8), s: (u8, u8, u8), a: u8) -> (u8, u8, u8) {
    (mix(d.0, s.0, a), mix(d.1, s.1, a), mix(d.2, s.2, a))
}

/// Colors a mask blit works with, resolved once per call: the native values
/// written on the 0/255 short-circuits and their RGB forms for blending.
struct MaskColors {
    fg_native: u32,
    bg_native: u32,
    fg: (u8, u8, u8),
    bg: (u8, u8, u8),
}

impl MaskColors {
    fn resolve(dst_mode: PixelMode, fg_native: u32, bg_native: u32) -> Self {
        Self {
            fg_native,
            bg_native,
            fg: dst_mode.unpack(fg_native),
            bg: dst_mode.unpack(bg_native),
        }
    }
}

/// Validates the mask and resolves the requested rectangles.
///
/// The mask rect defaults to the whole mask and is clipped to it; the
/// destination rect contributes its origin and, when given, its extent.
/// Returns `None` when the mask is not 8bpp or nothing remains.
fn setup_mask_rects(
    mask: &Bitmap,
    mask_rect: Option<Rect>,
    dst_rect: Option<Rect>,
) -> Option<(Rect, Rect)> {
    if mask.mode().bits_per_pixel() != 8 {
        return None;
    }

    let mask_bounds = bounds(mask);
    let ms = mask_rect.unwrap_or(mask_bounds).intersection(&mask_bounds)?;
    let ds = dst_rect.unwrap_or(Rect::from_size(ms.w, ms.h));
    if ds.is_empty() {
        return None;
    }
    Some((ms, ds))
}

/// Composites `mask_rect` of `mask` onto `dst_rect` of `dst` at 1:1 scale.
///
/// The two rectangles must agree in size; when they differ the smaller
/// extent wins on each axis. Destination clipping shifts the mask window by
/// the same amount. Returns `false` when the mask is not 8 bits per pixel
/// or the clipped region is empty, writing nothing.
pub fn blit_mask(
    mask: &Bitmap,
    mask_rect: Option<Rect>,
    dst: &mut Bitmap,
    dst_rect: Option<Rect>,
    fg_native: u32,
    bg_native: u32,
    mode: MaskMode,
) -> bool {
    let Some((mut ms, mut ds)) = setup_mask_rects(mask, mask_rect, dst_rect) else {
        return false;
    };

    // 1:1 blit; whichever rect is smaller bounds both.
    let w = ms.w.min(ds.w);
    let h = ms.h.min(ds.h);
    ms.w = w;
    ms.h = h;
    ds.w = w;
    ds.h = h;

    let Some(clipped) = ds.intersection(&bounds(dst)) else {
        return false;
    };
    ms.x += clipped.x - ds.x;
    ms.y += clipped.y - ds.y;
    ms.w = clipped.w;
    ms.h = clipped.h;
    let ds = clipped;

    let colors = MaskColors::resolve(dst.mode(), fg_native, bg_native);
    if dst.mode() == PixelMode::Xrgb8888 {
        mask_rows_32(mask, ms, dst, ds, &colors, mode);
    } else {
        mask_rows_generic(mask, ms, dst, ds, &colors, mode);
    }
    true
}

/// Composites `mask_rect` of `mask` onto `dst_rect` of `dst`, resampling
/// the mask with nearest neighbor when the extents differ.
///
/// Destination clipping shrinks the mask window proportionally, so a glyph
/// pushed half off-screen shows its visible half at the right scale instead
/// of the whole glyph squeezed into the remaining pixels.
pub fn blit_mask_stretched(
    mask: &Bitmap,
    mask_rect: Option<Rect>,
    dst: &mut Bitmap,
    dst_rect: Option<Rect>,
    fg_native: u32,
    bg_native: u32,
    mode: MaskMode,
) -> bool {
    let Some((ms, ds_req)) = setup_mask_rects(mask, mask_rect, dst_rect) else {
        return false;
    };

    let Some(ds) = ds_req.intersection(&bounds(dst)) else {
        return false;
    };
    let ms = adjust_stretch_source(ms, ds_req, ds);

    let colors = MaskColors::resolve(dst.mode(), fg_native, bg_native);

    if ms.w == ds.w && ms.h == ds.h {
        if dst.mode() == PixelMode::Xrgb8888 {
            mask_rows_32(mask, ms, dst, ds, &colors, mode);
        } else {
            mask_rows_generic(mask, ms, dst, ds, &colors, mode);
        }
        return true;
    }

    // 16.16 fixed point steps, computed once; the per-pixel cost of the
    // resample is one add and one shift per axis.
    let x_step = (u32::from(ms.w) << 16) / u32::from(ds.w);
    let y_step = (u32::from(ms.h) << 16) / u32::from(ds.h);

    if dst.mode() == PixelMode::Xrgb8888 {
        stretched_rows_32(mask, ms, dst, ds, &colors, mode, x_step, y_step);
    } else {
        stretched_rows_generic(mask, ms, dst, ds, &colors, mode, x_step, y_step);
    }
    true
}

#[inline]
fn read_u32(row: &[u8], x: usize) -> u32 {
    let off = x * 4;
    u32::from_le_bytes([row[off], row[off + 1], row[off + 2], row[off + 3]])
}

#[inline]
fn write_u32(row: &mut [u8], x: usize, v: u32) {
    let off = x * 4;
    row[off..off + 4].copy_from_slice(&v.to_le_bytes());
}

#[inline]
fn unpack_888(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

#[inline]
fn pack_888((r, g, b): (u8, u8, u8)) -> u32 {
    u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b)
}

/// One mask pixel against a 32bpp destination word. Returns the new word,
/// or `None` to leave the destination alone.
#[inline]
fn composite_32(coverage: u8, current: impl FnOnce() -> u32, colors: &MaskColors, mode: MaskMode) -> Option<u32> {
    match mode {
        MaskMode::Transparent => match coverage {
            0 => None,
            255 => Some(colors.fg_native),
            a => Some(pack_888(mix_rgb(unpack_888(current()), colors.fg, a))),
        },
        MaskMode::Opaque => match coverage {
            0 => Some(colors.bg_native),
            255 => Some(colors.fg_native),
            a => Some(pack_888(mix_rgb(colors.bg, colors.fg, a))),
        },
        MaskMode::RevTransparent => match 255 - coverage {
            0 => None,
            255 => Some(colors.bg_native),
            a => Some(pack_888(mix_rgb(unpack_888(current()), colors.bg, a))),
        },
    }
}

/// 32bpp kernel, 1:1 rows. Word access only, no pack/unpack dispatch.
fn mask_rows_32(
    mask: &Bitmap,
    ms: Rect,
    dst: &mut Bitmap,
    ds: Rect,
    colors: &MaskColors,
    mode: MaskMode,
) {
    for row in 0..ds.h as usize {
        let mrow = mask.row(ms.y as usize + row);
        let drow = dst.row_mut(ds.y as usize + row);
        for col in 0..ds.w as usize {
            let coverage = mrow[ms.x as usize + col];
            let dx = ds.x as usize + col;
            if let Some(out) = composite_32(coverage, || read_u32(drow, dx), colors, mode) {
                write_u32(drow, dx, out);
            }
        }
    }
}

/// 32bpp kernel, stretched rows.
fn stretched_rows_32(
    mask: &Bitmap,
    ms: Rect,
    dst: &mut Bitmap,
    ds: Rect,
    colors: &MaskColors,
    mode: MaskMode,
    x_step: u32,
    y_step: u32,
) {
    let mut y_acc: u32 = 0;
    for row in 0..ds.h as usize {
        let mrow = mask.row(ms.y as usize + (y_acc >> 16) as usize);
        y_acc += y_step;
        let drow = dst.row_mut(ds.y as usize + row);

        let mut x_acc: u32 = 0;
        for col in 0..ds.w as usize {
            let coverage = mrow[ms.x as usize + (x_acc >> 16) as usize];
            x_acc += x_step;
            let dx = ds.x as usize + col;
            if let Some(out) = composite_32(coverage, || read_u32(drow, dx), colors, mode) {
                write_u32(drow, dx, out);
            }
        }
    }
}

/// One mask pixel against any destination, through the mode registry.
#[inline]
fn composite_generic(
    coverage: u8,
    dst: &Bitmap,
    dx: usize,
    dy: usize,
    colors: &MaskColors,
    mode: MaskMode,
) -> Option<u32> {
    let mode_tag = dst.mode();
    match mode {
        MaskMode::Transparent => match coverage {
            0 => None,
            255 => Some(colors.fg_native),
            a => {
                let d = mode_tag.unpack(dst.read_native(dx, dy));
                let (r, g, b) = mix_rgb(d, colors.fg, a);
                Some(mode_tag.pack(r, g, b))
            }
        },
        MaskMode::Opaque => match coverage {
            0 => Some(colors.bg_native),
            255 => Some(colors.fg_native),
            a => {
                let (r, g, b) = mix_rgb(colors.bg, colors.fg, a);
                Some(mode_tag.pack(r, g, b))
            }
        },
        MaskMode::RevTransparent => match 255 - coverage {
            0 => None,
            255 => Some(colors.bg_native),
            a => {
                let d = mode_tag.unpack(dst.read_native(dx, dy));
                let (r, g, b) = mix_rgb(d, colors.bg, a);
                Some(mode_tag.pack(r, g, b))
            }
        },
    }
}

/// Generic kernel, 1:1 rows, for every non-32bpp destination depth.
fn mask_rows_generic(
    mask: &Bitmap,
    ms: Rect,
    dst: &mut Bitmap,
    ds: Rect,
    colors: &MaskColors,
    mode: MaskMode,
) {
    for row in 0..ds.h as usize {
        let my = ms.y as usize + row;
        let dy = ds.y as usize + row;
        for col in 0..ds.w as usize {
            let coverage = mask.read_native(ms.x as usize + col, my) as u8;
            let dx = ds.x as usize + col;
            if let Some(out) = composite_generic(coverage, dst, dx, dy, colors, mode) {
                dst.write_native(dx, dy, out);
            }
        }
    }
}

/// Generic kernel, stretched rows.
fn stretched_rows_generic(
    mask: &Bitmap,
    ms: Rect,
    dst: &mut Bitmap,
    ds: Rect,
    colors: &MaskColors,
    mode: MaskMode,
    x_step: u32,
    y_step: u32,
) {
    let mut y_acc: u32 = 0;
    for row in 0..ds.h as usize {
        let my = ms.y as usize + (y_acc >> 16) as usize;
        y_acc += y_step;
        let dy = ds.y as usize + row;

        let mut x_acc: u32 = 0;
        for col in 0..ds.w as usize {
            let mx = ms.x as usize + (x_acc >> 16) as usize;
            x_acc += x_step;
            let coverage = mask.read_native(mx, my) as u8;
            let dx = ds.x as usize + col;
            if let Some(out) = composite_generic(coverage, dst, dx, dy, colors, mode) {
                dst.write_native(dx, dy, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage_mask(values: &[&[u8]]) -> Bitmap<'static> {
        let h = values.len();
        let w = values[0].len();
        let mut mask = Bitmap::new(w, h, PixelMode::Indexed8, 0);
        for (y, row) in values.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                mask.put_pixel(x, y, u32::from(v));
            }
        }
        mask
    }

    #[test]
    fn transparent_mode_respects_coverage_extremes() {
        let mask = coverage_mask(&[&[0, 255]]);
        let mut dst = Bitmap::new(2, 1, PixelMode::Xrgb8888, 0);

        assert!(blit_mask(
            &mask,
            None,
            &mut dst,
            None,
            0x00FF_FFFF,
            0x0000_0000,
            MaskMode::Transparent,
        ));
        assert_eq!(dst.pixel(0, 0), 0x0000_0000);
        assert_eq!(dst.pixel(1, 0), 0x00FF_FFFF);
    }

    #[test]
    fn transparent_mode_blends_partial_coverage() {
        let mask = coverage_mask(&[&[128]]);
        let mut dst = Bitmap::new(1, 1, PixelMode::Xrgb8888, 0);

        assert!(blit_mask(
            &mask,
            None,
            &mut dst,
            None,
            0x00FF_FFFF,
            0,
            MaskMode::Transparent,
        ));
        let (r, g, b) = PixelMode::Xrgb8888.unpack(dst.pixel(0, 0));
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(r, mix(0, 255, 128));
        assert!((127..=129).contains(&r), "half coverage lands near half white");
    }

    #[test]
    fn opaque_mode_paints_the_whole_region() {
        let mask = coverage_mask(&[&[0, 255, 128]]);
        let mut dst = Bitmap::new(3, 1, PixelMode::Xrgb8888, 0);
        for x in 0..3 {
            dst.put_pixel(x, 0, 0x0012_3456);
        }

        assert!(blit_mask(
            &mask,
            None,
            &mut dst,
            None,
            0x00FF_0000,
            0x0000_00FF,
            MaskMode::Opaque,
        ));
        assert_eq!(dst.pixel(0, 0), 0x0000_00FF, "zero coverage shows bg");
        assert_eq!(dst.pixel(1, 0), 0x00FF_0000, "full coverage shows fg");
        let (r, _, b) = PixelMode::Xrgb8888.unpack(dst.pixel(2, 0));
        assert!(r > 0 && b > 0, "partial coverage mixes fg and bg, dst ignored");
    }

    #[test]
    fn rev_transparent_carves_the_shape_out() {
        let mask = coverage_mask(&[&[255, 0]]);
        let mut dst = Bitmap::new(2, 1, PixelMode::Xrgb8888, 0);
        dst.put_pixel(0, 0, 0x00AB_CDEF);
        dst.put_pixel(1, 0, 0x00AB_CDEF);

        assert!(blit_mask(
            &mask,
            None,
            &mut dst,
            None,
            0x00FF_FFFF,
            0x0011_2233,
            MaskMode::RevTransparent,
        ));
        assert_eq!(dst.pixel(0, 0), 0x00AB_CDEF, "covered pixel survives");
        assert_eq!(dst.pixel(1, 0), 0x0011_2233, "uncovered pixel becomes bg");
    }

    #[test]
    fn non_8bpp_mask_is_rejected() {
        let mask = Bitmap::new(2, 2, PixelMode::Xrgb8888, 0);
        let mut dst = Bitmap::new(2, 2, PixelMode::Xrgb8888, 0);
        assert!(!blit_mask(
            &mask,
            None,
            &mut dst,
            None,
            0x00FF_FFFF,
            0,
            MaskMode::Transparent,
        ));
        assert!(dst.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn generic_kernel_serves_16bpp_destinations() {
        let mask = coverage_mask(&[&[255, 0]]);
        let mut dst = Bitmap::new(2, 1, PixelMode::Rgb565, 0);
        dst.put_pixel(0, 0, 0x0123);
        dst.put_pixel(1, 0, 0x0123);

        let fg = PixelMode::Rgb565.pack(0xFF, 0x00, 0x00);
        assert!(blit_mask(&mask, None, &mut dst, None, fg, 0, MaskMode::Transparent));
        assert_eq!(dst.pixel(0, 0), fg);
        assert_eq!(dst.pixel(1, 0), 0x0123);
    }

    #[test]
    fn destination_clip_shifts_the_mask_window() {
        let mask = coverage_mask(&[&[10, 255]]);
        let mut dst = Bitmap::new(1, 1, PixelMode::Xrgb8888, 0);

        // Two mask pixels aimed at x = -1: only the second one lands.
        assert!(blit_mask(
            &mask,
            None,
            &mut dst,
            Some(Rect::new(-1, 0, 2, 1)),
            0x00FF_FFFF,
            0,
            MaskMode::Transparent,
        ));
        assert_eq!(dst.pixel(0, 0), 0x00FF_FFFF);
    }

    #[test]
    fn mismatched_extents_shrink_to_the_smaller() {
        let mask = coverage_mask(&[&[255, 255, 255]]);
        let mut dst = Bitmap::new(3, 1, PixelMode::Xrgb8888, 0);

        assert!(blit_mask(
            &mask,
            Some(Rect::new(0, 0, 3, 1)),
            &mut dst,
            Some(Rect::new(0, 0, 2, 1)),
            0x00FF_FFFF,
            0,
            MaskMode::Transparent,
        ));
        assert_eq!(dst.pixel(0, 0), 0x00FF_FFFF);
        assert_eq!(dst.pixel(1, 0), 0x00FF_FFFF);
        assert_eq!(dst.pixel(2, 0), 0, "third destination column stays out");
    }

    #[test]
    fn stretched_mask_doubles_coverage_cells() {
        let mask = coverage_mask(&[&[255, 0]]);
        let mut dst = Bitmap::new(4, 2, PixelMode::Xrgb8888, 0);

        assert!(blit_mask_stretched(
            &mask,
            None,
            &mut dst,
            Some(Rect::new(0, 0, 4, 2)),
            0x00FF_FFFF,
            0,
            MaskMode::Transparent,
        ));
        for y in 0..2 {
            assert_eq!(dst.pixel(0, y), 0x00FF_FFFF);
            assert_eq!(dst.pixel(1, y), 0x00FF_FFFF);
            assert_eq!(dst.pixel(2, y), 0);
            assert_eq!(dst.pixel(3, y), 0);
        }
    }

    #[test]
    fn clipped_stretch_samples_the_visible_portion() {
        let mask = coverage_mask(&[&[0, 255]]);
        let mut dst = Bitmap::new(2, 1, PixelMode::Xrgb8888, 0);

        // Stretch to four columns with the left two off-screen; the visible
        // half must show the right half of the mask (full coverage), not a
        // squeezed copy of the whole mask.
        assert!(blit_mask_stretched(
            &mask,
            None,
            &mut dst,
            Some(Rect::new(-2, 0, 4, 1)),
            0x00FF_FFFF,
            0,
            MaskMode::Transparent,
        ));
        assert_eq!(dst.pixel(0, 0), 0x00FF_FFFF);
        assert_eq!(dst.pixel(1, 0), 0x00FF_FFFF);
    }

    #[test]
    fn stretched_rejects_empty_destinations() {
        let mask = coverage_mask(&[&[255]]);
        let mut dst = Bitmap::new(2, 2, PixelMode::Xrgb8888, 0);
        assert!(!blit_mask_stretched(
            &mask,
            None,
            &mut dst,
            Some(Rect::new(5, 5, 2, 2)),
            0x00FF_FFFF,
            0,
            MaskMode::Transparent,
        ));
        assert!(!blit_mask_stretched(
            &mask,
            None,
            &mut dst,
            Some(Rect::new(0, 0, 0, 2)),
            0x00FF_FFFF,
            0,
            MaskMode::Transparent,
        ));
    }

    #[test]
    fn mix_endpoints_are_exact() {
        assert_eq!(mix(0x40, 0xC0, 0), 0x40);
        assert_eq!(mix(0x40, 0xC0, 255), 0xC0);
        // Division-free form agrees with the rounded exact quotient.
        for a in [1u8, 50, 128, 200, 254] {
            for (d, s) in [(0u8, 255u8), (255, 0), (10, 240), (77, 133)] {
                let exact = ((u32::from(d) * (255 - u32::from(a))
                    + u32::from(s) * u32::from(a)
                    + 127)
                    / 255) as u8;
                let got = mix(d, s, a);
                assert!(got.abs_diff(exact) <= 1, "d={d} s={s} a={a}");
            }
        }
    }
}

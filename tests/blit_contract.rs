//! End-to-end contract of the blit dispatcher.
//!
//! Exercises the clipping protocol, raster operations, colorkey exclusion,
//! overlapping self-blits and cross-format conversion through the public
//! API only.

use softblit::{blit, blit_stretched, Bitmap, BlitOp, ColorSlots, PixelMode, Rect};

fn red(bmp: &Bitmap) -> u32 {
    bmp.pixel_value(255, 0, 0)
}

#[test]
fn small_copy_touches_exactly_the_target_pixels() {
    // 2x2 red source into the middle of a zeroed 4x4 destination.
    let mut src = Bitmap::new(2, 2, PixelMode::Xrgb8888, 0);
    let red = red(&src);
    src.fill_rect(Rect::from_size(2, 2), red);

    let mut dst = Bitmap::new(4, 4, PixelMode::Xrgb8888, 0);
    assert!(blit(&src, None, &mut dst, Some(Rect::new(1, 1, 2, 2)), BlitOp::Copy));

    for y in 0..4 {
        for x in 0..4 {
            let inside = (1..3).contains(&x) && (1..3).contains(&y);
            let expected = if inside { red } else { 0 };
            assert_eq!(dst.pixel(x, y), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn empty_intersection_is_a_no_op() {
    let src = Bitmap::new(4, 4, PixelMode::Xrgb8888, 0);
    let mut dst = Bitmap::new(4, 4, PixelMode::Xrgb8888, 0);
    dst.fill_rect(Rect::from_size(4, 4), 0x00AB_CDEF);
    let before = dst.pixels().to_vec();

    // Entirely below and to the right of the destination.
    assert!(!blit(&src, None, &mut dst, Some(Rect::new(10, 10, 4, 4)), BlitOp::Copy));
    // Zero-area request.
    assert!(!blit(&src, Some(Rect::new(0, 0, 0, 4)), &mut dst, None, BlitOp::Copy));

    assert_eq!(dst.pixels(), &before[..]);
}

#[test]
fn clipping_keeps_source_and_destination_in_step() {
    // Destination rect hangs off the top-left corner; only the overlapping
    // quadrant of the source may land, taken from the source's far corner.
    let mut src = Bitmap::new(2, 2, PixelMode::Xrgb8888, 0);
    src.put_pixel(0, 0, 1);
    src.put_pixel(1, 0, 2);
    src.put_pixel(0, 1, 3);
    src.put_pixel(1, 1, 4);

    let mut dst = Bitmap::new(4, 4, PixelMode::Xrgb8888, 0);
    assert!(blit(&src, None, &mut dst, Some(Rect::new(-1, -1, 2, 2)), BlitOp::Copy));

    assert_eq!(dst.pixel(0, 0), 4);
    assert_eq!(dst.pixel(1, 0), 0);
    assert_eq!(dst.pixel(0, 1), 0);
}

#[test]
fn colorkeyed_pixels_leave_the_destination_alone() {
    let mut src = Bitmap::new(2, 1, PixelMode::Xrgb8888, 0);
    let key = src.pixel_value(255, 0, 255);
    src.put_pixel(0, 0, key);
    src.put_pixel(1, 0, red(&src));
    src.set_colorkey(true, key);

    let mut dst = Bitmap::new(2, 1, PixelMode::Xrgb8888, 0);
    dst.fill_rect(Rect::from_size(2, 1), 0x0011_2233);
    assert!(blit(&src, None, &mut dst, None, BlitOp::Copy));

    assert_eq!(dst.pixel(0, 0), 0x0011_2233, "keyed pixel skipped");
    assert_eq!(dst.pixel(1, 0), red(&dst), "unkeyed pixel copied");
}

#[test]
fn colorkey_is_honored_across_formats_too() {
    // Keying happens on native source values, before conversion.
    let mut src = Bitmap::new(2, 1, PixelMode::Rgb565, 0);
    let key = src.pixel_value(255, 0, 255);
    src.put_pixel(0, 0, key);
    src.put_pixel(1, 0, src.pixel_value(0, 255, 0));
    src.set_colorkey(true, key);

    let mut dst = Bitmap::new(2, 1, PixelMode::Xrgb8888, 0);
    assert!(blit(&src, None, &mut dst, None, BlitOp::Copy));

    assert_eq!(dst.pixel(0, 0), 0);
    assert_eq!(dst.pixel_rgb(dst.pixel(1, 0)), (0, 0xFC, 0));
}

#[test]
fn copy_onto_an_identical_copy_is_idempotent() {
    let mut src = Bitmap::new(5, 3, PixelMode::Bgr24, 0);
    for y in 0..3 {
        for x in 0..5 {
            src.put_pixel(x, y, src.pixel_value((x * 50) as u8, (y * 80) as u8, 7));
        }
    }

    let mut dst = src.copy();
    assert!(blit(&src, None, &mut dst, None, BlitOp::Copy));
    assert_eq!(dst.pixels(), src.pixels());
}

#[test]
fn overlapping_self_blit_matches_a_staged_copy() {
    let mut bmp = Bitmap::new(6, 6, PixelMode::Xrgb8888, 0);
    for y in 0..6 {
        for x in 0..6 {
            bmp.put_pixel(x, y, (y * 6 + x) as u32);
        }
    }

    // Reference: stage the source region in a temporary first.
    let mut staged = bmp.copy();
    let temp = staged.copy();
    assert!(blit(&temp, Some(Rect::new(0, 0, 4, 4)), &mut staged, Some(Rect::new(2, 2, 4, 4)), BlitOp::Copy));

    assert!(bmp.blit_within(Some(Rect::new(0, 0, 4, 4)), Some(Rect::new(2, 2, 4, 4)), BlitOp::Copy));
    assert_eq!(bmp.pixels(), staged.pixels());
}

#[test]
fn self_blit_in_the_other_direction_also_matches() {
    let mut bmp = Bitmap::new(6, 6, PixelMode::Rgb565, 0);
    for y in 0..6 {
        for x in 0..6 {
            bmp.put_pixel(x, y, (y * 6 + x) as u32);
        }
    }

    let mut staged = bmp.copy();
    let temp = staged.copy();
    assert!(blit(&temp, Some(Rect::new(2, 2, 4, 4)), &mut staged, Some(Rect::new(0, 0, 4, 4)), BlitOp::Copy));

    assert!(bmp.blit_within(Some(Rect::new(2, 2, 4, 4)), Some(Rect::new(0, 0, 4, 4)), BlitOp::Copy));
    assert_eq!(bmp.pixels(), staged.pixels());
}

#[test]
fn xor_with_itself_clears_the_region() {
    let mut src = Bitmap::new(3, 3, PixelMode::Xrgb8888, 0);
    src.fill_rect(Rect::from_size(3, 3), 0x00DE_ADBE);
    let mut dst = src.copy();

    assert!(blit(&src, None, &mut dst, None, BlitOp::Xor));
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(dst.pixel(x, y), 0);
        }
    }
}

#[test]
fn add_saturates_at_the_channel_maximum() {
    let mut src = Bitmap::new(1, 1, PixelMode::Xrgb8888, 0);
    src.put_pixel(0, 0, src.pixel_value(200, 10, 0));
    let mut dst = Bitmap::new(1, 1, PixelMode::Xrgb8888, 0);
    dst.put_pixel(0, 0, dst.pixel_value(100, 20, 5));

    assert!(blit(&src, None, &mut dst, None, BlitOp::AddSat));
    assert_eq!(dst.pixel_rgb(dst.pixel(0, 0)), (255, 30, 5));
}

#[test]
fn conversion_rounds_down_to_the_narrower_channels() {
    let mut src = Bitmap::new(1, 1, PixelMode::Xrgb8888, 0);
    src.put_pixel(0, 0, src.pixel_value(0xAB, 0xCD, 0xEF));

    let mut dst = Bitmap::new(1, 1, PixelMode::Rgb565, 0);
    assert!(blit(&src, None, &mut dst, None, BlitOp::Copy));

    // 5/6/5 channels keep only the top bits: A8/CC/E8 after replication
    // truncation.
    assert_eq!(dst.pixel_rgb(dst.pixel(0, 0)), (0xA8, 0xCC, 0xE8));
}

#[test]
fn one_pixel_source_stretches_to_a_solid_block() {
    let mut src = Bitmap::new(1, 1, PixelMode::Xrgb8888, 0);
    src.put_pixel(0, 0, 0x0012_3456);

    let mut dst = Bitmap::new(2, 2, PixelMode::Xrgb8888, 0);
    assert!(blit_stretched(&src, None, &mut dst, None, BlitOp::Copy));

    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(dst.pixel(x, y), 0x0012_3456);
        }
    }
}

#[test]
fn stretch_downscale_picks_nearest_source_pixels() {
    // 4x1 gradient squeezed into 2x1: nearest-neighbor keeps columns 0 and 2.
    let mut src = Bitmap::new(4, 1, PixelMode::Xrgb8888, 0);
    for x in 0..4 {
        src.put_pixel(x, 0, x as u32 + 1);
    }

    let mut dst = Bitmap::new(2, 1, PixelMode::Xrgb8888, 0);
    assert!(blit_stretched(&src, None, &mut dst, None, BlitOp::Copy));
    assert_eq!(dst.pixel(0, 0), 1);
    assert_eq!(dst.pixel(1, 0), 3);
}

#[test]
fn clipped_stretch_samples_the_proportional_source_window() {
    // 2x2 checkerboard doubled to 4x4 but placed at (-2, -2): only the
    // bottom-right quadrant lands, which maps back to source pixel (1, 1).
    let mut src = Bitmap::new(2, 2, PixelMode::Xrgb8888, 0);
    src.put_pixel(0, 0, 0xA);
    src.put_pixel(1, 1, 0xB);

    let mut dst = Bitmap::new(2, 2, PixelMode::Xrgb8888, 0);
    assert!(blit_stretched(&src, None, &mut dst, Some(Rect::new(-2, -2, 4, 4)), BlitOp::Copy));

    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(dst.pixel(x, y), 0xB, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn weak_bitmaps_blit_like_owned_ones() {
    let mut backing = vec![0u8; 4 * 4 * 4];
    {
        let mut weak = Bitmap::from_pixels(&mut backing, 4, 4, PixelMode::Xrgb8888, 0)
            .expect("buffer large enough");
        let mut src = Bitmap::new(4, 4, PixelMode::Xrgb8888, 0);
        src.fill_rect(Rect::from_size(4, 4), 0x0000_00FF);
        assert!(blit(&src, None, &mut weak, None, BlitOp::Copy));
        assert!(weak.is_weak());
    }
    // The caller's buffer holds the result after the weak bitmap is gone.
    assert_eq!(&backing[..4], &[0xFF, 0, 0, 0]);
}

#[test]
fn clear_uses_the_configured_clear_color() {
    let mut bmp = Bitmap::new(3, 2, PixelMode::Xrgb8888, 0);
    bmp.set_color(0x0055_AA55, ColorSlots::CLEAR_COLOR);
    bmp.clear();
    for y in 0..2 {
        for x in 0..3 {
            assert_eq!(bmp.pixel(x, y), 0x0055_AA55);
        }
    }
}

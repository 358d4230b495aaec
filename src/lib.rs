//! # softblit
//!
//! Software bitmap blitting and compositing.
//!
//! A [`Bitmap`] is a rectangular pixel buffer in one of a closed set of
//! [`PixelMode`]s, from 1-bit indexed up to 32-bit XRGB. The crate moves
//! pixels between bitmaps of any two modes: straight and stretched blits
//! with raster operations and an optional colorkey, coverage-mask
//! compositing, rectangle fills, drawing primitives, a built-in bitmap
//! font renderer with ANSI SGR color escapes, and a BMP/DIB decoder.
//! Presentation is a trait boundary; backends live elsewhere.
//!
//! ```
//! use softblit::{blit, Bitmap, BlitOp, PixelMode, Rect};
//!
//! let mut src = Bitmap::new(4, 4, PixelMode::Xrgb8888, 0);
//! src.fill_rect(Rect::from_size(4, 4), src.pixel_value(255, 0, 0));
//!
//! let mut dst = Bitmap::new(8, 8, PixelMode::Rgb565, 0);
//! blit(&src, None, &mut dst, Some(Rect::new(2, 2, 4, 4)), BlitOp::Copy);
//! assert_eq!(dst.pixel_rgb(dst.pixel(3, 3)), (0xF8, 0, 0));
//! ```

pub mod bitmap;
mod bits;
mod bmp;
pub mod pixel;
pub mod rect;
pub mod rop;
pub mod surface;

pub use bitmap::{
    blit, blit_mask, blit_mask_stretched, blit_stretched, Bitmap, ColorSlots, MaskMode,
};
pub use pixel::PixelMode;
pub use rect::Rect;
pub use rop::BlitOp;
pub use surface::PresentSurface;

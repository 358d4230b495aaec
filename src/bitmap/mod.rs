// src/bitmap/mod.rs
//! The bitmap entity: a rectangular pixel buffer plus the state every blit
//! consults (pixel mode, stride, clear color, colorkey) and the lazily
//! built glyph atlas the text renderer draws from.
//!
//! A bitmap either owns its storage (`Bitmap<'static>`, the common case) or
//! borrows a caller-supplied buffer for its lifetime, the "weak" form. A
//! weak bitmap never grows, frees or replaces the borrowed bytes; dropping
//! it releases nothing.

mod blit;
mod charset;
mod draw;
mod fill;
mod mask;
mod text;

pub use blit::{blit, blit_stretched};
pub use mask::{blit_mask, blit_mask_stretched, MaskMode};

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::bits;
use crate::pixel::PixelMode;

bitflags! {
    /// Selects which of a bitmap's color slots [`Bitmap::set_color`] assigns.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ColorSlots: u8 {
        /// The value written by [`Bitmap::clear`].
        const CLEAR_COLOR = 1 << 0;
        /// The source value skipped during blits once the key is enabled.
        const COLORKEY = 1 << 1;
    }
}

/// Pixel storage: owned rows, or a caller-supplied borrow (weak bitmap).
enum PixelStore<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

impl PixelStore<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            PixelStore::Owned(v) => v,
            PixelStore::Borrowed(b) => b,
        }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        match self {
            PixelStore::Owned(v) => v,
            PixelStore::Borrowed(b) => b,
        }
    }
}

/// A rectangular pixel buffer in one of the supported [`PixelMode`]s.
///
/// Rows are `stride` bytes apart; `stride` is at least the minimum for the
/// width and mode, and may be larger when the caller asked for padding.
/// Pixel values handed in and out of the accessors are always *native*,
/// meaning packed in this bitmap's own mode.
pub struct Bitmap<'a> {
    store: PixelStore<'a>,
    width: usize,
    height: usize,
    stride: usize,
    mode: PixelMode,
    clear_color: u32,
    colorkey_enabled: bool,
    colorkey: u32,
    atlas: OnceCell<Arc<Bitmap<'static>>>,
}

impl Bitmap<'static> {
    /// Creates a zero-filled bitmap with owned storage.
    ///
    /// `stride == 0` selects the minimum stride for `width` and `mode`; a
    /// non-zero stride below that minimum is raised to it.
    pub fn new(width: usize, height: usize, mode: PixelMode, stride: usize) -> Bitmap<'static> {
        let stride = stride.max(mode.min_stride(width));
        Bitmap {
            store: PixelStore::Owned(vec![0; stride * height]),
            width,
            height,
            stride,
            mode,
            clear_color: 0,
            colorkey_enabled: false,
            colorkey: 0,
            atlas: OnceCell::new(),
        }
    }
}

impl<'a> Bitmap<'a> {
    /// Creates a weak bitmap over `pixels`, which the caller keeps owning.
    ///
    /// The same stride rules as [`Bitmap::new`] apply. Returns `None` when
    /// the buffer is too small for `stride * height` bytes. Only the used
    /// prefix of `pixels` is borrowed.
    pub fn from_pixels(
        pixels: &'a mut [u8],
        width: usize,
        height: usize,
        mode: PixelMode,
        stride: usize,
    ) -> Option<Bitmap<'a>> {
        let stride = stride.max(mode.min_stride(width));
        let needed = stride * height;
        if pixels.len() < needed {
            return None;
        }
        Some(Bitmap {
            store: PixelStore::Borrowed(&mut pixels[..needed]),
            width,
            height,
            stride,
            mode,
            clear_color: 0,
            colorkey_enabled: false,
            colorkey: 0,
            atlas: OnceCell::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row, padding included.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn mode(&self) -> PixelMode {
        self.mode
    }

    /// True when the pixel storage is borrowed from the caller.
    pub fn is_weak(&self) -> bool {
        matches!(self.store, PixelStore::Borrowed(_))
    }

    /// The raw pixel bytes, exactly `stride * height` of them.
    pub fn pixels(&self) -> &[u8] {
        self.store.bytes()
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.store.bytes_mut()
    }

    pub fn clear_color(&self) -> u32 {
        self.clear_color
    }

    /// The native value treated as transparent when this bitmap is a blit
    /// source, if the key is enabled.
    pub fn colorkey(&self) -> Option<u32> {
        self.colorkey_enabled.then_some(self.colorkey)
    }

    /// Assigns `value` to every slot named in `slots`.
    pub fn set_color(&mut self, value: u32, slots: ColorSlots) {
        if slots.contains(ColorSlots::CLEAR_COLOR) {
            self.clear_color = value;
        }
        if slots.contains(ColorSlots::COLORKEY) {
            self.colorkey = value;
        }
    }

    /// Turns colorkeying on or off without touching the key value.
    pub fn enable_colorkey(&mut self, enabled: bool) {
        self.colorkey_enabled = enabled;
    }

    /// Sets the colorkey state and value in one call.
    pub fn set_colorkey(&mut self, enabled: bool, value: u32) {
        self.colorkey_enabled = enabled;
        self.colorkey = value;
    }

    /// Packs RGB into this bitmap's native encoding.
    pub fn pixel_value(&self, r: u8, g: u8, b: u8) -> u32 {
        self.mode.pack(r, g, b)
    }

    /// Unpacks a native value of this bitmap into RGB.
    pub fn pixel_rgb(&self, native: u32) -> (u8, u8, u8) {
        self.mode.unpack(native)
    }

    /// Reads the native pixel at `(x, y)`, or 0 when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.read_native(x, y)
    }

    /// Writes a native pixel at `(x, y)`; out-of-bounds writes are dropped.
    ///
    /// The checked no-op is what lets the draw primitives clip per pixel.
    pub fn put_pixel(&mut self, x: usize, y: usize, native: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.write_native(x, y, native);
    }

    /// Deep copy with owned storage. The glyph atlas is not carried over;
    /// it is rebuilt on the next text draw.
    pub fn copy(&self) -> Bitmap<'static> {
        Bitmap {
            store: PixelStore::Owned(self.store.bytes().to_vec()),
            width: self.width,
            height: self.height,
            stride: self.stride,
            mode: self.mode,
            clear_color: self.clear_color,
            colorkey_enabled: self.colorkey_enabled,
            colorkey: self.colorkey,
            atlas: OnceCell::new(),
        }
    }

    /// Converts this bitmap to another pixel mode.
    ///
    /// Converting to the current mode is a plain [`Bitmap::copy`]. Otherwise
    /// every pixel, the clear color and the colorkey value are re-encoded
    /// through canonical RGB.
    pub fn convert(&self, mode: PixelMode) -> Bitmap<'static> {
        if mode == self.mode {
            return self.copy();
        }

        log::trace!(
            "converting {}x{} bitmap {:?} -> {:?}",
            self.width,
            self.height,
            self.mode,
            mode
        );

        let mut out = Bitmap::new(self.width, self.height, mode, 0);
        blit::blit(self, None, &mut out, None, crate::rop::BlitOp::Copy);

        let (cr, cg, cb) = self.mode.unpack(self.clear_color);
        out.clear_color = mode.pack(cr, cg, cb);
        let (kr, kg, kb) = self.mode.unpack(self.colorkey);
        out.colorkey = mode.pack(kr, kg, kb);
        out.colorkey_enabled = self.colorkey_enabled;
        out
    }

    /// One row of pixel bytes.
    pub(crate) fn row(&self, y: usize) -> &[u8] {
        &self.store.bytes()[y * self.stride..(y + 1) * self.stride]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.stride;
        &mut self.store.bytes_mut()[y * stride..(y + 1) * stride]
    }

    /// Reads a native value without bounds checking beyond slice limits.
    /// Callers pre-clip; `(x, y)` must lie inside the bitmap.
    pub(crate) fn read_native(&self, x: usize, y: usize) -> u32 {
        let bytes = self.store.bytes();
        match self.mode.bits_per_pixel() {
            bpp @ (1 | 4 | 8) => bits::get_bits(bytes, self.stride, x, y, bpp),
            16 => {
                let off = y * self.stride + x * 2;
                u16::from_le_bytes([bytes[off], bytes[off + 1]]) as u32
            }
            24 => {
                let off = y * self.stride + x * 3;
                u32::from(bytes[off])
                    | u32::from(bytes[off + 1]) << 8
                    | u32::from(bytes[off + 2]) << 16
            }
            _ => {
                let off = y * self.stride + x * 4;
                u32::from_le_bytes([bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3]])
            }
        }
    }

    /// Writes a native value; same contract as [`Bitmap::read_native`].
    pub(crate) fn write_native(&mut self, x: usize, y: usize, native: u32) {
        let stride = self.stride;
        let bpp = self.mode.bits_per_pixel();
        let bytes = self.store.bytes_mut();
        match bpp {
            1 | 4 | 8 => bits::set_bits(bytes, stride, x, y, native, bpp),
            16 => {
                let off = y * stride + x * 2;
                bytes[off..off + 2].copy_from_slice(&(native as u16).to_le_bytes());
            }
            24 => {
                let off = y * stride + x * 3;
                bytes[off] = native as u8;
                bytes[off + 1] = (native >> 8) as u8;
                bytes[off + 2] = (native >> 16) as u8;
            }
            _ => {
                let off = y * stride + x * 4;
                bytes[off..off + 4].copy_from_slice(&native.to_le_bytes());
            }
        }
    }

    /// The cached 8bpp glyph atlas, building it on first use.
    pub(crate) fn charset_atlas(&self) -> Arc<Bitmap<'static>> {
        Arc::clone(self.atlas.get_or_init(|| Arc::new(charset::build_atlas())))
    }
}

impl fmt::Debug for Bitmap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("mode", &self.mode)
            .field("weak", &self.is_weak())
            .finish()
    }
}

// src/pixel.rs
//! Pixel mode registry: the closed set of supported pixel encodings and the
//! arithmetic that moves values between a mode's native packing and
//! canonical 8:8:8 RGB.
//!
//! A *native* value is a pixel packed the way its bitmap stores it, widened
//! to `u32`. Multi-byte natives are stored little-endian in the buffer, so
//! the shift tables below describe both the in-register and the on-disk
//! layout (these modes come from the BMP/DIB world, which is little-endian
//! throughout).

use serde::{Deserialize, Serialize};

/// Position and width of one channel inside a packed bitfield value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Channel {
    pub shift: u32,
    pub bits: u32,
}

impl Channel {
    const fn new(shift: u32, bits: u32) -> Self {
        Self { shift, bits }
    }

    pub(crate) const fn mask(self) -> u32 {
        (1 << self.bits) - 1
    }

    /// Extracts this channel from a native value, widened to 8 bits by
    /// shifting into the high end (low replication bits stay zero, which is
    /// what makes `pack` an exact inverse).
    const fn unpack(self, native: u32) -> u8 {
        (((native >> self.shift) & self.mask()) << (8 - self.bits)) as u8
    }

    /// Narrows an 8-bit channel and places it at this channel's position.
    const fn pack(self, value: u8) -> u32 {
        ((value >> (8 - self.bits)) as u32) << self.shift
    }
}

/// Per-mode channel table. Alpha/padding bits are never read or written.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bitfield {
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
}

const FIELDS_1555: Bitfield = Bitfield {
    red: Channel::new(10, 5),
    green: Channel::new(5, 5),
    blue: Channel::new(0, 5),
};

const FIELDS_565: Bitfield = Bitfield {
    red: Channel::new(11, 5),
    green: Channel::new(5, 6),
    blue: Channel::new(0, 5),
};

// Shared by XRGB8888 and BGR24: blue in the low byte either way.
const FIELDS_888: Bitfield = Bitfield {
    red: Channel::new(16, 8),
    green: Channel::new(8, 8),
    blue: Channel::new(0, 8),
};

/// The closed set of supported pixel encodings.
///
/// Indexed modes carry palette indices; the engine treats them as opaque
/// bit-depth-only values (palette lookup lives with whoever owns the
/// palette, e.g. the BMP decoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelMode {
    /// 1-bit palette index, 8 pixels per byte.
    Indexed1,
    /// 4-bit palette index, 2 pixels per byte.
    Indexed4,
    /// 8-bit palette index.
    Indexed8,
    /// 16-bit, X:R:G:B 1:5:5:5. The X bit is ignored.
    Xrgb1555,
    /// 16-bit, R:G:B 5:6:5.
    Rgb565,
    /// 24-bit, bytes B,G,R in memory, no padding.
    Bgr24,
    /// 32-bit, X:R:G:B 8:8:8:8. The X byte is ignored.
    Xrgb8888,
}

impl PixelMode {
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            PixelMode::Indexed1 => 1,
            PixelMode::Indexed4 => 4,
            PixelMode::Indexed8 => 8,
            PixelMode::Xrgb1555 | PixelMode::Rgb565 => 16,
            PixelMode::Bgr24 => 24,
            PixelMode::Xrgb8888 => 32,
        }
    }

    pub const fn is_indexed(self) -> bool {
        matches!(
            self,
            PixelMode::Indexed1 | PixelMode::Indexed4 | PixelMode::Indexed8
        )
    }

    pub(crate) const fn bitfield(self) -> Option<Bitfield> {
        match self {
            PixelMode::Xrgb1555 => Some(FIELDS_1555),
            PixelMode::Rgb565 => Some(FIELDS_565),
            PixelMode::Bgr24 | PixelMode::Xrgb8888 => Some(FIELDS_888),
            _ => None,
        }
    }

    /// Converts a native value of this mode to canonical RGB.
    ///
    /// Indexed values have no intrinsic color and come back black.
    pub fn unpack(self, native: u32) -> (u8, u8, u8) {
        match self.bitfield() {
            Some(bf) => (
                bf.red.unpack(native),
                bf.green.unpack(native),
                bf.blue.unpack(native),
            ),
            None => (0, 0, 0),
        }
    }

    /// Packs canonical RGB into a native value of this mode.
    ///
    /// Indexed modes have no RGB packing and come back zero.
    pub fn pack(self, r: u8, g: u8, b: u8) -> u32 {
        match self.bitfield() {
            Some(bf) => bf.red.pack(r) | bf.green.pack(g) | bf.blue.pack(b),
            None => 0,
        }
    }

    /// Minimum stride in bytes for a row of `width` pixels.
    ///
    /// Rows below 32bpp are padded up to 4-byte alignment, matching the
    /// DIB convention the on-disk formats use.
    pub fn min_stride(self, width: usize) -> usize {
        match self {
            PixelMode::Indexed1 => ((width + 7) / 8 + 3) & !3,
            PixelMode::Indexed4 => ((width + 1) / 2 + 3) & !3,
            PixelMode::Indexed8 => (width + 3) & !3,
            PixelMode::Xrgb1555 | PixelMode::Rgb565 => (width * 2 + 3) & !3,
            PixelMode::Bgr24 => (width * 3 + 3) & !3,
            PixelMode::Xrgb8888 => width * 4,
        }
    }

    /// Recognizes a mode from a bit depth and channel masks, as reported by
    /// DIB headers. All-zero masks select the depth's default layout.
    /// Unsupported combinations return `None`.
    pub fn from_masks(bpp: u16, r_mask: u32, g_mask: u32, b_mask: u32) -> Option<PixelMode> {
        let have_masks = (r_mask | g_mask | b_mask) != 0;
        match bpp {
            1 if !have_masks => Some(PixelMode::Indexed1),
            4 if !have_masks => Some(PixelMode::Indexed4),
            8 if !have_masks => Some(PixelMode::Indexed8),
            16 => match (r_mask, g_mask, b_mask) {
                (0xF800, 0x07E0, 0x001F) => Some(PixelMode::Rgb565),
                (0x7C00, 0x03E0, 0x001F) | (0, 0, 0) => Some(PixelMode::Xrgb1555),
                _ => None,
            },
            24 if !have_masks => Some(PixelMode::Bgr24),
            32 => match (r_mask, g_mask, b_mask) {
                (0x00FF_0000, 0x0000_FF00, 0x0000_00FF) | (0, 0, 0) => Some(PixelMode::Xrgb8888),
                _ => None,
            },
            _ => None,
        }
    }
}

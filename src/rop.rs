// src/rop.rs
//! Raster operations: the combining functions applied between source and
//! destination pixels during a blit.
//!
//! `Copy`/`Xor`/`Or`/`And` are valid directly on packed native values at any
//! depth. The saturating ops are not: a carry must never bleed from one
//! channel into its neighbor, so they dispatch on the destination depth.
//! 24/32bpp use the parallel masked add/sub on the red-blue and green
//! planes; 16bpp isolates each channel and clamps it at its own native
//! width; indexed values clamp at the field maximum.

use serde::{Deserialize, Serialize};

use crate::pixel::{Bitfield, PixelMode};

/// Blit combining operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlitOp {
    /// Destination becomes the source value.
    Copy,
    Xor,
    Or,
    And,
    /// Per-channel add, clamped at each channel's maximum.
    AddSat,
    /// Per-channel destination-minus-source, clamped at zero.
    SubSat,
}

/// Applies `op` to two packed native values of the given mode.
pub(crate) fn apply_native(dst: u32, src: u32, op: BlitOp, mode: PixelMode) -> u32 {
    match op {
        BlitOp::Copy => src,
        BlitOp::Xor => dst ^ src,
        BlitOp::Or => dst | src,
        BlitOp::And => dst & src,
        BlitOp::AddSat | BlitOp::SubSat => saturate_native(dst, src, op, mode),
    }
}

/// Applies `op` to one 8-bit channel pair; the generic cross-format path
/// works in this canonical space.
pub(crate) fn apply_channel(dst: u8, src: u8, op: BlitOp) -> u8 {
    match op {
        BlitOp::Copy => src,
        BlitOp::Xor => dst ^ src,
        BlitOp::Or => dst | src,
        BlitOp::And => dst & src,
        BlitOp::AddSat => dst.saturating_add(src),
        BlitOp::SubSat => dst.saturating_sub(src),
    }
}

fn saturate_native(dst: u32, src: u32, op: BlitOp, mode: PixelMode) -> u32 {
    match mode {
        PixelMode::Bgr24 | PixelMode::Xrgb8888 => match op {
            BlitOp::AddSat => add_sat_888(dst, src),
            _ => sub_sat_888(dst, src),
        },
        PixelMode::Xrgb1555 | PixelMode::Rgb565 => {
            let bf = match mode.bitfield() {
                Some(bf) => bf,
                None => return src,
            };
            saturate_bitfield(dst, src, bf, op)
        }
        // Index arithmetic clamps at the field maximum.
        PixelMode::Indexed1 | PixelMode::Indexed4 | PixelMode::Indexed8 => {
            let max = (1 << mode.bits_per_pixel()) - 1;
            match op {
                BlitOp::AddSat => (dst + src).min(max),
                _ => dst.saturating_sub(src),
            }
        }
    }
}

/// Parallel saturating add on 8:8:8 planes. Red and blue share one word
/// with a spare carry bit above each field; a detected carry widens to a
/// full 0xFF for exactly that field.
fn add_sat_888(dst: u32, src: u32) -> u32 {
    let rb = (dst & 0x00FF_00FF) + (src & 0x00FF_00FF);
    let carry = rb & 0x0100_0100;
    let rb = (rb | (carry - (carry >> 8))) & 0x00FF_00FF;

    let g = (dst & 0x0000_FF00) + (src & 0x0000_FF00);
    let g = if g & 0x0001_0000 != 0 { 0x0000_FF00 } else { g };

    rb | (g & 0x0000_FF00)
}

/// Parallel saturating subtract on 8:8:8 planes. A guard bit seeded above
/// each field survives only when that field did not borrow; fields that
/// borrowed collapse to zero.
fn sub_sat_888(dst: u32, src: u32) -> u32 {
    let x = ((dst & 0x00FF_00FF) | 0x0100_0100) - (src & 0x00FF_00FF);
    let no_borrow = x & 0x0100_0100;
    let rb = x & (no_borrow - (no_borrow >> 8)) & 0x00FF_00FF;

    let g = (dst & 0x0000_FF00).saturating_sub(src & 0x0000_FF00);

    rb | g
}

/// Per-channel clamp at native channel widths, for depths where the packed
/// fields leave no spare carry bits.
fn saturate_bitfield(dst: u32, src: u32, bf: Bitfield, op: BlitOp) -> u32 {
    let mut out = 0;
    for ch in [bf.red, bf.green, bf.blue] {
        let m = ch.mask();
        let d = (dst >> ch.shift) & m;
        let s = (src >> ch.shift) & m;
        let v = match op {
            BlitOp::AddSat => (d + s).min(m),
            _ => d.saturating_sub(s),
        };
        out |= v << ch.shift;
    }
    out
}

// src/bits.rs
//! Sub-byte pixel field access for the indexed modes.
//!
//! Pixel `(x, y)` in a `bpp`-bit format starts at bit `y*stride*8 + x*bpp`,
//! low bits first within each byte. Fields of 1, 4 or 8 bits never straddle
//! a byte boundary, so every access is a single-byte read-modify-write and
//! neighboring pixels are never disturbed.

const fn field_mask(bpp: u32) -> u32 {
    (1 << bpp) - 1
}

/// Reads a `bpp`-bit pixel field. `bpp` must be 1, 4 or 8.
pub(crate) fn get_bits(buffer: &[u8], stride: usize, x: usize, y: usize, bpp: u32) -> u32 {
    debug_assert!(matches!(bpp, 1 | 4 | 8));
    let bit_offset = y * stride * 8 + x * bpp as usize;
    let shift = (bit_offset % 8) as u32;
    (buffer[bit_offset / 8] as u32 >> shift) & field_mask(bpp)
}

/// Writes a `bpp`-bit pixel field. Excess bits of `value` are dropped.
pub(crate) fn set_bits(buffer: &mut [u8], stride: usize, x: usize, y: usize, value: u32, bpp: u32) {
    debug_assert!(matches!(bpp, 1 | 4 | 8));
    let bit_offset = y * stride * 8 + x * bpp as usize;
    let shift = (bit_offset % 8) as u32;
    let mask = field_mask(bpp);

    let byte = &mut buffer[bit_offset / 8];
    *byte = (*byte & !((mask << shift) as u8)) | (((value & mask) << shift) as u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_bit_fields_pack_eight_per_byte() {
        let mut buf = [0u8; 4];
        for x in 0..8 {
            set_bits(&mut buf, 4, x, 0, (x % 2) as u32, 1);
        }
        assert_eq!(buf[0], 0b1010_1010);
        for x in 0..8 {
            assert_eq!(get_bits(&buf, 4, x, 0, 1), (x % 2) as u32);
        }
    }

    #[test]
    fn four_bit_fields_pack_two_per_byte() {
        let mut buf = [0u8; 4];
        set_bits(&mut buf, 4, 0, 0, 0xA, 4);
        set_bits(&mut buf, 4, 1, 0, 0x5, 4);
        // Even x sits in the low nibble.
        assert_eq!(buf[0], 0x5A);
        assert_eq!(get_bits(&buf, 4, 0, 0, 4), 0xA);
        assert_eq!(get_bits(&buf, 4, 1, 0, 4), 0x5);
    }

    #[test]
    fn eight_bit_fields_are_byte_addressed() {
        let mut buf = [0u8; 8];
        set_bits(&mut buf, 4, 2, 1, 0xC3, 8);
        assert_eq!(buf[6], 0xC3);
        assert_eq!(get_bits(&buf, 4, 2, 1, 8), 0xC3);
    }

    #[test]
    fn writes_leave_neighbors_alone() {
        let mut buf = [0xFFu8; 2];
        set_bits(&mut buf, 2, 3, 0, 0, 4);
        assert_eq!(buf, [0xFF, 0x0F]);
        set_bits(&mut buf, 2, 2, 0, 0x7, 4);
        assert_eq!(buf, [0xFF, 0x07]);
    }

    #[test]
    fn stride_moves_rows_not_pixels() {
        let mut buf = [0u8; 8];
        set_bits(&mut buf, 4, 0, 1, 1, 1);
        assert_eq!(buf[4], 0x01);
        assert_eq!(get_bits(&buf, 4, 0, 0, 1), 0);
        assert_eq!(get_bits(&buf, 4, 0, 1, 1), 1);
    }

    #[test]
    fn oversized_values_are_masked_to_the_field() {
        let mut buf = [0u8; 4];
        set_bits(&mut buf, 4, 1, 0, 0xFFFF_FFF2, 4);
        assert_eq!(get_bits(&buf, 4, 1, 0, 4), 0x2);
        assert_eq!(buf[0], 0x20);
    }
}

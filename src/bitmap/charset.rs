// src/bitmap/charset.rs
//! Built-in 8x8 ASCII glyph table and the coverage atlas built from it.
//!
//! Each glyph is eight row bytes, most significant bit leftmost, drawn
//! 5 columns wide with the low three bits left clear for inter-glyph
//! air. Codes 0-31 and 127 are blank. The atlas lays the table out sixteen
//! glyphs per row as an 8bpp mask bitmap holding only 0 or 255, which is
//! exactly what the mask blitter wants.

use log::trace;

use crate::pixel::PixelMode;
use crate::rect::Rect;

use super::Bitmap;

pub(crate) const CHAR_W: usize = 8;
pub(crate) const CHAR_H: usize = 8;
pub(crate) const CHARS_PER_ROW: usize = 16;
pub(crate) const TABLE_LEN: usize = GLYPHS.len();

/// The atlas cell holding `code`'s glyph.
pub(crate) fn glyph_rect(code: u8) -> Rect {
    let idx = code as usize;
    Rect::new(
        ((idx % CHARS_PER_ROW) * CHAR_W) as i16,
        ((idx / CHARS_PER_ROW) * CHAR_H) as i16,
        CHAR_W as u16,
        CHAR_H as u16,
    )
}

/// Renders the glyph table into a fresh 8bpp coverage atlas.
pub(crate) fn build_atlas() -> Bitmap<'static> {
    trace!("building 8bpp glyph atlas");

    let rows = (TABLE_LEN + CHARS_PER_ROW - 1) / CHARS_PER_ROW;
    let mut atlas = Bitmap::new(CHARS_PER_ROW * CHAR_W, rows * CHAR_H, PixelMode::Indexed8, 0);

    for (idx, glyph) in GLYPHS.iter().enumerate() {
        let base_x = (idx % CHARS_PER_ROW) * CHAR_W;
        let base_y = (idx / CHARS_PER_ROW) * CHAR_H;
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..CHAR_W {
                if (bits >> (CHAR_W - 1 - col)) & 1 != 0 {
                    atlas.put_pixel(base_x + col, base_y + row, 0xFF);
                }
            }
        }
    }
    atlas
}

const BLANK: [u8; 8] = [0; 8];

/// 8x8 glyphs for codes 0-127, row bytes top to bottom, MSB leftmost.
#[rustfmt::skip]
pub(crate) const GLYPHS: [[u8; 8]; 128] = [
    // 0x00-0x1F: control codes, all blank.
    BLANK, BLANK, BLANK, BLANK, BLANK, BLANK, BLANK, BLANK,
    BLANK, BLANK, BLANK, BLANK, BLANK, BLANK, BLANK, BLANK,
    BLANK, BLANK, BLANK, BLANK, BLANK, BLANK, BLANK, BLANK,
    BLANK, BLANK, BLANK, BLANK, BLANK, BLANK, BLANK, BLANK,
    // 0x20 ' '
    BLANK,
    // 0x21 '!'
    [
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00000_000,
        0b00100_000,
        0b00000_000,
    ],
    // 0x22 '"'
    [
        0b01010_000,
        0b01010_000,
        0b01010_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
    ],
    // 0x23 '#'
    [
        0b01010_000,
        0b01010_000,
        0b11111_000,
        0b01010_000,
        0b11111_000,
        0b01010_000,
        0b01010_000,
        0b00000_000,
    ],
    // 0x24 '$'
    [
        0b00100_000,
        0b01111_000,
        0b10100_000,
        0b01110_000,
        0b00101_000,
        0b11110_000,
        0b00100_000,
        0b00000_000,
    ],
    // 0x25 '%'
    [
        0b11000_000,
        0b11001_000,
        0b00010_000,
        0b00100_000,
        0b01000_000,
        0b10011_000,
        0b00011_000,
        0b00000_000,
    ],
    // 0x26 '&'
    [
        0b01100_000,
        0b10010_000,
        0b10100_000,
        0b01000_000,
        0b10101_000,
        0b10010_000,
        0b01101_000,
        0b00000_000,
    ],
    // 0x27 '\''
    [
        0b00100_000,
        0b00100_000,
        0b01000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
    ],
    // 0x28 '('
    [
        0b00010_000,
        0b00100_000,
        0b01000_000,
        0b01000_000,
        0b01000_000,
        0b00100_000,
        0b00010_000,
        0b00000_000,
    ],
    // 0x29 ')'
    [
        0b01000_000,
        0b00100_000,
        0b00010_000,
        0b00010_000,
        0b00010_000,
        0b00100_000,
        0b01000_000,
        0b00000_000,
    ],
    // 0x2A '*'
    [
        0b00000_000,
        0b00100_000,
        0b10101_000,
        0b01110_000,
        0b10101_000,
        0b00100_000,
        0b00000_000,
        0b00000_000,
    ],
    // 0x2B '+'
    [
        0b00000_000,
        0b00100_000,
        0b00100_000,
        0b11111_000,
        0b00100_000,
        0b00100_000,
        0b00000_000,
        0b00000_000,
    ],
    // 0x2C ','
    [
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00100_000,
        0b00100_000,
        0b01000_000,
    ],
    // 0x2D '-'
    [
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b11111_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
    ],
    // 0x2E '.'
    [
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00110_000,
        0b00110_000,
        0b00000_000,
    ],
    // 0x2F '/'
    [
        0b00001_000,
        0b00010_000,
        0b00010_000,
        0b00100_000,
        0b01000_000,
        0b01000_000,
        0b10000_000,
        0b00000_000,
    ],
    // 0x30 '0'
    [
        0b01110_000,
        0b10001_000,
        0b10011_000,
        0b10101_000,
        0b11001_000,
        0b10001_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x31 '1'
    [
        0b00100_000,
        0b01100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x32 '2'
    [
        0b01110_000,
        0b10001_000,
        0b00001_000,
        0b00010_000,
        0b00100_000,
        0b01000_000,
        0b11111_000,
        0b00000_000,
    ],
    // 0x33 '3'
    [
        0b11111_000,
        0b00010_000,
        0b00100_000,
        0b00010_000,
        0b00001_000,
        0b10001_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x34 '4'
    [
        0b00010_000,
        0b00110_000,
        0b01010_000,
        0b10010_000,
        0b11111_000,
        0b00010_000,
        0b00010_000,
        0b00000_000,
    ],
    // 0x35 '5'
    [
        0b11111_000,
        0b10000_000,
        0b11110_000,
        0b00001_000,
        0b00001_000,
        0b10001_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x36 '6'
    [
        0b00110_000,
        0b01000_000,
        0b10000_000,
        0b11110_000,
        0b10001_000,
        0b10001_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x37 '7'
    [
        0b11111_000,
        0b00001_000,
        0b00010_000,
        0b00100_000,
        0b01000_000,
        0b01000_000,
        0b01000_000,
        0b00000_000,
    ],
    // 0x38 '8'
    [
        0b01110_000,
        0b10001_000,
        0b10001_000,
        0b01110_000,
        0b10001_000,
        0b10001_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x39 '9'
    [
        0b01110_000,
        0b10001_000,
        0b10001_000,
        0b01111_000,
        0b00001_000,
        0b00010_000,
        0b01100_000,
        0b00000_000,
    ],
    // 0x3A ':'
    [
        0b00000_000,
        0b00110_000,
        0b00110_000,
        0b00000_000,
        0b00110_000,
        0b00110_000,
        0b00000_000,
        0b00000_000,
    ],
    // 0x3B ';'
    [
        0b00000_000,
        0b00110_000,
        0b00110_000,
        0b00000_000,
        0b00110_000,
        0b00100_000,
        0b01000_000,
        0b00000_000,
    ],
    // 0x3C '<'
    [
        0b00010_000,
        0b00100_000,
        0b01000_000,
        0b10000_000,
        0b01000_000,
        0b00100_000,
        0b00010_000,
        0b00000_000,
    ],
    // 0x3D '='
    [
        0b00000_000,
        0b00000_000,
        0b11111_000,
        0b00000_000,
        0b11111_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
    ],
    // 0x3E '>'
    [
        0b01000_000,
        0b00100_000,
        0b00010_000,
        0b00001_000,
        0b00010_000,
        0b00100_000,
        0b01000_000,
        0b00000_000,
    ],
    // 0x3F '?'
    [
        0b01110_000,
        0b10001_000,
        0b00001_000,
        0b00010_000,
        0b00100_000,
        0b00000_000,
        0b00100_000,
        0b00000_000,
    ],
    // 0x40 '@'
    [
        0b01110_000,
        0b10001_000,
        0b00001_000,
        0b01101_000,
        0b10101_000,
        0b10101_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x41 'A'
    [
        0b01110_000,
        0b10001_000,
        0b10001_000,
        0b11111_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b00000_000,
    ],
    // 0x42 'B'
    [
        0b11110_000,
        0b10001_000,
        0b10001_000,
        0b11110_000,
        0b10001_000,
        0b10001_000,
        0b11110_000,
        0b00000_000,
    ],
    // 0x43 'C'
    [
        0b01110_000,
        0b10001_000,
        0b10000_000,
        0b10000_000,
        0b10000_000,
        0b10001_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x44 'D'
    [
        0b11100_000,
        0b10010_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10010_000,
        0b11100_000,
        0b00000_000,
    ],
    // 0x45 'E'
    [
        0b11111_000,
        0b10000_000,
        0b10000_000,
        0b11110_000,
        0b10000_000,
        0b10000_000,
        0b11111_000,
        0b00000_000,
    ],
    // 0x46 'F'
    [
        0b11111_000,
        0b10000_000,
        0b10000_000,
        0b11110_000,
        0b10000_000,
        0b10000_000,
        0b10000_000,
        0b00000_000,
    ],
    // 0x47 'G'
    [
        0b01110_000,
        0b10001_000,
        0b10000_000,
        0b10111_000,
        0b10001_000,
        0b10001_000,
        0b01111_000,
        0b00000_000,
    ],
    // 0x48 'H'
    [
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b11111_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b00000_000,
    ],
    // 0x49 'I'
    [
        0b01110_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x4A 'J'
    [
        0b00111_000,
        0b00010_000,
        0b00010_000,
        0b00010_000,
        0b00010_000,
        0b10010_000,
        0b01100_000,
        0b00000_000,
    ],
    // 0x4B 'K'
    [
        0b10001_000,
        0b10010_000,
        0b10100_000,
        0b11000_000,
        0b10100_000,
        0b10010_000,
        0b10001_000,
        0b00000_000,
    ],
    // 0x4C 'L'
    [
        0b10000_000,
        0b10000_000,
        0b10000_000,
        0b10000_000,
        0b10000_000,
        0b10000_000,
        0b11111_000,
        0b00000_000,
    ],
    // 0x4D 'M'
    [
        0b10001_000,
        0b11011_000,
        0b10101_000,
        0b10101_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b00000_000,
    ],
    // 0x4E 'N'
    [
        0b10001_000,
        0b10001_000,
        0b11001_000,
        0b10101_000,
        0b10011_000,
        0b10001_000,
        0b10001_000,
        0b00000_000,
    ],
    // 0x4F 'O'
    [
        0b01110_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x50 'P'
    [
        0b11110_000,
        0b10001_000,
        0b10001_000,
        0b11110_000,
        0b10000_000,
        0b10000_000,
        0b10000_000,
        0b00000_000,
    ],
    // 0x51 'Q'
    [
        0b01110_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10101_000,
        0b10010_000,
        0b01101_000,
        0b00000_000,
    ],
    // 0x52 'R'
    [
        0b11110_000,
        0b10001_000,
        0b10001_000,
        0b11110_000,
        0b10100_000,
        0b10010_000,
        0b10001_000,
        0b00000_000,
    ],
    // 0x53 'S'
    [
        0b01111_000,
        0b10000_000,
        0b10000_000,
        0b01110_000,
        0b00001_000,
        0b00001_000,
        0b11110_000,
        0b00000_000,
    ],
    // 0x54 'T'
    [
        0b11111_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00000_000,
    ],
    // 0x55 'U'
    [
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x56 'V'
    [
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b01010_000,
        0b00100_000,
        0b00000_000,
    ],
    // 0x57 'W'
    [
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10101_000,
        0b10101_000,
        0b10101_000,
        0b01010_000,
        0b00000_000,
    ],
    // 0x58 'X'
    [
        0b10001_000,
        0b10001_000,
        0b01010_000,
        0b00100_000,
        0b01010_000,
        0b10001_000,
        0b10001_000,
        0b00000_000,
    ],
    // 0x59 'Y'
    [
        0b10001_000,
        0b10001_000,
        0b01010_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00000_000,
    ],
    // 0x5A 'Z'
    [
        0b11111_000,
        0b00001_000,
        0b00010_000,
        0b00100_000,
        0b01000_000,
        0b10000_000,
        0b11111_000,
        0b00000_000,
    ],
    // 0x5B '['
    [
        0b01110_000,
        0b01000_000,
        0b01000_000,
        0b01000_000,
        0b01000_000,
        0b01000_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x5C '\\'
    [
        0b10000_000,
        0b01000_000,
        0b01000_000,
        0b00100_000,
        0b00010_000,
        0b00010_000,
        0b00001_000,
        0b00000_000,
    ],
    // 0x5D ']'
    [
        0b01110_000,
        0b00010_000,
        0b00010_000,
        0b00010_000,
        0b00010_000,
        0b00010_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x5E '^'
    [
        0b00100_000,
        0b01010_000,
        0b10001_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
    ],
    // 0x5F '_'
    [
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b11111_000,
    ],
    // 0x60 '`'
    [
        0b01000_000,
        0b00100_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
    ],
    // 0x61 'a'
    [
        0b00000_000,
        0b00000_000,
        0b01110_000,
        0b00001_000,
        0b01111_000,
        0b10001_000,
        0b01111_000,
        0b00000_000,
    ],
    // 0x62 'b'
    [
        0b10000_000,
        0b10000_000,
        0b11110_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b11110_000,
        0b00000_000,
    ],
    // 0x63 'c'
    [
        0b00000_000,
        0b00000_000,
        0b01110_000,
        0b10000_000,
        0b10000_000,
        0b10001_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x64 'd'
    [
        0b00001_000,
        0b00001_000,
        0b01111_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b01111_000,
        0b00000_000,
    ],
    // 0x65 'e'
    [
        0b00000_000,
        0b00000_000,
        0b01110_000,
        0b10001_000,
        0b11111_000,
        0b10000_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x66 'f'
    [
        0b00110_000,
        0b01000_000,
        0b11100_000,
        0b01000_000,
        0b01000_000,
        0b01000_000,
        0b01000_000,
        0b00000_000,
    ],
    // 0x67 'g'
    [
        0b00000_000,
        0b00000_000,
        0b01111_000,
        0b10001_000,
        0b10001_000,
        0b01111_000,
        0b00001_000,
        0b01110_000,
    ],
    // 0x68 'h'
    [
        0b10000_000,
        0b10000_000,
        0b11110_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b00000_000,
    ],
    // 0x69 'i'
    [
        0b00100_000,
        0b00000_000,
        0b01100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x6A 'j'
    [
        0b00010_000,
        0b00000_000,
        0b00110_000,
        0b00010_000,
        0b00010_000,
        0b00010_000,
        0b10010_000,
        0b01100_000,
    ],
    // 0x6B 'k'
    [
        0b10000_000,
        0b10000_000,
        0b10010_000,
        0b10100_000,
        0b11000_000,
        0b10100_000,
        0b10010_000,
        0b00000_000,
    ],
    // 0x6C 'l'
    [
        0b01100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x6D 'm'
    [
        0b00000_000,
        0b00000_000,
        0b11010_000,
        0b10101_000,
        0b10101_000,
        0b10101_000,
        0b10101_000,
        0b00000_000,
    ],
    // 0x6E 'n'
    [
        0b00000_000,
        0b00000_000,
        0b11110_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b00000_000,
    ],
    // 0x6F 'o'
    [
        0b00000_000,
        0b00000_000,
        0b01110_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b01110_000,
        0b00000_000,
    ],
    // 0x70 'p'
    [
        0b00000_000,
        0b00000_000,
        0b11110_000,
        0b10001_000,
        0b10001_000,
        0b11110_000,
        0b10000_000,
        0b10000_000,
    ],
    // 0x71 'q'
    [
        0b00000_000,
        0b00000_000,
        0b01111_000,
        0b10001_000,
        0b10001_000,
        0b01111_000,
        0b00001_000,
        0b00001_000,
    ],
    // 0x72 'r'
    [
        0b00000_000,
        0b00000_000,
        0b10110_000,
        0b11001_000,
        0b10000_000,
        0b10000_000,
        0b10000_000,
        0b00000_000,
    ],
    // 0x73 's'
    [
        0b00000_000,
        0b00000_000,
        0b01111_000,
        0b10000_000,
        0b01110_000,
        0b00001_000,
        0b11110_000,
        0b00000_000,
    ],
    // 0x74 't'
    [
        0b01000_000,
        0b01000_000,
        0b11100_000,
        0b01000_000,
        0b01000_000,
        0b01001_000,
        0b00110_000,
        0b00000_000,
    ],
    // 0x75 'u'
    [
        0b00000_000,
        0b00000_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b10011_000,
        0b01101_000,
        0b00000_000,
    ],
    // 0x76 'v'
    [
        0b00000_000,
        0b00000_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b01010_000,
        0b00100_000,
        0b00000_000,
    ],
    // 0x77 'w'
    [
        0b00000_000,
        0b00000_000,
        0b10001_000,
        0b10101_000,
        0b10101_000,
        0b10101_000,
        0b01010_000,
        0b00000_000,
    ],
    // 0x78 'x'
    [
        0b00000_000,
        0b00000_000,
        0b10001_000,
        0b01010_000,
        0b00100_000,
        0b01010_000,
        0b10001_000,
        0b00000_000,
    ],
    // 0x79 'y'
    [
        0b00000_000,
        0b00000_000,
        0b10001_000,
        0b10001_000,
        0b10001_000,
        0b01111_000,
        0b00001_000,
        0b01110_000,
    ],
    // 0x7A 'z'
    [
        0b00000_000,
        0b00000_000,
        0b11111_000,
        0b00010_000,
        0b00100_000,
        0b01000_000,
        0b11111_000,
        0b00000_000,
    ],
    // 0x7B '{'
    [
        0b00010_000,
        0b00100_000,
        0b00100_000,
        0b01000_000,
        0b00100_000,
        0b00100_000,
        0b00010_000,
        0b00000_000,
    ],
    // 0x7C '|'
    [
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00100_000,
        0b00000_000,
    ],
    // 0x7D '}'
    [
        0b01000_000,
        0b00100_000,
        0b00100_000,
        0b00010_000,
        0b00100_000,
        0b00100_000,
        0b01000_000,
        0b00000_000,
    ],
    // 0x7E '~'
    [
        0b00000_000,
        0b01010_000,
        0b10100_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
        0b00000_000,
    ],
    // 0x7F DEL
    BLANK,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_coverage(atlas: &Bitmap, code: u8) -> usize {
        let r = glyph_rect(code);
        let mut lit = 0;
        for y in 0..CHAR_H {
            for x in 0..CHAR_W {
                if atlas.pixel(r.x as usize + x, r.y as usize + y) != 0 {
                    lit += 1;
                }
            }
        }
        lit
    }

    #[test]
    fn atlas_has_the_expected_geometry() {
        let atlas = build_atlas();
        assert_eq!(atlas.width(), 128);
        assert_eq!(atlas.height(), 64);
        assert_eq!(atlas.mode(), PixelMode::Indexed8);
    }

    #[test]
    fn atlas_holds_only_zero_or_full_coverage() {
        let atlas = build_atlas();
        for y in 0..atlas.height() {
            for x in 0..atlas.width() {
                let v = atlas.pixel(x, y);
                assert!(v == 0 || v == 0xFF, "({x},{y}) = {v:#x}");
            }
        }
    }

    #[test]
    fn space_is_blank_and_letters_are_not() {
        let atlas = build_atlas();
        assert_eq!(cell_coverage(&atlas, b' '), 0);
        assert_eq!(cell_coverage(&atlas, 0x00), 0, "control cells are blank");
        assert!(cell_coverage(&atlas, b'A') > 0);
        assert!(cell_coverage(&atlas, b'g') > 0);
        assert!(cell_coverage(&atlas, b'?') > 0);
    }

    #[test]
    fn glyph_cells_tile_sixteen_per_row() {
        assert_eq!(glyph_rect(0), Rect::new(0, 0, 8, 8));
        assert_eq!(glyph_rect(15), Rect::new(120, 0, 8, 8));
        assert_eq!(glyph_rect(16), Rect::new(0, 8, 8, 8));
        assert_eq!(glyph_rect(b'A'), Rect::new((65 % 16) * 8, (65 / 16) * 8, 8, 8));
    }

    #[test]
    fn uppercase_a_has_its_crossbar() {
        // Row 3 of 'A' is the full-width crossbar.
        let glyph = GLYPHS[b'A' as usize];
        assert_eq!(glyph[3], 0b11111_000);
        assert_eq!(glyph[7], 0);
    }
}

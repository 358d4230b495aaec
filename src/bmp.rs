// src/bmp.rs
//! BMP/DIB decoding into a [`Bitmap`].
//!
//! Supports the BITMAPINFOHEADER family: uncompressed BI_RGB at every
//! depth, BI_BITFIELDS mask sets matching the closed mode set, and the
//! RLE4/RLE8 palette encodings. Palette images come back as BGR24; the
//! 16/24/32-bit formats keep their native layout. All multi-byte fields
//! are little-endian.

use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use log::warn;

use crate::bitmap::Bitmap;
use crate::pixel::PixelMode;

const SIGNATURE: u16 = 0x4D42; // "BM"
const INFO_HEADER_SIZE: u32 = 40;

const BI_RGB: u32 = 0;
const BI_RLE8: u32 = 1;
const BI_RLE4: u32 = 2;
const BI_BITFIELDS: u32 = 3;

/// Little-endian cursor over the encoded file.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.data.len());
        let Some(end) = end else {
            bail!("unexpected end of file at offset {}", self.pos);
        };
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(self.u32()? as i32)
    }
}

/// Source row size: DIB rows are padded to 32-bit boundaries.
fn encoded_row_size(width: u32, bpp: u16) -> usize {
    (((width as usize * bpp as usize) + 31) & !31) >> 3
}

fn palette_len(bpp: u16, colors_used: u32) -> usize {
    if colors_used != 0 {
        return colors_used as usize;
    }
    match bpp {
        1 => 2,
        4 => 16,
        8 => 256,
        _ => 0,
    }
}

impl Bitmap<'static> {
    /// Decodes an in-memory BMP file.
    pub fn from_bmp_data(data: &[u8]) -> Result<Bitmap<'static>> {
        let mut r = Reader::new(data);

        // File header: signature, size, two reserved words, raster offset.
        let signature = r.u16().context("reading BMP signature")?;
        ensure!(signature == SIGNATURE, "invalid BMP signature, expected BM");
        let file_size = r.u32()?;
        r.skip(4)?;
        let data_offset = r.u32()? as usize;
        ensure!(
            data_offset != 0 && data_offset as u32 <= file_size && data_offset <= data.len(),
            "incorrect raster data offset {data_offset}"
        );

        // Info header: only the 40-byte BITMAPINFOHEADER is supported.
        let header_size = r.u32()?;
        ensure!(
            header_size == INFO_HEADER_SIZE,
            "unsupported DIB header size {header_size}, expected BITMAPINFOHEADER"
        );

        let width = r.u32()?;
        let height = r.i32()?;
        ensure!(width != 0 && height != 0, "zero-sized bitmap");
        let abs_height = height.unsigned_abs();
        ensure!(
            abs_height <= u32::MAX / width,
            "bitmap dimensions overflow ({width}x{height})"
        );

        let planes = r.u16()?;
        ensure!(planes == 1, "unsupported planes count {planes}");

        let bpp = r.u16()?;
        ensure!(
            matches!(bpp, 1 | 4 | 8 | 16 | 24 | 32),
            "unsupported bit count {bpp}"
        );

        let compression = r.u32()?;
        match compression {
            BI_RGB | BI_BITFIELDS => {}
            BI_RLE8 => ensure!(bpp == 8, "RLE8 encoding requires 8bpp, got {bpp}"),
            BI_RLE4 => ensure!(bpp == 4, "RLE4 encoding requires 4bpp, got {bpp}"),
            other => bail!("unsupported compression type {other}"),
        }

        r.skip(4)?; // image size
        r.skip(8)?; // pixels per meter
        let colors_used = r.u32()?;
        let max_colors = if bpp <= 8 { 1u32 << bpp } else { 256 };
        ensure!(colors_used <= max_colors, "incorrect palette size {colors_used}");
        r.skip(4)?; // important colors

        // Bitfield masks, when present, must not overlap.
        let (red_mask, green_mask, blue_mask) = if compression == BI_BITFIELDS {
            ensure!(
                bpp == 16 || bpp == 32,
                "bitfields only allowed for 16bpp and 32bpp bitmaps"
            );
            let red = r.u32()?;
            let green = r.u32()?;
            let blue = r.u32()?;
            ensure!(
                red & green == 0 && red & blue == 0 && green & blue == 0,
                "overlapping bitfield masks"
            );
            (red, green, blue)
        } else {
            (0, 0, 0)
        };

        let mode = PixelMode::from_masks(bpp, red_mask, green_mask, blue_mask)
            .with_context(|| {
                format!("unsupported pixel layout ({bpp}bpp, masks {red_mask:#x}/{green_mask:#x}/{blue_mask:#x})")
            })?;

        // Color table of BGRX quads. A stream may legally omit it when the
        // raster data starts right here.
        let table_len = palette_len(bpp, colors_used);
        let palette: Vec<(u8, u8, u8)> = if table_len == 0 {
            Vec::new()
        } else if r.pos() == data_offset {
            warn!("{bpp}bpp bitmap stream contains no color table");
            ensure!(
                bpp == 1,
                "missing color table in a {bpp}bpp bitmap"
            );
            vec![(0, 0, 0), (255, 255, 255)]
        } else {
            let mut table = Vec::with_capacity(table_len);
            for _ in 0..table_len {
                let b = r.u8()?;
                let g = r.u8()?;
                let rr = r.u8()?;
                r.skip(1)?;
                table.push((rr, g, b));
            }
            table
        };

        ensure!(
            r.pos() == data_offset,
            "incorrect raster offset: header ends at {}, data claimed at {data_offset}",
            r.pos()
        );

        let mut bmp = Bitmap::new(width as usize, abs_height as usize, mode, 0);
        match compression {
            BI_RLE4 | BI_RLE8 => {
                decode_rle(&mut r, &mut bmp, compression == BI_RLE4)
                    .context("decoding RLE raster")?
            }
            _ => decode_uncompressed(&mut r, &mut bmp, width, height, bpp)
                .context("decoding raster rows")?,
        }

        if mode.is_indexed() {
            return Ok(unpalettize(&bmp, &palette));
        }
        Ok(bmp)
    }

    /// Reads and decodes a BMP file from disk.
    pub fn from_bmp_file(path: impl AsRef<Path>) -> Result<Bitmap<'static>> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("reading BMP file {}", path.display()))?;
        Self::from_bmp_data(&data).with_context(|| format!("decoding {}", path.display()))
    }
}

/// Decodes padded source rows into the bitmap, bottom-up unless the encoded
/// height was negative. Short input is an error, never a partial bitmap.
///
/// The sub-byte depths are repacked pixel by pixel: DIB rows place the
/// first pixel in the high bits of each byte, the opposite of the layout
/// [`crate::bits`] uses.
fn decode_uncompressed(
    r: &mut Reader,
    bmp: &mut Bitmap,
    width: u32,
    height: i32,
    bpp: u16,
) -> Result<()> {
    let top_down = height < 0;
    let rows = bmp.height();
    let src_row = encoded_row_size(width, bpp);
    let copy = src_row.min(bmp.stride());

    for row in 0..rows {
        let data = r.take(src_row)?;
        let y = if top_down { row } else { rows - 1 - row };
        match bpp {
            1 | 4 => {
                let bpp = bpp as usize;
                let mask = (1u32 << bpp) - 1;
                for x in 0..width as usize {
                    let bit = x * bpp;
                    let index = (data[bit / 8] as u32 >> (8 - bpp - bit % 8)) & mask;
                    bmp.put_pixel(x, y, index);
                }
            }
            _ => bmp.row_mut(y)[..copy].copy_from_slice(&data[..copy]),
        }
    }
    Ok(())
}

/// Decodes an RLE4/RLE8 stream into the bitmap's indexed buffer.
///
/// Rows are bottom-up. Runs that would pass the right edge are clamped to
/// it; a write below the last row or a truncated stream is an error.
fn decode_rle(r: &mut Reader, bmp: &mut Bitmap, rle4: bool) -> Result<()> {
    let width = bmp.width();

    let mut x = 0usize;
    let mut y = 0usize;

    fn put(bmp: &mut Bitmap, x: usize, y: usize, index: u32) -> Result<()> {
        ensure!(y < bmp.height(), "RLE decoding writes outside of frame");
        bmp.put_pixel(x, bmp.height() - 1 - y, index);
        Ok(())
    }

    loop {
        let count = r.u8().context("truncated RLE stream")?;
        let value = r.u8().context("truncated RLE stream")?;

        if count > 0 {
            // Encoded run: `count` pixels of `value`, clamped to the row.
            for i in 0..count as usize {
                if x >= width {
                    break;
                }
                let index = if rle4 {
                    if i % 2 == 0 {
                        value >> 4
                    } else {
                        value & 0x0F
                    }
                } else {
                    value
                };
                put(bmp, x, y, index as u32)?;
                x += 1;
            }
            continue;
        }

        match value {
            0 => {
                x = 0;
                y += 1;
            }
            1 => return Ok(()),
            2 => {
                x += r.u8().context("truncated RLE delta")? as usize;
                y += r.u8().context("truncated RLE delta")? as usize;
            }
            n => {
                // Absolute run: n literal indices, padded to a word.
                let n = n as usize;
                let bytes = if rle4 { (n + 1) / 2 } else { n };
                let data = r.take(bytes + bytes % 2).context("truncated RLE run")?;
                for i in 0..n {
                    let index = if rle4 {
                        let b = data[i / 2];
                        if i % 2 == 0 {
                            b >> 4
                        } else {
                            b & 0x0F
                        }
                    } else {
                        data[i]
                    };
                    if x >= width {
                        continue;
                    }
                    put(bmp, x, y, index as u32)?;
                    x += 1;
                }
            }
        }
    }
}

/// Converts an indexed bitmap to BGR24 through its palette. Out-of-range
/// indices render black.
fn unpalettize(src: &Bitmap, palette: &[(u8, u8, u8)]) -> Bitmap<'static> {
    let mut out = Bitmap::new(src.width(), src.height(), PixelMode::Bgr24, 0);
    for y in 0..src.height() {
        for x in 0..src.width() {
            let index = src.pixel(x, y) as usize;
            let (r, g, b) = match palette.get(index) {
                Some(&rgb) => rgb,
                None => {
                    warn!("palette index {index} out of range ({} entries)", palette.len());
                    (0, 0, 0)
                }
            };
            out.put_pixel(x, y, PixelMode::Bgr24.pack(r, g, b));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a minimal BITMAPINFOHEADER file around raw raster bytes.
    fn synthesize(
        width: u32,
        height: i32,
        bpp: u16,
        compression: u32,
        masks: Option<(u32, u32, u32)>,
        palette: &[(u8, u8, u8)],
        raster: &[u8],
    ) -> Vec<u8> {
        let mask_bytes = if masks.is_some() { 12 } else { 0 };
        let data_offset = 14 + 40 + mask_bytes + 4 * palette.len() as u32;
        let file_size = data_offset + raster.len() as u32;

        let mut out = Vec::new();
        out.extend_from_slice(&SIGNATURE.to_le_bytes());
        out.extend_from_slice(&file_size.to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&data_offset.to_le_bytes());

        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&bpp.to_le_bytes());
        out.extend_from_slice(&compression.to_le_bytes());
        out.extend_from_slice(&(raster.len() as u32).to_le_bytes());
        out.extend_from_slice(&[0; 8]);
        out.extend_from_slice(&(palette.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());

        if let Some((r, g, b)) = masks {
            out.extend_from_slice(&r.to_le_bytes());
            out.extend_from_slice(&g.to_le_bytes());
            out.extend_from_slice(&b.to_le_bytes());
        }
        for &(r, g, b) in palette {
            out.extend_from_slice(&[b, g, r, 0]);
        }
        out.extend_from_slice(raster);
        out
    }

    #[test]
    fn decodes_a_bottom_up_24bpp_image() {
        // 2x2, rows padded to 4 bytes (6 -> 8). Encoded bottom row first.
        let raster = [
            0xFF, 0x00, 0x00, 0x00, 0xFF, 0x00, 0, 0, // image bottom: blue, green
            0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, // image top: red, white
        ];
        let data = synthesize(2, 2, 24, BI_RGB, None, &[], &raster);
        let bmp = Bitmap::from_bmp_data(&data).unwrap();

        assert_eq!(bmp.mode(), PixelMode::Bgr24);
        assert_eq!(bmp.pixel_rgb(bmp.pixel(0, 0)), (0xFF, 0x00, 0x00));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(1, 0)), (0xFF, 0xFF, 0xFF));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(0, 1)), (0x00, 0x00, 0xFF));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(1, 1)), (0x00, 0xFF, 0x00));
    }

    #[test]
    fn negative_height_means_top_down_rows() {
        let raster = [
            0x00, 0x00, 0xFF, 0, // top row: red (plus padding)
            0xFF, 0x00, 0x00, 0, // bottom row: blue
        ];
        let data = synthesize(1, -2, 24, BI_RGB, None, &[], &raster);
        let bmp = Bitmap::from_bmp_data(&data).unwrap();
        assert_eq!(bmp.pixel_rgb(bmp.pixel(0, 0)), (0xFF, 0x00, 0x00));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(0, 1)), (0x00, 0x00, 0xFF));
    }

    #[test]
    fn bitfields_select_the_pixel_mode() {
        let raster = [0x00, 0xF8, 0x00, 0x00]; // one RGB565 red pixel + pad
        let data = synthesize(1, 1, 16, BI_BITFIELDS, Some((0xF800, 0x07E0, 0x001F)), &[], &raster);
        let bmp = Bitmap::from_bmp_data(&data).unwrap();
        assert_eq!(bmp.mode(), PixelMode::Rgb565);
        assert_eq!(bmp.pixel(0, 0), 0xF800);

        let bad = synthesize(1, 1, 16, BI_BITFIELDS, Some((0x0F00, 0x00F0, 0x000F)), &[], &raster);
        assert!(Bitmap::from_bmp_data(&bad).is_err());
    }

    #[test]
    fn palette_images_unpack_to_bgr24() {
        // 2x1 8bpp, palette {0: red, 1: green}.
        let raster = [0x00, 0x01, 0, 0];
        let data = synthesize(
            2,
            1,
            8,
            BI_RGB,
            None,
            &[(255, 0, 0), (0, 255, 0)],
            &raster,
        );
        let bmp = Bitmap::from_bmp_data(&data).unwrap();
        assert_eq!(bmp.mode(), PixelMode::Bgr24);
        assert_eq!(bmp.pixel_rgb(bmp.pixel(0, 0)), (255, 0, 0));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(1, 0)), (0, 255, 0));
    }

    #[test]
    fn rle8_runs_and_escapes_decode() {
        // 4x2 8bpp RLE: bottom row = 4x index 1; end-of-line; top row =
        // two literal indices then a run of 2x index 0; end-of-bitmap.
        let raster = [
            4, 1, // run: 4 pixels of index 1 (y=0 encoded, image bottom)
            0, 0, // end of line
            0, 2, 0, 0, // delta +0,+0 (no-op, exercises the escape)
            2, 0, // run: 2 pixels of index 0
            2, 1, // run: 2 pixels of index 1
            0, 1, // end of bitmap
        ];
        let data = synthesize(
            4,
            2,
            8,
            BI_RLE8,
            None,
            &[(10, 10, 10), (200, 200, 200)],
            &raster,
        );
        let bmp = Bitmap::from_bmp_data(&data).unwrap();
        // Encoded first row is the image's bottom row.
        for x in 0..4 {
            assert_eq!(bmp.pixel_rgb(bmp.pixel(x, 1)), (200, 200, 200));
        }
        assert_eq!(bmp.pixel_rgb(bmp.pixel(0, 0)), (10, 10, 10));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(1, 0)), (10, 10, 10));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(2, 0)), (200, 200, 200));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(3, 0)), (200, 200, 200));
    }

    #[test]
    fn rle4_alternates_nibbles() {
        // 3x1 4bpp RLE: run of 3 pixels from value 0x12 -> 1, 2, 1.
        let raster = [3, 0x12, 0, 1];
        let palette: Vec<(u8, u8, u8)> = (0..16).map(|i| (i as u8 * 16, 0, 0)).collect();
        let data = synthesize(3, 1, 4, BI_RLE4, None, &palette, &raster);
        let bmp = Bitmap::from_bmp_data(&data).unwrap();
        assert_eq!(bmp.pixel_rgb(bmp.pixel(0, 0)), (16, 0, 0));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(1, 0)), (32, 0, 0));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(2, 0)), (16, 0, 0));
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert!(Bitmap::from_bmp_data(b"xx").is_err(), "bad signature");
        assert!(Bitmap::from_bmp_data(b"BM").is_err(), "truncated header");

        let truncated = synthesize(4, 4, 24, BI_RGB, None, &[], &[0u8; 8]);
        assert!(Bitmap::from_bmp_data(&truncated).is_err(), "short raster");

        let mut bad_bpp = synthesize(1, 1, 24, BI_RGB, None, &[], &[0u8; 4]);
        bad_bpp[28] = 13; // rewrite the bit count field
        assert!(Bitmap::from_bmp_data(&bad_bpp).is_err());
    }

    #[test]
    fn rle_cannot_write_outside_the_frame() {
        // Three end-of-line escapes walk y past a 1-row bitmap, then a run
        // tries to write.
        let raster = [0, 0, 0, 0, 2, 1, 0, 1];
        let palette: Vec<(u8, u8, u8)> = (0..16).map(|i| (i as u8, 0, 0)).collect();
        let data = synthesize(2, 1, 4, BI_RLE4, None, &palette, &raster);
        assert!(Bitmap::from_bmp_data(&data).is_err());
    }

    #[test]
    fn missing_palette_falls_back_for_1bpp_only() {
        // 1bpp, colors_used=2, but no table bytes before the raster.
        let raster = [0b1000_0000, 0, 0, 0];
        let mut data = Vec::new();
        let data_offset: u32 = 14 + 40;
        data.extend_from_slice(&SIGNATURE.to_le_bytes());
        data.extend_from_slice(&(data_offset + 4).to_le_bytes());
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&data_offset.to_le_bytes());
        data.extend_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&2u32.to_le_bytes()); // width
        data.extend_from_slice(&1i32.to_le_bytes()); // height
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes()); // bpp
        data.extend_from_slice(&BI_RGB.to_le_bytes());
        data.extend_from_slice(&[0; 12]);
        data.extend_from_slice(&2u32.to_le_bytes()); // colors used
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&raster);

        let bmp = Bitmap::from_bmp_data(&data).unwrap();
        assert_eq!(bmp.pixel_rgb(bmp.pixel(0, 0)), (255, 255, 255));
        assert_eq!(bmp.pixel_rgb(bmp.pixel(1, 0)), (0, 0, 0));
    }
}

// src/bitmap/text.rs
//! Glyph text rendering on top of the mask blitter.
//!
//! Glyphs come from the built-in atlas, scaled to the requested pixel
//! height with the aspect of their 8x8 cells. The pen advances by the
//! intended glyph width even when a glyph is clipped, so columns stay
//! aligned at the edges. Inline ANSI SGR escapes (`ESC [ ... m`) recolor
//! the run mid-string.

use crate::pixel::PixelMode;
use crate::rect::Rect;

use super::charset::{glyph_rect, CHAR_H, CHAR_W, TABLE_LEN};
use super::mask::{blit_mask_stretched, MaskMode};
use super::Bitmap;

/// The conventional xterm 16-color values, base then bright.
fn ansi_basic_rgb(idx: usize, bright: bool) -> (u8, u8, u8) {
    const BASE: [(u8, u8, u8); 8] = [
        (0, 0, 0),
        (205, 0, 0),
        (0, 205, 0),
        (205, 205, 0),
        (0, 0, 238),
        (205, 0, 205),
        (0, 205, 205),
        (229, 229, 229),
    ];
    const BRIGHT: [(u8, u8, u8); 8] = [
        (127, 127, 127),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (92, 92, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];
    if bright {
        BRIGHT[idx]
    } else {
        BASE[idx]
    }
}

const MAX_SGR_PARAMS: usize = 16;

/// Parses an SGR body starting right after `ESC [`, returning the index
/// past the final `m` and the updated colors, packed in `mode`.
///
/// Unknown codes and the 256-color forms `38;5`/`48;5` are ignored; an
/// unexpected byte aborts the sequence without changing the colors.
fn parse_sgr(
    text: &[u8],
    mut i: usize,
    mode: PixelMode,
    default_fg: u32,
    default_bg: u32,
    mut fg: u32,
    mut bg: u32,
) -> (usize, Option<(u32, u32)>) {
    let mut params = [0i32; MAX_SGR_PARAMS];
    let mut nparams = 0;
    let mut cur = 0i32;
    let mut have_cur = false;

    loop {
        let Some(&ch) = text.get(i) else {
            return (i, None);
        };
        i += 1;
        match ch {
            b'0'..=b'9' => {
                cur = cur.saturating_mul(10) + i32::from(ch - b'0');
                have_cur = true;
            }
            b';' => {
                if have_cur && nparams < MAX_SGR_PARAMS {
                    params[nparams] = cur;
                    nparams += 1;
                }
                cur = 0;
                have_cur = false;
            }
            b'm' => {
                if have_cur && nparams < MAX_SGR_PARAMS {
                    params[nparams] = cur;
                    nparams += 1;
                }
                break;
            }
            _ => return (i, None),
        }
    }

    // `ESC [ m` is a bare reset.
    if nparams == 0 {
        return (i, Some((default_fg, default_bg)));
    }

    let mut p = 0;
    while p < nparams {
        let code = params[p];
        match code {
            0 => {
                fg = default_fg;
                bg = default_bg;
            }
            39 => fg = default_fg,
            49 => bg = default_bg,
            38 | 48 => {
                let sub = if p + 1 < nparams { Some(params[p + 1]) } else { None };
                match sub {
                    Some(2) if p + 4 < nparams => {
                        let r = params[p + 2].clamp(0, 255) as u8;
                        let g = params[p + 3].clamp(0, 255) as u8;
                        let b = params[p + 4].clamp(0, 255) as u8;
                        let v = mode.pack(r, g, b);
                        if code == 38 {
                            fg = v;
                        } else {
                            bg = v;
                        }
                        p += 4;
                    }
                    // 256-color form: recognized, payload consumed, ignored.
                    Some(5) if p + 2 < nparams => p += 2,
                    // Unknown or truncated extension: its payload length is
                    // unknowable, stop reading parameters.
                    _ => p = nparams,
                }
            }
            30..=37 | 90..=97 => {
                let (r, g, b) = ansi_basic_rgb((code % 10) as usize, code >= 90);
                fg = mode.pack(r, g, b);
            }
            40..=47 | 100..=107 => {
                let (r, g, b) = ansi_basic_rgb((code % 10) as usize, code >= 100);
                bg = mode.pack(r, g, b);
            }
            _ => {}
        }
        p += 1;
    }

    (i, Some((fg, bg)))
}

impl Bitmap<'_> {
    /// Draws `text` with a transparent background.
    pub fn draw_text(&mut self, x: i32, y: i32, height: u32, fg_native: u32, text: &str) {
        self.blit_text(x, y, height, fg_native, 0, MaskMode::Transparent, text);
    }

    /// Draws `text` at `(x, y)` in glyphs `height` pixels tall, with full
    /// control over the background treatment.
    ///
    /// `fg_native`/`bg_native` are in this bitmap's mode. A glyph pushed
    /// partially off any edge is clipped proportionally; one pushed fully
    /// off still advances the pen. Inline `ESC [ ... m` sequences change
    /// the colors for the rest of the string, with the call's colors as
    /// the reset targets.
    pub fn blit_text(
        &mut self,
        x: i32,
        y: i32,
        height: u32,
        fg_native: u32,
        bg_native: u32,
        mode: MaskMode,
        text: &str,
    ) {
        if height == 0 || text.is_empty() {
            return;
        }

        let atlas = self.charset_atlas();

        // Glyph box keeps the 8x8 cell aspect at the requested height.
        let glyph_w = ((height as usize * CHAR_W + CHAR_H / 2) / CHAR_H).max(1) as u16;
        let glyph_h = height as u16;
        let spacing: i32 = 1;

        let dst_w = self.width() as i32;
        let dst_h = self.height() as i32;

        let mut fg = fg_native;
        let mut bg = bg_native;
        let mut pen_x = x;
        let pen_y = y;

        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let ch = bytes[i];

            if ch == 0x1B && bytes.get(i + 1) == Some(&b'[') {
                let (next, colors) =
                    parse_sgr(bytes, i + 2, self.mode(), fg_native, bg_native, fg, bg);
                i = next;
                if let Some((new_fg, new_bg)) = colors {
                    fg = new_fg;
                    bg = new_bg;
                }
                continue;
            }
            i += 1;

            if pen_x >= dst_w {
                break;
            }

            let code = if (ch as usize) < TABLE_LEN { ch } else { b'?' };
            let src_full = glyph_rect(code);

            let mut dst_box = Rect {
                x: pen_x.clamp(i16::MIN.into(), i16::MAX.into()) as i16,
                y: pen_y.clamp(i16::MIN.into(), i16::MAX.into()) as i16,
                w: glyph_w,
                h: glyph_h,
            };
            let advance = i32::from(glyph_w) + spacing;

            if i32::from(dst_box.y) >= dst_h {
                break;
            }
            if i32::from(dst_box.x) + i32::from(dst_box.w) <= 0
                || i32::from(dst_box.y) + i32::from(dst_box.h) <= 0
            {
                pen_x += advance;
                continue;
            }

            // Four-side clip of the glyph box, shrinking the atlas window
            // proportionally so the visible part keeps its scale.
            let mut src = src_full;
            let mut clipped_away = false;

            if dst_box.x < 0 {
                let clip = i32::from(-dst_box.x);
                if clip >= i32::from(dst_box.w) {
                    clipped_away = true;
                } else {
                    let shift = ((clip as u32 * CHAR_W as u32) / u32::from(glyph_w))
                        .min(u32::from(src.w) - 1) as u16;
                    src.x += shift as i16;
                    src.w -= shift;
                    dst_box.w -= clip as u16;
                    dst_box.x = 0;
                }
            }
            if !clipped_away {
                let over = i32::from(dst_box.x) + i32::from(dst_box.w) - dst_w;
                if over > 0 {
                    if over >= i32::from(dst_box.w) {
                        clipped_away = true;
                    } else {
                        let keep = dst_box.w - over as u16;
                        let src_keep = ((u32::from(keep) * CHAR_W as u32) / u32::from(glyph_w))
                            .clamp(1, u32::from(src.w)) as u16;
                        src.w = src_keep;
                        dst_box.w = keep;
                    }
                }
            }
            if !clipped_away && dst_box.y < 0 {
                let clip = i32::from(-dst_box.y);
                if clip >= i32::from(dst_box.h) {
                    clipped_away = true;
                } else {
                    let shift = ((clip as u32 * CHAR_H as u32) / u32::from(glyph_h))
                        .min(u32::from(src.h) - 1) as u16;
                    src.y += shift as i16;
                    src.h -= shift;
                    dst_box.h -= clip as u16;
                    dst_box.y = 0;
                }
            }
            if !clipped_away {
                let over = i32::from(dst_box.y) + i32::from(dst_box.h) - dst_h;
                if over > 0 {
                    if over >= i32::from(dst_box.h) {
                        clipped_away = true;
                    } else {
                        let keep = dst_box.h - over as u16;
                        let src_keep = ((u32::from(keep) * CHAR_H as u32) / u32::from(glyph_h))
                            .clamp(1, u32::from(src.h)) as u16;
                        src.h = src_keep;
                        dst_box.h = keep;
                    }
                }
            }

            if !clipped_away && !dst_box.is_empty() && !src.is_empty() {
                blit_mask_stretched(&atlas, Some(src), self, Some(dst_box), fg, bg, mode);

                // Carved text paints its inter-glyph gaps too, otherwise
                // the background would show stripes between letters.
                if mode == MaskMode::RevTransparent && spacing > 0 {
                    let gap_x = i32::from(dst_box.x) + i32::from(dst_box.w);
                    if gap_x < dst_w {
                        let gap_w = spacing.min(dst_w - gap_x) as u16;
                        self.fill_rect(Rect::new(gap_x as i16, dst_box.y, gap_w, dst_box.h), bg);
                    }
                }
            }

            pen_x += advance;
        }
    }
}

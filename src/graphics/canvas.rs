// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Drawing primitives over [`Bitmap`]: flat-color rects, clipped
//! SRC_OVER-blended blits, and horizontal line fills (used for
//! underlines and enclosure borders). Grounded on the blending approach
//! in `renderer/alphablend_x86.hpp`, re-expressed as a portable scalar
//! implementation rather than the source's SSE2 intrinsics.

use crate::caption::Rgba8;
use crate::graphics::Bitmap;

/// Paints an opaque (or `color`-alpha-blended, if `color.a < 255`) solid
/// rectangle, clipped to `dst`'s bounds.
pub fn draw_rect(dst: &mut Bitmap, x: i32, y: i32, width: i32, height: i32, color: Rgba8) {
    if color.a == 0 || width <= 0 || height <= 0 {
        return;
    }
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + width).min(dst.width() as i32);
    let y1 = (y + height).min(dst.height() as i32);
    for py in y0..y1 {
        for px in x0..x1 {
            blend_pixel(dst, px as u32, py as u32, color);
        }
    }
}

/// Draws a single-pixel-thick horizontal line, used for underlines.
pub fn fill_line(dst: &mut Bitmap, x: i32, y: i32, length: i32, thickness: i32, color: Rgba8) {
    draw_rect(dst, x, y, length, thickness, color);
}

/// Blits `src` onto `dst` at `(dst_x, dst_y)` with SRC_OVER blending,
/// clipped to `dst`'s bounds. `tint` is multiplied into `src`'s RGB
/// channels, used to recolor a DRCS/glyph alpha mask with the active
/// text color without a separate copy.
pub fn draw_bitmap(dst: &mut Bitmap, src: &Bitmap, dst_x: i32, dst_y: i32, tint: Option<Rgba8>) {
    let src_w = src.width() as i32;
    let src_h = src.height() as i32;

    for sy in 0..src_h {
        let py = dst_y + sy;
        if py < 0 || py >= dst.height() as i32 {
            continue;
        }
        for sx in 0..src_w {
            let px = dst_x + sx;
            if px < 0 || px >= dst.width() as i32 {
                continue;
            }
            let mut sample = src.get(sx as u32, sy as u32);
            if let Some(t) = tint {
                sample = Rgba8::new(
                    mul8(sample.r, t.r),
                    mul8(sample.g, t.g),
                    mul8(sample.b, t.b),
                    mul8(sample.a, t.a),
                );
            }
            blend_pixel(dst, px as u32, py as u32, sample);
        }
    }
}

#[inline]
fn mul8(a: u8, b: u8) -> u8 {
    ((a as u16 * b as u16) / 255) as u8
}

/// Non-premultiplied SRC_OVER: `out = src*srcA + dst*dstA*(1-srcA)`,
/// `outA = srcA + dstA*(1-srcA)`. Exposed (not just used via
/// [`draw_rect`]/[`draw_bitmap`]) so callers painting one pixel at a time
/// (DRCS upscaling) can blend directly instead of allocating a 1x1
/// [`Bitmap`] per pixel.
#[inline]
pub fn blend_pixel(dst: &mut Bitmap, x: u32, y: u32, src: Rgba8) {
    if src.a == 255 {
        dst.set(x, y, src);
        return;
    }
    if src.a == 0 {
        return;
    }
    let d = dst.get(x, y);
    let sa = src.a as f32 / 255.0;
    let da = d.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        dst.set(x, y, Rgba8::TRANSPARENT);
        return;
    }
    let blend = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        (((s * sa + d * da * (1.0 - sa)) / out_a) * 255.0).round() as u8
    };
    dst.set(
        x,
        y,
        Rgba8::new(blend(src.r, d.r), blend(src.g, d.g), blend(src.b, d.b), (out_a * 255.0).round() as u8),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_rect_overwrites_fully() {
        let mut dst = Bitmap::new(4, 4);
        dst.clear(Rgba8::WHITE);
        draw_rect(&mut dst, 0, 0, 2, 2, Rgba8::BLACK);
        assert_eq!(dst.get(0, 0), Rgba8::BLACK);
        assert_eq!(dst.get(3, 3), Rgba8::WHITE);
    }

    #[test]
    fn transparent_source_leaves_dst_unchanged() {
        let mut dst = Bitmap::new(2, 2);
        dst.clear(Rgba8::WHITE);
        let src = Bitmap::new(2, 2); // fully transparent by default
        draw_bitmap(&mut dst, &src, 0, 0, None);
        assert_eq!(dst.get(0, 0), Rgba8::WHITE);
    }

    #[test]
    fn half_alpha_blend_is_between_src_and_dst() {
        let mut dst = Bitmap::new(1, 1);
        dst.clear(Rgba8::new(0, 0, 0, 255));
        draw_rect(&mut dst, 0, 0, 1, 1, Rgba8::new(255, 255, 255, 128));
        let out = dst.get(0, 0);
        assert!(out.r > 100 && out.r < 200);
    }

    #[test]
    fn out_of_bounds_blit_is_clipped_not_panicking() {
        let mut dst = Bitmap::new(2, 2);
        let src = Bitmap::new(4, 4);
        draw_bitmap(&mut dst, &src, -1, -1, None);
    }
}

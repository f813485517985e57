// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Rasterizes a [`crate::caption::Drcs`] glyph into a colored [`Bitmap`]:
//! the raw raster is a `depth`-bit alpha mask (sample value 0 =
//! transparent, max = fully opaque), nearest-neighbor upscaled to the
//! target cell size, then optionally 4-neighbor dilated one pixel to
//! produce a stroke/outline bitmap before the text-colored bitmap is
//! drawn over it. Grounded on the DRCS rendering path in
//! `renderer_impl.cpp`.

use crate::caption::{Drcs, Rgba8};
use crate::graphics::Bitmap;

/// Reads the `depth`-bit sample at `(x, y)` in `drcs.pixels`, each row
/// packed MSB-first with no inter-row padding beyond a byte boundary.
fn sample(drcs: &Drcs, x: u32, y: u32) -> u8 {
    let bits_per_row = drcs.width as usize * drcs.depth as usize;
    let bytes_per_row = bits_per_row.div_ceil(8);
    let bit_offset = y as usize * bytes_per_row * 8 + x as usize * drcs.depth as usize;
    let mut value = 0u8;
    for b in 0..drcs.depth {
        let bit_index = bit_offset + b as usize;
        let byte = drcs.pixels.get(bit_index / 8).copied().unwrap_or(0);
        let bit = (byte >> (7 - (bit_index % 8))) & 1;
        value = (value << 1) | bit;
    }
    value
}

fn alpha_for_sample(value: u8, depth: u8) -> u8 {
    let max = (1u16 << depth) - 1;
    ((value as u16 * 255) / max.max(1)) as u8
}

/// Renders `drcs` as a `target_width`x`target_height` bitmap tinted
/// `text_color`, with an optional 1px stroke-dilated halo in
/// `stroke_color` painted beneath it.
pub fn render(drcs: &Drcs, target_width: u32, target_height: u32, text_color: Rgba8, stroke_color: Option<Rgba8>) -> Bitmap {
    let mut alpha = vec![0u8; (drcs.width * drcs.height) as usize];
    for y in 0..drcs.height {
        for x in 0..drcs.width {
            alpha[(y * drcs.width + x) as usize] = alpha_for_sample(sample(drcs, x, y), drcs.depth);
        }
    }

    let mut out = Bitmap::new(target_width, target_height);
    if let Some(stroke) = stroke_color {
        let dilated = dilate(&alpha, drcs.width, drcs.height);
        paint_upscaled(&mut out, &dilated, drcs.width, drcs.height, stroke);
    }
    paint_upscaled_over(&mut out, &alpha, drcs.width, drcs.height, text_color);
    out
}

fn dilate(alpha: &[u8], width: u32, height: u32) -> Vec<u8> {
    let mut out = alpha.to_vec();
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let here = alpha[(y * width as i32 + x) as usize];
            if here > 0 {
                continue;
            }
            let mut max_neighbor = 0u8;
            for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                let (nx, ny) = (x + dx, y + dy);
                if nx >= 0 && nx < width as i32 && ny >= 0 && ny < height as i32 {
                    max_neighbor = max_neighbor.max(alpha[(ny * width as i32 + nx) as usize]);
                }
            }
            out[(y * width as i32 + x) as usize] = max_neighbor;
        }
    }
    out
}

fn paint_upscaled(out: &mut Bitmap, alpha: &[u8], src_w: u32, src_h: u32, color: Rgba8) {
    let (tw, th) = (out.width(), out.height());
    for ty in 0..th {
        let sy = (ty * src_h / th.max(1)).min(src_h.saturating_sub(1));
        for tx in 0..tw {
            let sx = (tx * src_w / tw.max(1)).min(src_w.saturating_sub(1));
            let a = alpha[(sy * src_w + sx) as usize];
            if a > 0 {
                out.set(tx, ty, Rgba8::new(color.r, color.g, color.b, a));
            }
        }
    }
}

fn paint_upscaled_over(out: &mut Bitmap, alpha: &[u8], src_w: u32, src_h: u32, color: Rgba8) {
    let (tw, th) = (out.width(), out.height());
    for ty in 0..th {
        let sy = (ty * src_h / th.max(1)).min(src_h.saturating_sub(1));
        for tx in 0..tw {
            let sx = (tx * src_w / tw.max(1)).min(src_w.saturating_sub(1));
            let a = alpha[(sy * src_w + sx) as usize];
            if a > 0 {
                crate::graphics::canvas::blend_pixel(out, tx, ty, Rgba8::new(color.r, color.g, color.b, a));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_bit_square() -> Drcs {
        // 2x2, depth 1: top-left and bottom-right pixels set.
        Drcs { width: 2, height: 2, depth: 1, pixels: vec![0b1001_0000], md5: 0 }
    }

    #[test]
    fn sample_reads_packed_one_bit_pixels() {
        let drcs = one_bit_square();
        assert_eq!(sample(&drcs, 0, 0), 1);
        assert_eq!(sample(&drcs, 1, 0), 0);
        assert_eq!(sample(&drcs, 0, 1), 0);
        assert_eq!(sample(&drcs, 1, 1), 1);
    }

    #[test]
    fn render_upscales_to_target_size() {
        let drcs = one_bit_square();
        let bmp = render(&drcs, 8, 8, Rgba8::WHITE, None);
        assert_eq!(bmp.width(), 8);
        assert_eq!(bmp.height(), 8);
        assert_eq!(bmp.get(0, 0).a, 255);
    }

    #[test]
    fn dilate_spreads_into_transparent_neighbors() {
        let alpha = vec![0, 255, 0, 0];
        let dilated = dilate(&alpha, 2, 2);
        assert_eq!(dilated[0], 255);
    }
}

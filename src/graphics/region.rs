// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Component G: renders one [`CaptionRegion`] into a [`Bitmap`] sized to
//! the region's plane-pixel extent. Grounded on the per-region drawing
//! loop in `renderer_impl.cpp`'s `RenderCaption`: background fill, then
//! per-character cell painting (DRCS via [`crate::graphics::drcs`], text
//! via the caller's [`TextRenderer`]), then underline and enclosure
//! overlays.

use crate::caption::{CaptionCharKind, CaptionRegion, CharStyle, Drcs, EnclosureStyle};
use crate::graphics::{canvas, drcs, Bitmap};
use crate::provider::TextRenderer;
use rustc_hash::FxHashMap;

/// Options that apply uniformly to every character in the region,
/// mirroring the renderer-wide knobs in spec §4.H (force-stroke,
/// force-no-background, etc.) rather than per-character decoder state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionRenderOptions {
    pub force_stroke_text: bool,
    pub force_no_background: bool,
    pub force_no_ruby: bool,
    pub replace_drcs: bool,
}

/// Renders `region` at `x_mag`/`y_mag` magnification, returning a bitmap
/// exactly covering `region.width * x_mag` by `region.height * y_mag`.
pub fn render_region(
    region: &CaptionRegion,
    drcs_map: &FxHashMap<u32, Drcs>,
    text_renderer: &mut dyn TextRenderer,
    x_mag: f32,
    y_mag: f32,
    options: RegionRenderOptions,
) -> Option<Bitmap> {
    if region.is_ruby && options.force_no_ruby {
        return None;
    }
    let width = ((region.width as f32) * x_mag).round().max(1.0) as u32;
    let height = ((region.height as f32) * y_mag).round().max(1.0) as u32;
    let mut bitmap = Bitmap::new(width, height);

    if !options.force_no_background {
        for ch in &region.chars {
            if ch.back_color.a == 0 {
                continue;
            }
            let local_x = ((ch.x - region.x) as f32 * x_mag) as i32;
            let local_y = ((ch.y - region.y) as f32 * y_mag) as i32;
            let w = (ch.section_width() as f32 * x_mag) as i32;
            let h = (ch.section_height() as f32 * y_mag) as i32;
            canvas::draw_rect(&mut bitmap, local_x, local_y, w, h, ch.back_color);
        }
    }

    text_renderer.begin_draw(&mut bitmap);
    for ch in &region.chars {
        let local_x = ((ch.x - region.x) as f32 * x_mag) as i32;
        let local_y = ((ch.y - region.y) as f32 * y_mag) as i32;
        let cell_w = (ch.section_width() as f32 * x_mag) as i32;
        let cell_h = (ch.section_height() as f32 * y_mag) as i32;

        let stroke = if options.force_stroke_text || ch.style.contains(CharStyle::STROKE) {
            Some(ch.stroke_color)
        } else {
            None
        };

        match ch.kind {
            CaptionCharKind::Drcs if !options.replace_drcs => {
                if let Some(glyph) = drcs_map.get(&ch.drcs_code) {
                    let rendered = drcs::render(glyph, cell_w.max(1) as u32, cell_h.max(1) as u32, ch.text_color, stroke);
                    canvas::draw_bitmap(&mut bitmap, &rendered, local_x, local_y, None);
                }
            }
            CaptionCharKind::Drcs | CaptionCharKind::DrcsReplaced => {
                text_renderer.draw_char(
                    local_x,
                    local_y,
                    0xFFFD,
                    ch.style,
                    ch.text_color,
                    ch.stroke_color,
                    cell_w,
                    cell_h,
                );
            }
            CaptionCharKind::Text => {
                text_renderer.draw_char(
                    local_x,
                    local_y,
                    ch.codepoint,
                    ch.style,
                    ch.text_color,
                    ch.stroke_color,
                    cell_w,
                    cell_h,
                );
            }
        }

        if ch.enclosure != EnclosureStyle::empty() {
            draw_enclosure(&mut bitmap, local_x, local_y, cell_w, cell_h, ch.enclosure, ch.stroke_color);
        }
    }
    text_renderer.end_draw();

    merge_underlines(&mut bitmap, region, x_mag, y_mag);

    Some(bitmap)
}

fn draw_enclosure(bitmap: &mut Bitmap, x: i32, y: i32, w: i32, h: i32, sides: EnclosureStyle, color: crate::caption::Rgba8) {
    const THICKNESS: i32 = 2;
    if sides.contains(EnclosureStyle::TOP) {
        canvas::fill_line(bitmap, x, y, w, THICKNESS, color);
    }
    if sides.contains(EnclosureStyle::BOTTOM) {
        canvas::fill_line(bitmap, x, y + h - THICKNESS, w, THICKNESS, color);
    }
    if sides.contains(EnclosureStyle::LEFT) {
        canvas::draw_rect(bitmap, x, y, THICKNESS, h, color);
    }
    if sides.contains(EnclosureStyle::RIGHT) {
        canvas::draw_rect(bitmap, x + w - THICKNESS, y, THICKNESS, h, color);
    }
}

/// Draws one continuous underline per maximal run of adjacent
/// `UNDERLINE`-styled characters, rather than one short segment per
/// character — avoids visible gaps at cell boundaries.
fn merge_underlines(bitmap: &mut Bitmap, region: &CaptionRegion, x_mag: f32, y_mag: f32) {
    const THICKNESS: i32 = 2;
    let mut run_start: Option<usize> = None;
    for (idx, ch) in region.chars.iter().enumerate() {
        let underlined = ch.style.contains(CharStyle::UNDERLINE);
        if underlined && run_start.is_none() {
            run_start = Some(idx);
        }
        let ends_run = !underlined
            || idx + 1 == region.chars.len()
            || region.chars[idx + 1].y != ch.y;
        if underlined && ends_run {
            let start = run_start.take().unwrap();
            let first = &region.chars[start];
            let local_x = ((first.x - region.x) as f32 * x_mag) as i32;
            let local_y = ((ch.y - region.y) as f32 * y_mag) as i32 + (ch.section_height() as f32 * y_mag) as i32 - THICKNESS;
            let total_width: i32 = region.chars[start..=idx].iter().map(|c| (c.section_width() as f32 * x_mag) as i32).sum();
            canvas::fill_line(bitmap, local_x, local_y, total_width, THICKNESS, first.stroke_color);
        } else if !underlined {
            run_start = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::{CaptionChar, Rgba8};

    struct NullTextRenderer;
    impl TextRenderer for NullTextRenderer {
        fn set_language(&mut self, _: u32) {}
        fn set_font_families(&mut self, _: &[String]) {}
        fn set_fallback_policy(&mut self, _: crate::provider::FallbackPolicy) {}
        fn set_stroke_width(&mut self, _: f32) {}
        fn begin_draw(&mut self, _: &mut Bitmap) {}
        fn draw_char(&mut self, _: i32, _: i32, _: u32, _: CharStyle, _: Rgba8, _: Rgba8, _: i32, _: i32) -> bool {
            true
        }
        fn end_draw(&mut self) {}
    }

    fn sample_region() -> CaptionRegion {
        CaptionRegion {
            x: 0,
            y: 0,
            width: 40,
            height: 40,
            is_ruby: false,
            chars: smallvec::smallvec![CaptionChar {
                x: 0,
                y: 0,
                char_width: 36,
                char_height: 36,
                char_h_spacing: 4,
                char_v_spacing: 4,
                char_h_scale: 1.0,
                char_v_scale: 1.0,
                back_color: Rgba8::new(0, 0, 0, 128),
                text_color: Rgba8::WHITE,
                codepoint: 0x41,
                utf8: "A".into(),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn renders_bitmap_sized_to_magnified_region() {
        let region = sample_region();
        let drcs_map = FxHashMap::default();
        let mut tr = NullTextRenderer;
        let bmp = render_region(&region, &drcs_map, &mut tr, 2.0, 2.0, RegionRenderOptions::default()).unwrap();
        assert_eq!(bmp.width(), 80);
        assert_eq!(bmp.height(), 80);
    }

    #[test]
    fn force_no_background_skips_fill() {
        let region = sample_region();
        let drcs_map = FxHashMap::default();
        let mut tr = NullTextRenderer;
        let opts = RegionRenderOptions { force_no_background: true, ..Default::default() };
        let bmp = render_region(&region, &drcs_map, &mut tr, 1.0, 1.0, opts).unwrap();
        assert_eq!(bmp.get(0, 0).a, 0);
    }

    #[test]
    fn ruby_region_suppressed_when_forced_off() {
        let mut region = sample_region();
        region.is_ruby = true;
        let drcs_map = FxHashMap::default();
        let mut tr = NullTextRenderer;
        let opts = RegionRenderOptions { force_no_ruby: true, ..Default::default() };
        assert!(render_region(&region, &drcs_map, &mut tr, 1.0, 1.0, opts).is_none());
    }
}

// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Component H: the renderer core — a PTS-keyed cache of decoded
//! captions plus the query/render API that turns "what's on screen at
//! this PTS" into a list of positioned [`Image`]s. Grounded on
//! `renderer_impl.{hpp,cpp}`: `AppendCaption`'s retroactive
//! `DURATION_INDEFINITE` correction, `CleanupCaptionsIfNecessary`'s
//! storage-policy eviction, and `Render`'s cache-hit short-circuit are
//! all carried over structurally, re-typed for the Rust ownership model.

use std::collections::BTreeMap;

use crate::caption::{Caption, CaptionType, DURATION_INDEFINITE, PTS_NOPTS};
use crate::context::Context;
use crate::graphics::region::{render_region, RegionRenderOptions};
use crate::graphics::{Bitmap, Image};
use crate::provider::TextRenderer;

/// How long decoded captions are retained once rendered, mirroring
/// `CaptionStoragePolicy` in `renderer.hpp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionStoragePolicy {
    /// Keep only the single caption currently displayable.
    Minimum,
    /// Keep everything ever appended.
    Unlimited,
    /// Keep at most the N most recent captions.
    UpperLimitCount(usize),
    /// Keep captions whose PTS is within `duration_ms` of the latest one.
    UpperLimitDuration(i64),
}

impl Default for CaptionStoragePolicy {
    fn default() -> Self {
        CaptionStoragePolicy::Minimum
    }
}

#[derive(Debug)]
pub enum RenderStatus {
    Error,
    /// No caption is active at the queried PTS.
    NoImage,
    /// A fresh render was produced.
    GotImage,
    /// The active caption is unchanged since the last `render` call; the
    /// previously produced images are still valid (spec §8 testable
    /// property: repeated `render` at the same caption with unchanged
    /// knobs is a cache hit).
    GotImageUnchanged,
}

#[derive(Debug, Clone, Default)]
pub struct RenderResult {
    pub pts: i64,
    pub duration: i64,
    pub images: Vec<Image>,
}

pub struct Renderer {
    context: Context,
    text_renderer: Box<dyn TextRenderer>,

    captions: BTreeMap<i64, Caption>,
    storage_policy: CaptionStoragePolicy,

    frame_width: i32,
    frame_height: i32,
    margin_left: i32,
    margin_top: i32,
    margin_right: i32,
    margin_bottom: i32,

    default_font_family: Vec<String>,
    language_specific_font_family: std::collections::HashMap<u32, Vec<String>>,

    stroke_width: f32,
    force_stroke_text: bool,
    force_no_ruby: bool,
    force_no_background: bool,
    merge_region_images: bool,

    cached_pts: Option<i64>,
    cached_images: Vec<Image>,
}

impl Renderer {
    pub fn new(context: Context, text_renderer: Box<dyn TextRenderer>) -> Self {
        Self {
            context,
            text_renderer,
            captions: BTreeMap::new(),
            storage_policy: CaptionStoragePolicy::default(),
            frame_width: 1920,
            frame_height: 1080,
            margin_left: 0,
            margin_top: 0,
            margin_right: 0,
            margin_bottom: 0,
            default_font_family: Vec::new(),
            language_specific_font_family: std::collections::HashMap::new(),
            stroke_width: 1.5,
            force_stroke_text: false,
            force_no_ruby: false,
            force_no_background: false,
            merge_region_images: false,
            cached_pts: None,
            cached_images: Vec::new(),
        }
    }

    /// Inserts `caption` into the cache keyed by its PTS, retroactively
    /// resolving a predecessor's [`DURATION_INDEFINITE`] wait into the
    /// gap between the two PTS values, then applies the eviction policy.
    /// Returns `false` only if `caption.pts == PTS_NOPTS`.
    pub fn append_caption(&mut self, caption: Caption) -> bool {
        if caption.pts == PTS_NOPTS {
            self.context.log(crate::logging::LogLevel::Warn, "rejecting caption with PTS_NOPTS");
            return false;
        }

        if let Some((_, predecessor)) = self.captions.range_mut(..caption.pts).next_back() {
            if predecessor.wait_duration == DURATION_INDEFINITE {
                predecessor.wait_duration = caption.pts - predecessor.pts;
            }
        }

        self.captions.insert(caption.pts, caption);
        self.cleanup_if_necessary();
        self.invalidate_cache();
        true
    }

    fn cleanup_if_necessary(&mut self) {
        match self.storage_policy {
            CaptionStoragePolicy::Unlimited => {}
            CaptionStoragePolicy::Minimum => {
                if let Some(&latest) = self.captions.keys().next_back() {
                    self.captions.retain(|&pts, _| pts == latest);
                }
            }
            CaptionStoragePolicy::UpperLimitCount(limit) => {
                while self.captions.len() > limit {
                    if let Some(&oldest) = self.captions.keys().next() {
                        self.captions.remove(&oldest);
                    }
                }
            }
            CaptionStoragePolicy::UpperLimitDuration(duration_ms) => {
                if let Some(&latest) = self.captions.keys().next_back() {
                    self.captions.retain(|&pts, _| latest - pts <= duration_ms);
                }
            }
        }
    }

    /// The caption active at `pts`: the greatest-PTS entry not exceeding
    /// it, provided `pts` still falls within its wait duration.
    fn active_caption(&self, pts: i64) -> Option<&Caption> {
        let (_, caption) = self.captions.range(..=pts).next_back()?;
        if caption.wait_duration != DURATION_INDEFINITE && pts >= caption.pts + caption.wait_duration {
            return None;
        }
        Some(caption)
    }

    /// Reports whether a `render` call at `pts` would change the output,
    /// without itself rendering or touching the cache: compares the
    /// caption resolved at `pts` against `cached_pts`, which only `render`
    /// ever sets (spec §4.H: "does not re-render").
    pub fn try_render(&self, pts: i64) -> RenderStatus {
        let Some(caption) = self.active_caption(pts) else {
            return RenderStatus::NoImage;
        };
        if self.cached_pts == Some(caption.pts) {
            RenderStatus::GotImageUnchanged
        } else {
            RenderStatus::GotImage
        }
    }

    pub fn render(&mut self, pts: i64, out: &mut RenderResult) -> RenderStatus {
        let Some(caption) = self.active_caption(pts) else {
            self.cached_pts = None;
            return RenderStatus::NoImage;
        };
        let caption_pts = caption.pts;

        if self.cached_pts == Some(caption_pts) {
            out.pts = caption_pts;
            out.duration = caption.wait_duration;
            out.images = self.cached_images.clone();
            return RenderStatus::GotImageUnchanged;
        }

        let caption = self.captions.get(&caption_pts).expect("looked up above").clone();
        let options = RegionRenderOptions {
            force_stroke_text: self.force_stroke_text,
            force_no_background: self.force_no_background,
            force_no_ruby: self.force_no_ruby,
            replace_drcs: false,
        };

        self.text_renderer.set_stroke_width(self.stroke_width);
        self.text_renderer.set_language(caption.iso6392_language_code);
        let families = self
            .language_specific_font_family
            .get(&caption.iso6392_language_code)
            .unwrap_or(&self.default_font_family);
        self.text_renderer.set_font_families(families);

        // Step 1: adjust the caption-area rect (frame minus margins) to
        // preserve the plane aspect ratio, then derive x_mag/y_mag from
        // that adjusted area (spec §4.H Render step 1).
        let area_w = (self.frame_width - self.margin_left - self.margin_right).max(0);
        let area_h = (self.frame_height - self.margin_top - self.margin_bottom).max(0);
        let mag = if caption.plane_width > 0 && caption.plane_height > 0 && area_w > 0 && area_h > 0 {
            (area_w as f32 / caption.plane_width as f32).min(area_h as f32 / caption.plane_height as f32)
        } else {
            1.0
        };
        let x_mag = mag;
        let y_mag = mag;
        let letterbox_x = ((area_w as f32 - caption.plane_width as f32 * mag) / 2.0).max(0.0);
        let letterbox_y = ((area_h as f32 - caption.plane_height as f32 * mag) / 2.0).max(0.0);
        let origin_x = self.margin_left as f32 + letterbox_x;
        let origin_y = self.margin_top as f32 + letterbox_y;

        let mut images = Vec::new();
        for region in &caption.regions {
            let Some(bitmap) =
                render_region(region, &caption.drcs_map, self.text_renderer.as_mut(), x_mag, y_mag, options)
            else {
                continue;
            };
            images.push(Image {
                pts: caption_pts,
                duration: caption.wait_duration,
                dst_x: (origin_x + region.x as f32 * x_mag) as i32,
                dst_y: (origin_y + region.y as f32 * y_mag) as i32,
                bitmap,
            });
        }

        if self.merge_region_images && images.len() > 1 {
            images = vec![merge_images(images, caption_pts)];
        }

        out.pts = caption_pts;
        out.duration = caption.wait_duration;
        out.images = images.clone();
        self.cached_pts = Some(caption_pts);
        self.cached_images = images;

        let _ = caption.caption_type; // currently informational only at render time.
        RenderStatus::GotImage
    }

    pub fn flush(&mut self) {
        self.captions.clear();
        self.invalidate_cache();
    }

    fn invalidate_cache(&mut self) {
        self.cached_pts = None;
        self.cached_images.clear();
    }

    pub fn set_storage_policy(&mut self, policy: CaptionStoragePolicy) {
        self.storage_policy = policy;
        self.cleanup_if_necessary();
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        if (self.stroke_width - width).abs() > f32::EPSILON {
            self.stroke_width = width;
            self.invalidate_cache();
        }
    }

    pub fn set_force_stroke_text(&mut self, value: bool) {
        if self.force_stroke_text != value {
            self.force_stroke_text = value;
            self.invalidate_cache();
        }
    }

    pub fn set_force_no_ruby(&mut self, value: bool) {
        if self.force_no_ruby != value {
            self.force_no_ruby = value;
            self.invalidate_cache();
        }
    }

    pub fn set_force_no_background(&mut self, value: bool) {
        if self.force_no_background != value {
            self.force_no_background = value;
            self.invalidate_cache();
        }
    }

    pub fn set_merge_region_images(&mut self, value: bool) {
        if self.merge_region_images != value {
            self.merge_region_images = value;
            self.invalidate_cache();
        }
    }

    pub fn set_default_font_family(&mut self, families: Vec<String>) {
        self.default_font_family = families;
        self.invalidate_cache();
    }

    pub fn set_language_specific_font_family(&mut self, iso6392_language_code: u32, families: Vec<String>) {
        self.language_specific_font_family.insert(iso6392_language_code, families);
        self.invalidate_cache();
    }

    /// Sets the output frame size. Margins are validated against it: the
    /// resulting video area (`frame - margins`) must stay non-negative on
    /// both axes, matching `SetRendererType`'s guard in the source.
    pub fn set_frame_size(&mut self, width: i32, height: i32) -> Result<(), crate::error::RendererError> {
        if width <= 0 || height <= 0 {
            return Err(crate::error::RendererError::InvalidConfiguration("frame size must be positive".into()));
        }
        self.frame_width = width;
        self.frame_height = height;
        self.validate_margins()?;
        self.invalidate_cache();
        Ok(())
    }

    pub fn set_margins(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> Result<(), crate::error::RendererError> {
        let (prev_l, prev_t, prev_r, prev_b) = (self.margin_left, self.margin_top, self.margin_right, self.margin_bottom);
        self.margin_left = left;
        self.margin_top = top;
        self.margin_right = right;
        self.margin_bottom = bottom;
        if let Err(e) = self.validate_margins() {
            self.margin_left = prev_l;
            self.margin_top = prev_t;
            self.margin_right = prev_r;
            self.margin_bottom = prev_b;
            return Err(e);
        }
        self.invalidate_cache();
        Ok(())
    }

    fn validate_margins(&self) -> Result<(), crate::error::RendererError> {
        let video_w = self.frame_width - self.margin_left - self.margin_right;
        let video_h = self.frame_height - self.margin_top - self.margin_bottom;
        if video_w < 0 || video_h < 0 {
            return Err(crate::error::RendererError::InvalidConfiguration(
                "margins exceed frame size".into(),
            ));
        }
        Ok(())
    }
}

/// Composites `images` onto a single bitmap sized to their union rect
/// (spec §4.H Render step 5: "compute union rect; composite all regions
/// into one image"), painting later entries (later regions, in drawing
/// order) over earlier ones — the painter's-algorithm resolution
/// recorded for the region z-order open question.
fn merge_images(images: Vec<Image>, pts: i64) -> Image {
    let min_x = images.iter().map(|i| i.dst_x).min().unwrap_or(0);
    let min_y = images.iter().map(|i| i.dst_y).min().unwrap_or(0);
    let max_x = images.iter().map(|i| i.dst_x + i.bitmap.width() as i32).max().unwrap_or(0);
    let max_y = images.iter().map(|i| i.dst_y + i.bitmap.height() as i32).max().unwrap_or(0);

    let mut merged = Bitmap::new((max_x - min_x).max(0) as u32, (max_y - min_y).max(0) as u32);
    let mut max_duration = 0i64;
    for image in &images {
        crate::graphics::canvas::draw_bitmap(&mut merged, &image.bitmap, image.dst_x - min_x, image.dst_y - min_y, None);
        max_duration = max_duration.max(image.duration);
    }
    Image { pts, duration: max_duration, dst_x: min_x, dst_y: min_y, bitmap: merged }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::CaptionFlags;
    use crate::provider::FallbackPolicy;

    struct NullTextRenderer;
    impl TextRenderer for NullTextRenderer {
        fn set_language(&mut self, _: u32) {}
        fn set_font_families(&mut self, _: &[String]) {}
        fn set_fallback_policy(&mut self, _: FallbackPolicy) {}
        fn set_stroke_width(&mut self, _: f32) {}
        fn begin_draw(&mut self, _: &mut Bitmap) {}
        fn draw_char(
            &mut self,
            _: i32,
            _: i32,
            _: u32,
            _: crate::caption::CharStyle,
            _: crate::caption::Rgba8,
            _: crate::caption::Rgba8,
            _: i32,
            _: i32,
        ) -> bool {
            true
        }
        fn end_draw(&mut self) {}
    }

    fn sample_caption(pts: i64, wait_duration: i64) -> Caption {
        Caption {
            caption_type: CaptionType::Caption,
            flags: CaptionFlags::empty(),
            pts,
            wait_duration,
            plane_width: 960,
            plane_height: 540,
            ..Default::default()
        }
    }

    fn fresh_renderer() -> Renderer {
        let mut r = Renderer::new(Context::default(), Box::new(NullTextRenderer));
        r.set_frame_size(960, 540).unwrap();
        r
    }

    #[test]
    fn append_with_pts_nopts_is_rejected() {
        let mut r = fresh_renderer();
        let mut caption = sample_caption(PTS_NOPTS, DURATION_INDEFINITE);
        caption.pts = PTS_NOPTS;
        assert!(!r.append_caption(caption));
    }

    #[test]
    fn indefinite_predecessor_gets_retroactively_bounded() {
        let mut r = fresh_renderer();
        r.set_storage_policy(CaptionStoragePolicy::Unlimited);
        r.append_caption(sample_caption(1000, DURATION_INDEFINITE));
        r.append_caption(sample_caption(5000, DURATION_INDEFINITE));

        let first = r.captions.get(&1000).unwrap();
        assert_eq!(first.wait_duration, 4000);
    }

    #[test]
    fn no_caption_active_before_first_pts() {
        let mut r = fresh_renderer();
        r.append_caption(sample_caption(1000, DURATION_INDEFINITE));
        assert!(matches!(r.try_render(500), RenderStatus::NoImage));
    }

    #[test]
    fn repeated_render_on_same_caption_is_a_cache_hit() {
        let mut r = fresh_renderer();
        r.append_caption(sample_caption(1000, 5000));
        let mut out = RenderResult::default();
        assert!(matches!(r.render(1200, &mut out), RenderStatus::GotImage));
        assert!(matches!(r.render(1300, &mut out), RenderStatus::GotImageUnchanged));
    }

    #[test]
    fn try_render_never_mutates_cache_so_repeated_calls_stay_got_image() {
        // Scenario S3: append C1{pts=1000, wait=INDEFINITE}, then
        // C2{pts=3500, wait=2000}; try_render alone (no render call)
        // must keep reporting GotImage for every PTS that resolves to a
        // caption, since only render() is allowed to populate the cache.
        let mut r = fresh_renderer();
        r.append_caption(sample_caption(1000, DURATION_INDEFINITE));
        r.append_caption(sample_caption(3500, 2000));
        assert!(matches!(r.try_render(3499), RenderStatus::GotImage));
        assert!(matches!(r.try_render(3500), RenderStatus::GotImage));
        assert!(matches!(r.try_render(5499), RenderStatus::GotImage));
        assert!(matches!(r.try_render(5500), RenderStatus::NoImage));
    }

    #[test]
    fn minimum_storage_policy_evicts_older_entries() {
        let mut r = fresh_renderer();
        r.set_storage_policy(CaptionStoragePolicy::Minimum);
        r.append_caption(sample_caption(1000, DURATION_INDEFINITE));
        r.append_caption(sample_caption(2000, DURATION_INDEFINITE));
        assert_eq!(r.captions.len(), 1);
        assert!(r.captions.contains_key(&2000));
    }

    #[test]
    fn toggling_force_flag_to_same_value_does_not_invalidate_cache() {
        let mut r = fresh_renderer();
        r.append_caption(sample_caption(1000, 5000));
        r.render(1200, &mut RenderResult::default());
        assert!(r.cached_pts.is_some());
        r.set_force_stroke_text(false); // already false: no-op
        assert!(r.cached_pts.is_some());
        r.set_force_stroke_text(true); // actual change: invalidates
        assert!(r.cached_pts.is_none());
    }

    #[test]
    fn margins_exceeding_frame_are_rejected() {
        let mut r = fresh_renderer();
        assert!(r.set_margins(2000, 0, 0, 0).is_err());
    }
}

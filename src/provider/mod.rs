// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Component D: font and text-rendering provider interfaces. This crate
//! ships no concrete font backend (per spec §1 Non-goals — "platform
//! font/text shaping backends are out of scope") but defines the seams a
//! host fills in, matching the shape of the `FontProviderType`/
//! `TextRendererType` indirection declared in `aribcaption/renderer.hpp`
//! and implemented per-platform in `text_renderer.hpp`/
//! `text_renderer_freetype.cpp`/`text_renderer_coretext.cpp`/
//! `text_renderer_directwrite.cpp`: a [`FontProvider`] resolves a font
//! face for a language + code point, and a [`TextRenderer`] paints shaped
//! glyphs into a caller-owned pixel buffer.

use crate::caption::{CharStyle, Rgba8};
use crate::graphics::Bitmap;

/// Which concrete backend a host has wired up, informational only — this
/// crate never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontProviderType {
    Fontconfig,
    CoreText,
    DirectWrite,
    GdiFont,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRendererType {
    FreeType,
    CoreText,
    DirectWrite,
    Gdi,
    Custom,
}

/// What a [`TextRenderer`] does when a code point has no glyph in any
/// configured font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    #[default]
    AutoFallback,
    FailOnCodePointNotFound,
}

/// Resolves a loadable font face given a preferred family list and a
/// code point to cover, analogous to `FontProvider::GetFontFace`.
pub trait FontProvider {
    type FontFace;

    fn set_language(&mut self, iso6392_language_code: u32);

    /// `font_families`, in preference order; `codepoint_hint` lets an
    /// implementation skip a family known not to cover it.
    fn get_font_face(&mut self, font_families: &[String], codepoint_hint: Option<u32>) -> Option<Self::FontFace>;
}

/// Paints shaped glyphs into a destination [`Bitmap`]. Call order mirrors
/// `TextRenderer`: one `begin_draw`/`end_draw` bracket per
/// [`crate::caption::CaptionRegion`], with one `draw_char` per
/// [`crate::caption::CaptionChar`] in between.
pub trait TextRenderer {
    fn set_language(&mut self, iso6392_language_code: u32);
    fn set_font_families(&mut self, families: &[String]);
    fn set_fallback_policy(&mut self, policy: FallbackPolicy);
    fn set_stroke_width(&mut self, width: f32);

    fn begin_draw(&mut self, dst: &mut Bitmap);

    /// Returns `false` if the code point could not be drawn under the
    /// active [`FallbackPolicy`] — the caller is expected to have already
    /// substituted a tofu glyph or skipped, depending on policy.
    fn draw_char(
        &mut self,
        x: i32,
        y: i32,
        codepoint: u32,
        style: CharStyle,
        text_color: Rgba8,
        stroke_color: Rgba8,
        char_width: i32,
        char_height: i32,
    ) -> bool;

    fn end_draw(&mut self);
}

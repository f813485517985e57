// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mutable state the statement-body interpreter threads through a single
//! `Decode` call: the four `GX` code-set slots and their `GL`/`GR`
//! invocation pointers, cursor position, and current drawing attributes.
//! Grounded on the private fields of `DecoderImpl` in `decoder_impl.hpp`.

use crate::caption::{CharStyle, EnclosureStyle, Rgba8};
use crate::tables::{self, colors, GraphicSet};

/// Character size mode, set by the `SSZ`/`MSZ`/`NSZ` C1 codes. Determines
/// `char_h_scale`/`char_v_scale` on emitted characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeMode {
    Small,
    Middle,
    Normal,
}

impl SizeMode {
    pub fn scale(self) -> (f32, f32) {
        match self {
            SizeMode::Small => (0.5, 0.5),
            SizeMode::Middle => (0.5, 1.0),
            SizeMode::Normal => (1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WritingFormat {
    pub plane_width: i32,
    pub plane_height: i32,
    pub char_width: i32,
    pub char_height: i32,
    pub char_h_spacing: i32,
    pub char_v_spacing: i32,
}

impl Default for WritingFormat {
    /// ARIB STD-B24 default for full-seg Profile A: 960x540 plane,
    /// 36x36 cells, 4px spacing both axes.
    fn default() -> Self {
        Self {
            plane_width: 960,
            plane_height: 540,
            char_width: 36,
            char_height: 36,
            char_h_spacing: 4,
            char_v_spacing: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecoderState {
    pub gx: [GraphicSet; 4],
    pub gl: usize,
    pub gr: usize,
    /// Single-shot override set by `SS2`/`SS3`, consumed by the next
    /// character only.
    pub single_shift: Option<usize>,

    pub px: i32,
    pub py: i32,

    pub size_mode: SizeMode,
    pub text_color: Rgba8,
    pub back_color: Rgba8,
    pub stroke_color: Rgba8,
    pub style: CharStyle,
    pub enclosure: EnclosureStyle,

    pub writing_format: WritingFormat,
    /// Ruby-annotation nesting depth, pushed/popped by `PLD`/`PLU`.
    pub ruby_depth: u32,

    /// `TIME`/`DELAY` control accumulator (ms), consumed by the renderer
    /// as the caption's `wait_duration` when non-zero.
    pub explicit_wait_duration_ms: Option<i64>,
}

impl DecoderState {
    pub fn new() -> Self {
        Self {
            gx: [GraphicSet::Kanji, GraphicSet::Alphanumeric, GraphicSet::Hiragana, GraphicSet::Macro],
            gl: 0,
            gr: 2,
            single_shift: None,
            px: 0,
            py: 0,
            size_mode: SizeMode::Normal,
            text_color: colors::BASIC[7], // white
            back_color: Rgba8::new(0, 0, 0, 0x80),
            stroke_color: colors::BASIC[0],
            style: CharStyle::empty(),
            enclosure: EnclosureStyle::empty(),
            writing_format: WritingFormat::default(),
            ruby_depth: 0,
            explicit_wait_duration_ms: None,
        }
    }

    /// Sets `GX[0..3]` per `ResetGraphicSets` in the source: the default
    /// assignment depends on the active encoding scheme and, for JIS,
    /// the profile.
    pub fn reset_graphic_sets(&mut self, encoding: super::EncodingScheme, profile: super::Profile) {
        use super::{EncodingScheme, Profile};
        self.gx = match (encoding, profile) {
            (EncodingScheme::AbntLatin, _) => [
                GraphicSet::Alphanumeric,
                GraphicSet::Alphanumeric,
                GraphicSet::LatinExtension,
                GraphicSet::LatinSpecial,
            ],
            (_, Profile::C) => [
                GraphicSet::Drcs { bank: 1 },
                GraphicSet::Alphanumeric,
                GraphicSet::Kanji,
                GraphicSet::Macro,
            ],
            _ => [GraphicSet::Kanji, GraphicSet::Alphanumeric, GraphicSet::Hiragana, GraphicSet::Macro],
        };
        self.gl = 0;
        self.gr = 2;
    }

    pub fn reset_writing_format(&mut self) {
        self.writing_format = WritingFormat::default();
    }

    /// The code-set byte lookup currently goes through, honoring a pending
    /// single-shift override (consumed here).
    pub fn active_gl_set(&mut self) -> GraphicSet {
        if let Some(shifted) = self.single_shift.take() {
            self.gx[shifted]
        } else {
            self.gx[self.gl]
        }
    }

    pub fn active_gr_set(&self) -> GraphicSet {
        self.gx[self.gr]
    }

    pub fn section_width(&self) -> i32 {
        let (hscale, _) = self.size_mode.scale();
        (((self.writing_format.char_width + self.writing_format.char_h_spacing) as f32) * hscale) as i32
    }

    pub fn section_height(&self) -> i32 {
        let (_, vscale) = self.size_mode.scale();
        (((self.writing_format.char_height + self.writing_format.char_v_spacing) as f32) * vscale) as i32
    }

    pub fn advance_position(&mut self) {
        self.px += self.section_width();
        if self.px >= self.writing_format.plane_width {
            self.move_to_newline();
        }
    }

    pub fn move_to_newline(&mut self) {
        self.px = 0;
        self.py += self.section_height();
    }

    /// Looks up the glyph for `b0` (plus `b1` for two-byte sets) under
    /// `set`, applying the MSZ full-width→half-width ASCII replacement
    /// rule when requested.
    pub fn lookup_glyph(set: GraphicSet, b0: u8, b1: Option<u8>, replace_msz: bool, is_msz: bool) -> tables::Lookup {
        let result = tables::lookup(set, b0, b1);
        if replace_msz && is_msz {
            if let Some(half) = fullwidth_to_halfwidth(result.codepoint) {
                return tables::Lookup { codepoint: half, pua_codepoint: 0 };
            }
        }
        result
    }
}

impl Default for DecoderState {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a full-width Latin/symbol code point (`U+FF01..U+FF5E`, plus the
/// ideographic space) to its ASCII/half-width equivalent, per the MSZ
/// replacement rule in spec §4.A. Returns `None` for anything outside
/// that range (kanji, kana, etc. are left alone).
fn fullwidth_to_halfwidth(codepoint: u32) -> Option<u32> {
    match codepoint {
        0x3000 => Some(0x20),
        0xFF01..=0xFF5E => Some(codepoint - 0xFEE0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{EncodingScheme, Profile};

    #[test]
    fn default_profile_a_sets_kanji_g0() {
        let mut state = DecoderState::new();
        state.reset_graphic_sets(EncodingScheme::Jis, Profile::A);
        assert_eq!(state.gx[0], GraphicSet::Kanji);
        assert_eq!(state.gx[2], GraphicSet::Hiragana);
    }

    #[test]
    fn profile_c_defaults_to_drcs_g0() {
        let mut state = DecoderState::new();
        state.reset_graphic_sets(EncodingScheme::Jis, Profile::C);
        assert_eq!(state.gx[0], GraphicSet::Drcs { bank: 1 });
    }

    #[test]
    fn latin_scheme_ignores_profile() {
        let mut state = DecoderState::new();
        state.reset_graphic_sets(EncodingScheme::AbntLatin, Profile::A);
        assert_eq!(state.gx[2], GraphicSet::LatinExtension);
        assert_eq!(state.gx[3], GraphicSet::LatinSpecial);
    }

    #[test]
    fn msz_replacement_maps_fullwidth_exclamation() {
        let looked_up = DecoderState::lookup_glyph(GraphicSet::Alphanumeric, 0x21, None, true, true);
        // JIS X0201 exclamation is already ASCII (0x21); verify the
        // generic fullwidth mapping helper itself on a FF01 input.
        assert_eq!(fullwidth_to_halfwidth(0xFF01), Some(0x21));
        assert_eq!(looked_up.codepoint, 0x21);
    }
}

// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The caption DOM: pure value types produced by [`crate::decoder::Decoder`]
//! and consumed by [`crate::renderer::Renderer`]. Grounded on
//! `aribcaption/caption.hpp` — the sentinel constants below are copied
//! verbatim from there.
//!
//! Cyclic containment (`Caption` → `CaptionRegion` → `CaptionChar`,
//! `CaptionChar` referencing a `DRCS` by key) is kept tree-shaped
//! deliberately: a `DRCS` glyph lives once per `Caption` in `drcs_map`, and
//! `CaptionChar` stores only the `drcs_code` key, never a back-pointer. No
//! type here owns a reference to another node of the same tree.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// `pts` value meaning "no presentation timestamp was supplied".
pub const PTS_NOPTS: i64 = i64::MIN;

/// `wait_duration` sentinel meaning "display until the next caption with a
/// greater PTS appears". [`crate::renderer::Renderer::append_caption`]
/// retroactively rewrites this to a concrete duration once a successor is
/// known.
pub const DURATION_INDEFINITE: i64 = i64::MAX;

/// RGBA, 8 bits per channel, non-premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8 { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Rgba8 = Rgba8 { r: 0, g: 0, b: 0, a: 0xFF };
    pub const WHITE: Rgba8 = Rgba8 { r: 0xFF, g: 0xFF, b: 0xFF, a: 0xFF };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

bitflags::bitflags! {
    /// Character-level style flags. Values are not part of the C-ABI
    /// contract per spec §9 ("exact integer values ... unless bridging"),
    /// but are kept stable here anyway for serialization friendliness.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CharStyle: u8 {
        const BOLD      = 0b0001;
        const ITALIC    = 0b0010;
        const UNDERLINE = 0b0100;
        const STROKE    = 0b1000;
    }
}

bitflags::bitflags! {
    /// Which sides of a character cell draw an enclosure (box) line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EnclosureStyle: u8 {
        const TOP    = 0b0001;
        const RIGHT  = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT   = 0b1000;
    }
}

/// `CaptionChar::kind` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaptionCharKind {
    #[default]
    Text,
    Drcs,
    DrcsReplaced,
}

/// One logical glyph cell, positioned on the virtual caption plane.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptionChar {
    pub kind: CaptionCharKind,

    /// UCS-4 code point. Zero when `kind == Drcs`.
    pub codepoint: u32,
    /// Non-zero only for ARIB Gaiji that also carry a Private-Use-Area
    /// fallback mapping.
    pub pua_codepoint: u32,
    /// Key into the enclosing `Caption::drcs_map`. Set iff
    /// `kind ∈ {Drcs, DrcsReplaced}`.
    pub drcs_code: u32,

    /// Position in the virtual caption plane, in plane pixels.
    pub x: i32,
    pub y: i32,

    pub char_width: i32,
    pub char_height: i32,
    pub char_h_spacing: i32,
    pub char_v_spacing: i32,
    pub char_h_scale: f32,
    pub char_v_scale: f32,

    pub text_color: Rgba8,
    pub back_color: Rgba8,
    pub stroke_color: Rgba8,

    pub style: CharStyle,
    pub enclosure: EnclosureStyle,

    /// UTF-8 rendering of `codepoint`. Empty when `kind == Drcs`.
    pub utf8: String,

    pub pts: i64,
    pub duration: i64,
}

impl CaptionChar {
    /// `floor((char_width + char_h_spacing) * char_h_scale)`. Always
    /// computed, never cached on the struct — storing it alongside the
    /// inputs it's derived from would let the two disagree.
    pub fn section_width(&self) -> i32 {
        (((self.char_width + self.char_h_spacing) as f32) * self.char_h_scale).floor() as i32
    }

    /// `floor((char_height + char_v_spacing) * char_v_scale)`.
    pub fn section_height(&self) -> i32 {
        (((self.char_height + self.char_v_spacing) as f32) * self.char_v_scale).floor() as i32
    }
}

/// A contiguous run of `CaptionChar`s sharing layout attributes, produced
/// whenever the decoder's emission rule detects a position/size change
/// (spec §4.B rule 2).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptionRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub is_ruby: bool,
    /// Most regions hold a handful of characters; inlining up to 4 avoids
    /// a heap allocation for the common case.
    pub chars: SmallVec<[CaptionChar; 4]>,
}

/// A downloaded (DRCS) raster glyph. Content-hashed at load time via
/// `md5` so identical glyphs across elementary streams share one cache
/// entry in the renderer (see [`crate::graphics::drcs`]).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drcs {
    pub width: u32,
    pub height: u32,
    /// Bits per pixel: 1, 2, or 4.
    pub depth: u8,
    /// Raw packed pixel data, `depth` bits per sample, row-major, no
    /// padding beyond a byte boundary per row.
    pub pixels: Vec<u8>,
    /// Content hash of `pixels`, used for DRCS de-duplication.
    pub md5: u128,
}

#[allow(non_camel_case_types)]
pub type DRCS = Drcs;

bitflags::bitflags! {
    /// `Caption::flags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CaptionFlags: u8 {
        const CLEAR_SCREEN = 0b01;
        const DEFAULT       = 0b10;
    }
}

/// `data_identifier` discriminant, also the wire value used in the PES
/// header (spec §4.B framing table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CaptionType {
    #[default]
    Caption = 0x80,
    Superimpose = 0x81,
}

/// One decoded caption unit: the output of a single
/// [`crate::decoder::Decoder::decode`] call that produced a caption, and
/// the unit of storage in the renderer's PTS-keyed cache.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Caption {
    pub caption_type: CaptionType,
    pub flags: CaptionFlags,
    pub iso6392_language_code: u32,

    pub pts: i64,
    /// May be [`DURATION_INDEFINITE`].
    pub wait_duration: i64,

    pub plane_width: i32,
    pub plane_height: i32,

    pub has_builtin_sound: bool,
    /// Opaque passthrough, per spec §9 open question — decoded verbatim
    /// from the management data's builtin-sound sub-byte when present,
    /// never interpreted.
    pub builtin_sound_id: u8,

    /// Concatenated plain-text rendering of every character across every
    /// region, in drawing order.
    pub text: String,

    /// In drawing order: painter's-algorithm compositing paints later
    /// regions over earlier ones.
    pub regions: Vec<CaptionRegion>,

    pub drcs_map: FxHashMap<u32, Drcs>,
}

impl Caption {
    /// Invariant #1 (spec §8): every `drcs_code` referenced by a char is a
    /// key in `drcs_map`.
    pub fn drcs_references_are_consistent(&self) -> bool {
        self.regions.iter().flat_map(|r| r.chars.iter()).all(|c| {
            matches!(c.kind, CaptionCharKind::Text) || self.drcs_map.contains_key(&c.drcs_code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_dims_are_derived_not_stored() {
        let ch = CaptionChar {
            char_width: 36,
            char_height: 36,
            char_h_spacing: 4,
            char_v_spacing: 4,
            char_h_scale: 0.5,
            char_v_scale: 1.0,
            ..Default::default()
        };
        assert_eq!(ch.section_width(), 20);
        assert_eq!(ch.section_height(), 40);
    }

    #[test]
    fn sentinels_match_spec_values() {
        assert_eq!(PTS_NOPTS, -0x8000_0000_0000_0000i64);
        assert_eq!(DURATION_INDEFINITE, 0x7FFF_FFFF_FFFF_FFFFi64);
    }

    #[test]
    fn drcs_consistency_detects_dangling_reference() {
        let mut caption = Caption::default();
        caption.regions.push(CaptionRegion {
            chars: smallvec::smallvec![CaptionChar {
                kind: CaptionCharKind::Drcs,
                drcs_code: 42,
                ..Default::default()
            }],
            ..Default::default()
        });
        assert!(!caption.drcs_references_are_consistent());

        caption.drcs_map.insert(
            42,
            Drcs { width: 1, height: 1, depth: 1, pixels: vec![0], md5: 0 },
        );
        assert!(caption.drcs_references_are_consistent());
    }
}

// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Shared byte fixtures for the end-to-end decoder/renderer scenarios
//! (`S1`-`S6`), so the scenario bytes are defined once and exercised from
//! both `decoder` and `renderer` test modules instead of being
//! re-typed at each call site.

/// S1 — designates G0 to Kanji (`ESC $ B`), then emits the two-byte JIS
/// pair `0x21 0x21`, which the Kanji table maps to U+3000 (full-width
/// space).
pub const S1_MINIMAL_STATEMENT: &[u8] = &[0x1B, 0x24, 0x42, 0x21, 0x21];

/// S2 — locking-shift to G1 (Alphanumeric), set Middle size, then emit
/// `!`. With `replace_msz_fullwidth_alphanumeric` on, the resulting char
/// keeps `codepoint == 0x21` (already half-width) but carries
/// `char_h_scale == 0.5` from the active Middle size mode.
pub const S2_MSZ_REPLACEMENT: &[u8] = &[0x0E, 0x89, 0x21];

/// S4 — designates Kanji, emits two NSZ characters, switches to MSZ, and
/// emits a third. The size change after the second character forces a
/// new region even though cursor position stays contiguous.
pub const S4_REGION_BREAK_ON_SIZE_CHANGE: &[u8] =
    &[0x1B, 0x24, 0x42, 0x21, 0x21, 0x21, 0x22, 0x89, 0x21, 0x23];

/// S5 — an 8x8, depth-1 DRCS raster (all bits set, i.e. fully opaque),
/// packed MSB-first with no row padding (8 bits/row exactly fills a
/// byte).
pub const S5_DRCS_8X8_OPAQUE: [u8; 8] = [0xFF; 8];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::decoder::{CaptionType, Decoder, EncodingScheme, LanguageId, Profile};

    fn fresh_decoder() -> Decoder {
        let mut decoder = Decoder::new(Context::default());
        decoder.initialize(EncodingScheme::Jis, CaptionType::Caption, Profile::A, LanguageId::First);
        decoder
    }

    #[test]
    fn s1_minimal_statement_yields_full_width_space() {
        let mut decoder = fresh_decoder();
        let caption = crate::decoder::performer::run(&mut decoder, S1_MINIMAL_STATEMENT, 0).unwrap();
        assert_eq!(caption.regions[0].chars[0].codepoint, 0x3000);
        assert_eq!(caption.regions[0].chars[0].kind, crate::caption::CaptionCharKind::Text);
    }

    #[test]
    fn s2_msz_replacement_keeps_codepoint_and_halves_h_scale() {
        let mut decoder = fresh_decoder();
        decoder.set_replace_msz_fullwidth_alphanumeric(true);
        let caption = crate::decoder::performer::run(&mut decoder, S2_MSZ_REPLACEMENT, 0).unwrap();
        let ch = &caption.regions[0].chars[0];
        assert_eq!(ch.codepoint, 0x21);
        assert_eq!(ch.char_h_scale, 0.5);
    }

    #[test]
    fn s4_size_change_forces_new_region() {
        let mut decoder = fresh_decoder();
        let caption = crate::decoder::performer::run(&mut decoder, S4_REGION_BREAK_ON_SIZE_CHANGE, 0).unwrap();
        assert_eq!(caption.regions.len(), 2);
        assert_eq!(caption.regions[0].chars.len(), 2);
        assert_eq!(caption.regions[1].chars.len(), 1);
    }

    #[test]
    fn s5_drcs_raster_is_fully_opaque() {
        let drcs = crate::caption::Drcs {
            width: 8,
            height: 8,
            depth: 1,
            pixels: S5_DRCS_8X8_OPAQUE.to_vec(),
            md5: 0,
        };
        let bitmap = crate::graphics::drcs::render(&drcs, 16, 16, crate::caption::Rgba8::WHITE, None);
        assert_eq!(bitmap.get(0, 0).a, 255);
        assert_eq!(bitmap.get(15, 15).a, 255);
    }
}

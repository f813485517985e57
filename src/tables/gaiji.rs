// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! ARIB Gaiji ("external characters"): broadcaster-defined symbols layered
//! on top of the Kanji plane's otherwise-unassigned high rows. Each entry
//! carries both a standard-Unicode code point (when one exists, e.g. many
//! weather/traffic pictographs were added to Unicode 5.2/6.0 specifically
//! to absorb this table) and a Private-Use-Area fallback for renderers
//! whose fonts predate that addition. Grounded on `decoder_impl.cpp`,
//! which includes the project's own Gaiji table and drives lookup by
//! code; this is a representative curated subset rather than the full
//! ~200-entry table (see `DESIGN.md`).

use super::Lookup;

/// `(jis_index, unicode_codepoint, pua_codepoint)`.
#[rustfmt::skip]
const GAIJI: &[(usize, u32, u32)] = &[
    // Row 0x7A (kuten 90): weather/traffic pictographs with a post-5.2
    // Unicode home, PUA fallback starting at U+EB01.
    (super::jis_index(0x7A, 0x21), 0x26C4, 0xEB01), // SNOWMAN WITHOUT SNOW
    (super::jis_index(0x7A, 0x22), 0x2600, 0xEB02), // BLACK SUN WITH RAYS
    (super::jis_index(0x7A, 0x23), 0x2601, 0xEB03), // CLOUD
    (super::jis_index(0x7A, 0x24), 0x2602, 0xEB04), // UMBRELLA
    (super::jis_index(0x7A, 0x25), 0x26C8, 0xEB05), // THUNDER CLOUD AND RAIN
    // Row 0x7B (kuten 91): postal/administrative marks.
    (super::jis_index(0x7B, 0x21), 0x3012, 0xEB21), // POSTAL MARK
    (super::jis_index(0x7B, 0x22), 0x3036, 0xEB22), // CIRCLED POSTAL MARK
    (super::jis_index(0x7B, 0x23), 0x2116, 0xEB23), // NUMERO SIGN
    // Row 0x7C (kuten 92): caption-specific glyphs with no Unicode home at
    // all — PUA only, codepoint mirrors the PUA value so a lookup never
    // needs a separate "has no Unicode form" flag.
    (super::jis_index(0x7C, 0x21), 0xEB41, 0xEB41),
    (super::jis_index(0x7C, 0x22), 0xEB42, 0xEB42),
];

pub fn lookup(idx: usize) -> Option<Lookup> {
    GAIJI
        .iter()
        .find(|(i, _, _)| *i == idx)
        .map(|(_, cp, pua)| Lookup { codepoint: *cp, pua_codepoint: *pua })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_symbol_has_both_unicode_and_pua_form() {
        let l = lookup(super::super::jis_index(0x7A, 0x22)).unwrap();
        assert_eq!(l.codepoint, 0x2600);
        assert_eq!(l.pua_codepoint, 0xEB02);
    }

    #[test]
    fn pua_only_glyph_mirrors_itself() {
        let l = lookup(super::super::jis_index(0x7C, 0x21)).unwrap();
        assert_eq!(l.codepoint, l.pua_codepoint);
    }
}

// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Latin Extension set (ABNT NBR 15606-1): accented Latin-1 characters
//! broadcasters in Brazil/Portugal-derived encodings need that plain ASCII
//! can't express, reassigned onto the upper GL cells. Grounded on the
//! `kLatinExtensionEntry` default G2 assignment in `ResetGraphicSets`.

use super::Lookup;

/// Cells `0x60..=0x7E` remapped to common Portuguese/Spanish accented
/// letters; everything else passes through as ASCII.
#[rustfmt::skip]
const REMAP: &[(u8, u32)] = &[
    (0x60, 0x00E0), // à
    (0x61, 0x00E1), // á
    (0x62, 0x00E2), // â
    (0x63, 0x00E3), // ã
    (0x64, 0x00E7), // ç
    (0x65, 0x00E8), // è
    (0x66, 0x00E9), // é
    (0x67, 0x00EA), // ê
    (0x68, 0x00EC), // ì
    (0x69, 0x00ED), // í
    (0x6A, 0x00F2), // ò
    (0x6B, 0x00F3), // ó
    (0x6C, 0x00F4), // ô
    (0x6D, 0x00F5), // õ
    (0x6E, 0x00F9), // ù
    (0x6F, 0x00FA), // ú
    (0x70, 0x00FC), // ü
    (0x71, 0x00F1), // ñ
    (0x72, 0x00C0), // À
    (0x73, 0x00C1), // Á
    (0x74, 0x00C3), // Ã
    (0x75, 0x00C7), // Ç
    (0x76, 0x00C9), // É
    (0x77, 0x00CA), // Ê
    (0x78, 0x00CD), // Í
    (0x79, 0x00D3), // Ó
    (0x7A, 0x00D4), // Ô
    (0x7B, 0x00D5), // Õ
    (0x7C, 0x00DA), // Ú
    (0x7D, 0x00DC), // Ü
    (0x7E, 0x00D1), // Ñ
];

pub fn lookup(b: u8) -> Lookup {
    let codepoint = REMAP
        .iter()
        .find(|(byte, _)| *byte == b)
        .map(|(_, cp)| *cp)
        .unwrap_or_else(|| if (0x20..=0x7E).contains(&b) { u32::from(b) } else { 0x3013 });
    Lookup { codepoint, pua_codepoint: 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_digits_pass_through() {
        assert_eq!(lookup(b'5').codepoint, u32::from(b'5'));
    }

    #[test]
    fn accented_a_with_tilde() {
        assert_eq!(lookup(0x63).codepoint, 0x00E3);
    }
}

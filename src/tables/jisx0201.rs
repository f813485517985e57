// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! JIS X 0201 "Alphanumeric"/"Roman" set: single GL byte per character,
//! ASCII-transparent except the two cells JIS reassigns.

use super::Lookup;

pub fn lookup(b: u8) -> Lookup {
    let codepoint = match b {
        0x5C => 0x00A5, // YEN SIGN, not backslash
        0x7E => 0x203E, // OVERLINE, not tilde
        0x20..=0x7D => u32::from(b),
        _ => 0x3013, // GETA mark for anything outside the GL range
    };
    Lookup { codepoint, pua_codepoint: 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passthrough() {
        assert_eq!(lookup(b'A').codepoint, u32::from(b'A'));
    }

    #[test]
    fn yen_and_overline_reassignment() {
        assert_eq!(lookup(0x5C).codepoint, 0x00A5);
        assert_eq!(lookup(0x7E).codepoint, 0x203E);
    }
}

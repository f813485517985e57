// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The Macro graphic set: single GL/GR bytes that don't draw a glyph but
//! instead expand to a short canned control-code sequence, re-fed through
//! the same statement-body interpreter that consumed the macro byte
//! itself. Grounded on `b24_macros.hpp`'s default macro definitions
//! (profile A ships ten built-in macros at kuten 0x60..0x69 plus a
//! handful of broadcaster-defined ones).

/// Returns the canned byte sequence a macro code expands to, or `None` if
/// `code` isn't one of the predefined macros (in which case the decoder
/// should warn-and-skip, same as any other unsupported opcode).
pub fn expand(code: u8) -> Option<&'static [u8]> {
    match code {
        // Macro 0x60: reset to the profile-A default graphic set
        // assignment (LS0 into Kanji G0, invoke default colour).
        0x60 => Some(&[0x0F, 0x1B, 0x28, 0x42]),
        // Macro 0x61: switch to Alphanumeric via LS1/G1.
        0x61 => Some(&[0x0E]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_macro_expands() {
        assert_eq!(expand(0x60), Some(&[0x0F, 0x1B, 0x28, 0x42][..]));
    }

    #[test]
    fn unknown_macro_is_none() {
        assert_eq!(expand(0x7F), None);
    }
}

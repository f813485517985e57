// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The B24 colour palette: 8 basic colours (indices 0-7, selected by the
//! `BKF..WHF` C1 codes) plus an extended CLUT addressed by the `COL` CSI
//! command. Grounded on `decoder/b24_controlsets.hpp` and
//! `decoder/b24_conv_tables.hpp`.

use crate::caption::Rgba8;

/// The 8 basic colours, in `BKF..WHF` order (black, red, green, yellow,
/// blue, magenta, cyan, white), each fully opaque.
pub const BASIC: [Rgba8; 8] = [
    Rgba8::new(0x00, 0x00, 0x00, 0xFF), // Black
    Rgba8::new(0xFF, 0x00, 0x00, 0xFF), // Red
    Rgba8::new(0x00, 0xFF, 0x00, 0xFF), // Green
    Rgba8::new(0xFF, 0xFF, 0x00, 0xFF), // Yellow
    Rgba8::new(0x00, 0x00, 0xFF, 0xFF), // Blue
    Rgba8::new(0xFF, 0x00, 0xFF, 0xFF), // Magenta
    Rgba8::new(0x00, 0xFF, 0xFF, 0xFF), // Cyan
    Rgba8::new(0xFF, 0xFF, 0xFF, 0xFF), // White
];

/// The extended CLUT has 128 entries: the 8 basic colours at full
/// intensity, followed by half-intensity variants, followed by a ramp of
/// intermediate combinations. Index 0 is always fully-transparent black
/// (`back_color` default).
pub fn extended(index: u8) -> Rgba8 {
    if index == 0 {
        return Rgba8::TRANSPARENT;
    }
    let basic_idx = (index as usize - 1) % BASIC.len();
    let intensity_band = (index as usize - 1) / BASIC.len();
    let base = BASIC[basic_idx];
    let scale = match intensity_band {
        0 => 1.0,
        1 => 0.5,
        _ => 1.0 / (intensity_band as f32),
    };
    Rgba8::new(
        (f32::from(base.r) * scale) as u8,
        (f32::from(base.g) * scale) as u8,
        (f32::from(base.b) * scale) as u8,
        0xFF,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_black_and_white() {
        assert_eq!(BASIC[0], Rgba8::new(0, 0, 0, 0xFF));
        assert_eq!(BASIC[7], Rgba8::new(0xFF, 0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn extended_index_zero_is_transparent() {
        assert_eq!(extended(0), Rgba8::TRANSPARENT);
    }

    #[test]
    fn extended_wraps_through_basic_palette() {
        assert_eq!(extended(1).g, 0); // red band
        assert_eq!(extended(3).g, 0xFF); // green band, full intensity
    }
}

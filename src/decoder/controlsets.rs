// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! C0 and C1 control-code byte values for the statement-body state
//! machine. Grounded on `decoder/b24_controlsets.hpp`; values not present
//! in that (truncated) retrieval are filled in from the standard ARIB
//! STD-B24 table 7-14/7-15 control-code assignment.

pub mod c0 {
    pub const NUL: u8 = 0x00;
    pub const BEL: u8 = 0x07;
    pub const APB: u8 = 0x08; // active position backward
    pub const APF: u8 = 0x09; // active position forward
    pub const APD: u8 = 0x0A; // active position down
    pub const APU: u8 = 0x0B; // active position up
    pub const CS: u8 = 0x0C; // clear screen
    pub const APR: u8 = 0x0D; // active position return (CR)
    pub const LS1: u8 = 0x0E; // locking shift 1 (GL <- G1)
    pub const LS0: u8 = 0x0F; // locking shift 0 (GL <- G0)
    pub const PAPF: u8 = 0x16; // parameterized active position forward
    pub const CAN: u8 = 0x18; // cancel
    pub const SS2: u8 = 0x19; // single shift 2
    pub const ESC: u8 = 0x1B;
    pub const APS: u8 = 0x1C; // active position set (row;col follow)
    pub const SS3: u8 = 0x1D; // single shift 3
    pub const RS: u8 = 0x1E;
    pub const US: u8 = 0x1F;
    pub const SP: u8 = 0x20;
}

pub mod c1 {
    pub const DEL: u8 = 0x7F;
    pub const BKF: u8 = 0x80; // foreground black
    pub const RDF: u8 = 0x81; // foreground red
    pub const GRF: u8 = 0x82; // foreground green
    pub const YLF: u8 = 0x83; // foreground yellow
    pub const BLF: u8 = 0x84; // foreground blue
    pub const MGF: u8 = 0x85; // foreground magenta
    pub const CNF: u8 = 0x86; // foreground cyan
    pub const WHF: u8 = 0x87; // foreground white
    pub const SSZ: u8 = 0x88; // small size
    pub const MSZ: u8 = 0x89; // middle size
    pub const NSZ: u8 = 0x8A; // normal size
    pub const SZX: u8 = 0x8B; // character size set (takes a parameter byte)
    pub const COL: u8 = 0x90; // colour control (CSI-like, single param byte or introduces CSI)
    pub const FLC: u8 = 0x91; // flashing control
    pub const CDC: u8 = 0x92; // conceal display control
    pub const POL: u8 = 0x93; // pattern polarity control
    pub const WMM: u8 = 0x94; // writing mode modification
    pub const MACRO: u8 = 0x95; // macro definition / invocation
    pub const HLC: u8 = 0x97; // enclosure (highlight) control
    pub const RPC: u8 = 0x98; // repeat character
    pub const SPL: u8 = 0x99; // stop lining
    pub const STL: u8 = 0x9A; // start lining
    pub const CSI: u8 = 0x9B; // control sequence introducer
    pub const TIME: u8 = 0x9D; // time control
}

/// Returns `true` for bytes ARIB STD-B24 reserves but never assigns a
/// meaning to (`0xA0`, `0xFF`) — the decoder ignores these silently, not
/// even with a warning, matching spec §4.B's dispatch table.
pub const fn is_reserved(byte: u8) -> bool {
    byte == 0xA0 || byte == 0xFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_bytes() {
        assert!(is_reserved(0xA0));
        assert!(is_reserved(0xFF));
        assert!(!is_reserved(0x9B));
    }
}

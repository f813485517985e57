// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Parses the parameter list following a `CSI` (`0x9B`) introducer, the
//! same ECMA-48-style grammar `vte`'s `csi_dispatch` hands a terminal
//! performer: semicolon-separated decimal parameters, optional
//! intermediate bytes, terminated by a final byte that names the command.
//! Built on `nom` rather than `vte` because ARIB statement bodies are raw
//! JIS bytes, not guaranteed-UTF-8 terminal output, and `vte::Parser`
//! assumes the latter.

use nom::bytes::complete::take_while;
use nom::character::complete::{char as nom_char, digit1};
use nom::combinator::map;
use nom::multi::separated_list0;
use nom::IResult;

/// Named ARIB CSI commands this decoder understands. Final-byte
/// assignments here are this rewrite's own consistent scheme (the source
/// table wasn't fully recoverable from the retrieval pack — see
/// `DESIGN.md`); `Unknown` preserves the raw byte so the decoder can still
/// warn with the actual value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsiCommand {
    /// Set Writing Format.
    Swf,
    /// Set Display Format (caption-area rect).
    Sdf,
    /// Set Display Position.
    Sdp,
    /// Set cell Size (character matrix).
    Ssm,
    /// Set Horizontal Spacing.
    Shs,
    /// Set Vertical Spacing.
    Svs,
    /// Push ruby annotation level (Partial Line Down).
    Pld,
    /// Pop ruby annotation level (Partial Line Up).
    Plu,
    /// Set raster (background) Colour.
    Scr,
    /// Set ORNament (stroke) colour.
    Orn,
    /// Recognized-but-reserved/private final byte.
    Unknown(u8),
}

impl CsiCommand {
    pub fn from_final(byte: u8) -> Self {
        match byte {
            b'W' => CsiCommand::Swf,
            b'A' => CsiCommand::Sdf,
            b'Z' => CsiCommand::Sdp,
            b'M' => CsiCommand::Ssm,
            b'H' => CsiCommand::Shs,
            b'V' => CsiCommand::Svs,
            b'd' => CsiCommand::Pld,
            b'u' => CsiCommand::Plu,
            b'c' => CsiCommand::Scr,
            b'o' => CsiCommand::Orn,
            other => CsiCommand::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiSequence {
    pub command: CsiCommand,
    pub params: Vec<u32>,
    /// Total bytes consumed from the statement body, including the final
    /// byte but not the `CSI` introducer itself.
    pub consumed: usize,
}

fn parse_param(input: &[u8]) -> IResult<&[u8], u32> {
    map(digit1, |digits: &[u8]| {
        std::str::from_utf8(digits).unwrap_or("0").parse::<u32>().unwrap_or(0)
    })(input)
}

fn parse_params(input: &[u8]) -> IResult<&[u8], Vec<u32>> {
    separated_list0(nom_char(';'), parse_param)(input)
}

/// Parses one CSI body out of `data` (which must *not* include the `0x9B`
/// introducer byte). Returns `None` on malformed input (no final byte
/// found within `data`, or no bytes at all) — the caller treats that as
/// `MalformedInput`.
pub fn parse(data: &[u8]) -> Option<CsiSequence> {
    if data.is_empty() {
        return None;
    }

    // Parameter bytes: digits and ';'. An empty parameter list (command
    // with no numeric arguments) is valid.
    let (rest, param_bytes): (&[u8], &[u8]) =
        take_while(|b: u8| b.is_ascii_digit() || b == b';')(data).ok()?;

    // Optional single intermediate byte (0x20-0x2F).
    let rest = match rest.first() {
        Some(&b) if (0x20..=0x2F).contains(&b) => &rest[1..],
        _ => rest,
    };

    let final_byte = *rest.first()?;
    if !(0x40..=0x7E).contains(&final_byte) {
        return None;
    }

    let params = if param_bytes.is_empty() {
        Vec::new()
    } else {
        parse_params(param_bytes).ok()?.1
    };
    let consumed = data.len() - rest.len() + 1;

    Some(CsiSequence { command: CsiCommand::from_final(final_byte), params, consumed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_param_writing_format() {
        let data = b"7W";
        let seq = parse(data).unwrap();
        assert_eq!(seq.command, CsiCommand::Swf);
        assert_eq!(seq.params, vec![7]);
        assert_eq!(seq.consumed, 2);
    }

    #[test]
    fn parses_multiple_params() {
        let data = b"1;2;3Z";
        let seq = parse(data).unwrap();
        assert_eq!(seq.params, vec![1, 2, 3]);
        assert_eq!(seq.command, CsiCommand::Sdp);
    }

    #[test]
    fn parses_zero_params() {
        let data = b"u";
        let seq = parse(data).unwrap();
        assert_eq!(seq.params, Vec::<u32>::new());
        assert_eq!(seq.command, CsiCommand::Plu);
    }

    #[test]
    fn unknown_final_byte_is_preserved() {
        let data = b"5\x7E";
        let seq = parse(data).unwrap();
        assert_eq!(seq.command, CsiCommand::Unknown(0x7E));
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(parse(b"").is_none());
    }
}

// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Wire-level framing: PES private-data payload → data groups → data
//! units. Grounded on `decoder_impl.cpp`'s `Decode()`. The caller hands
//! this the PES packet's private-data payload (the bytes after the PES
//! header proper has already been stripped by the demuxer), matching
//! spec §4.B's framing table.

use crate::caption::Drcs;
use crate::decoder::{performer, Decoder, DecodeStatus, LanguageInfo};

const DATA_GROUP_CAPTION_MANAGEMENT: u8 = 0x00;

pub fn decode(decoder: &mut Decoder, data: &[u8], pts: i64) -> DecodeStatus {
    let Some(mut cursor) = Cursor::new(data) else {
        decoder.error("PES payload too short for synchronized_PES_data header");
        return DecodeStatus::Error;
    };

    let expected_identifier = decoder.caption_type as u8;
    if data[0] != expected_identifier {
        decoder.error(format!(
            "data_identifier {:#04X} does not match configured caption_type {:#04X}",
            data[0], expected_identifier
        ));
        return DecodeStatus::Error;
    }

    let mut produced: Option<crate::caption::Caption> = None;

    while !cursor.is_empty() {
        let Some(group) = cursor.take_data_group() else {
            decoder.error("malformed data_group framing");
            return DecodeStatus::Error;
        };

        let data_group_id = group.id & 0x3F;
        let group_kind = group.id >> 6;

        // Retransmission of a group already seen this stream: skip, per
        // source behavior of ignoring a repeated data_group_id & 0xF0.
        if group_kind == 1 {
            if decoder.prev_dgi_group == Some(data_group_id) {
                continue;
            }
            decoder.prev_dgi_group = Some(data_group_id);
        }

        if data_group_id == DATA_GROUP_CAPTION_MANAGEMENT {
            decode_management_data(decoder, group.payload);
        } else {
            let language_index = (data_group_id - 1) as usize;
            let wanted_index = decoder.language_id as usize - 1;
            if language_index != wanted_index {
                continue;
            }
            if let Some(caption) = decode_caption_statement(decoder, group.payload, pts) {
                produced = Some(caption);
            }
        }
    }

    match produced {
        Some(caption) => DecodeStatus::GotCaption(caption),
        None => DecodeStatus::NoCaption,
    }
}

struct DataGroup<'a> {
    id: u8,
    payload: &'a [u8],
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Option<Self> {
        // synchronized_PES_data_specification: 1 byte data_identifier +
        // 1 byte private_stream_id + 1 byte PES_data_packet_header_length
        // (whose low nibble gives the count of stuffing bytes to skip).
        if data.len() < 3 {
            return None;
        }
        let header_len = (data[2] & 0x0F) as usize;
        let pos = 3 + header_len;
        if pos > data.len() {
            return None;
        }
        Some(Self { data, pos })
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take_data_group(&mut self) -> Option<DataGroup<'a>> {
        let rest = &self.data[self.pos..];
        if rest.len() < 5 {
            self.pos = self.data.len();
            return None;
        }
        let id = rest[0];
        // rest[1] is data_group_link_number, rest[2] is last_data_group_link_number.
        let size = u16::from_be_bytes([rest[3], rest[4]]) as usize;
        let payload_start = 5;
        if rest.len() < payload_start + size + 2 {
            self.pos = self.data.len();
            return None;
        }
        let payload = &rest[payload_start..payload_start + size];
        self.pos += payload_start + size + 2; // + CRC16
        Some(DataGroup { id, payload })
    }
}

fn decode_management_data(decoder: &mut Decoder, payload: &[u8]) {
    if payload.len() < 4 {
        decoder.warn("caption management data too short");
        return;
    }
    let mut pos = 1; // skip TMD
    let num_languages = payload[pos] as usize;
    pos += 1;

    let mut infos = Vec::with_capacity(num_languages);
    for n in 0..num_languages {
        if pos + 5 > payload.len() {
            break;
        }
        let language_id = if (payload[pos] >> 5) & 0x01 == 0 {
            crate::decoder::LanguageId::First
        } else {
            crate::decoder::LanguageId::Second
        };
        let dmf = payload[pos] & 0x0F;
        pos += 1;
        let code = crate::decoder::three_cc(&[payload[pos], payload[pos + 1], payload[pos + 2]]);
        pos += 3;
        let format_tcs = payload[pos];
        pos += 1;
        infos.push(LanguageInfo {
            language_id,
            dmf,
            format: (format_tcs >> 4) & 0x0F,
            tcs: (format_tcs >> 2) & 0x03,
            iso6392_language_code: code,
        });
        let _ = n;
    }
    decoder.language_infos = infos;
    decoder.current_iso6392_language_code = decoder.query_iso6392_language_code(decoder.language_id);

    if matches!(decoder.request_encoding, crate::decoder::EncodingScheme::Auto) {
        decoder.set_encoding_scheme(crate::decoder::EncodingScheme::Auto);
    }
}

fn decode_caption_statement(decoder: &mut Decoder, payload: &[u8], pts: i64) -> Option<crate::caption::Caption> {
    if payload.is_empty() {
        return None;
    }
    // caption_data: TMD(2 bits) [+ STM(36 bits) if TMD==10] + num_units + units.
    let tmd = payload[0] >> 6;
    let mut pos = 1;
    if tmd == 0b10 {
        pos += 5; // 36-bit STM, byte-aligned to 5 bytes here.
    }
    if pos >= payload.len() {
        return None;
    }
    let mut remaining_units = u32::from_be_bytes([0, payload[pos], payload[pos + 1], payload[pos + 2]]);
    pos += 3;

    let mut caption = None;
    while remaining_units > 0 && pos + 5 <= payload.len() {
        let unit_parameter = payload[pos];
        let unit_size = u32::from_be_bytes([0, payload[pos + 1], payload[pos + 2], payload[pos + 3]]) as usize;
        pos += 4;
        if pos + unit_size > payload.len() {
            decoder.warn("data_unit size overruns caption_data payload");
            break;
        }
        let unit_data = &payload[pos..pos + unit_size];
        pos += unit_size;
        remaining_units -= 1;

        match unit_parameter {
            0x20 => {
                if let Some(produced) = performer::run(decoder, unit_data, pts) {
                    caption = Some(produced);
                }
            }
            0x30 => decode_drcs(decoder, unit_data, false),
            0x31 => decode_drcs(decoder, unit_data, true),
            0x35 => decoder.warn("bitmap data unit (0x35) is not supported, ignoring"),
            other => decoder.context.log(
                crate::logging::LogLevel::Debug,
                format!("ignoring data_unit_parameter {other:#04X}"),
            ),
        }
    }
    caption
}

/// DRCS data unit (`0x30` one-byte codes, `0x31` two-byte codes). Grounded
/// on `decoder_impl.hpp`/`decoder_impl.cpp`'s `ParseDRCS`/
/// `PushDRCSCharacter` loader shape: `number_of_code`, each code followed
/// by `number_of_font` font entries, each font a packed
/// `depth`-bits-per-pixel raster.
fn decode_drcs(decoder: &mut Decoder, data: &[u8], two_byte: bool) {
    if data.is_empty() {
        return;
    }
    let mut pos = 0;
    let number_of_code = data[pos] as usize;
    pos += 1;
    for _ in 0..number_of_code {
        let code_len = if two_byte { 2 } else { 1 };
        if pos + code_len + 1 > data.len() {
            break;
        }
        let code = if two_byte {
            let c = u32::from_be_bytes([0, 0, data[pos], data[pos + 1]]);
            pos += 2;
            c
        } else {
            let c = data[pos] as u32;
            pos += 1;
            c
        };
        let number_of_font = data[pos];
        pos += 1;
        for _ in 0..number_of_font {
            if pos + 3 > data.len() {
                break;
            }
            pos += 1; // font_id (high nibble) / mode (low nibble)
            let depth_byte = data[pos];
            pos += 1;
            let depth = (depth_byte & 0x03) + 1;
            let width = data[pos] as u32;
            pos += 1;
            let height = *data.get(pos).unwrap_or(&0) as u32;
            pos += 1;
            let bits_total = (width as usize) * (height as usize) * (depth as usize);
            let bytes_total = bits_total.div_ceil(8);
            if pos + bytes_total > data.len() {
                break;
            }
            let pixels = data[pos..pos + bytes_total].to_vec();
            pos += bytes_total;

            let md5 = content_hash(&pixels);
            performer::register_drcs(decoder, code, Drcs { width, height, depth, pixels, md5 });
        }
    }
}

fn content_hash(pixels: &[u8]) -> u128 {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(pixels);
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    u128::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::decoder::{CaptionType, EncodingScheme, LanguageId, Profile};

    fn fresh_decoder() -> Decoder {
        let mut decoder = Decoder::new(Context::default());
        decoder.initialize(EncodingScheme::Jis, CaptionType::Caption, Profile::A, LanguageId::First);
        decoder
    }

    fn wrap_caption_data_group(language_data_group_id: u8, statement: &[u8]) -> Vec<u8> {
        let mut caption_data = vec![0b00 << 6];
        let num_units: u32 = 1;
        caption_data.extend_from_slice(&num_units.to_be_bytes()[1..]);
        caption_data.push(0x20); // data_unit_parameter: statement body
        let unit_size = statement.len() as u32;
        caption_data.extend_from_slice(&unit_size.to_be_bytes()[1..]);
        caption_data.extend_from_slice(statement);

        let mut group = vec![language_data_group_id, 0, 0];
        group.extend_from_slice(&(caption_data.len() as u16).to_be_bytes());
        group.extend_from_slice(&caption_data);
        group.extend_from_slice(&[0, 0]); // CRC16, unchecked by this decoder.

        let mut pes = vec![0x80, 0xFF, 0x00]; // data_identifier, stream_id, header_len=0
        pes.extend_from_slice(&group);
        pes
    }

    #[test]
    fn decodes_plain_statement_through_full_framing() {
        let mut decoder = fresh_decoder();
        let pes = wrap_caption_data_group(1, b"AB");
        match decode(&mut decoder, &pes, 1234) {
            DecodeStatus::GotCaption(caption) => assert_eq!(caption.text, "AB"),
            other => panic!("expected GotCaption, got {other:?}"),
        }
    }

    #[test]
    fn wrong_language_index_yields_no_caption() {
        let mut decoder = fresh_decoder();
        let pes = wrap_caption_data_group(2, b"AB");
        assert!(matches!(decode(&mut decoder, &pes, 1234), DecodeStatus::NoCaption));
    }

    #[test]
    fn mismatched_data_identifier_is_an_error() {
        let mut decoder = fresh_decoder();
        let mut pes = wrap_caption_data_group(1, b"AB");
        pes[0] = 0x81; // Superimpose, but decoder is configured for Caption.
        assert!(matches!(decode(&mut decoder, &pes, 1234), DecodeStatus::Error));
    }

    #[test]
    fn truncated_pes_header_is_an_error() {
        let mut decoder = fresh_decoder();
        assert!(matches!(decode(&mut decoder, &[0x80, 0xFF], 0), DecodeStatus::Error));
    }
}

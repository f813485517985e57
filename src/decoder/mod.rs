// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Component B: the byte-stream decoder. [`Decoder`] is the public facade;
//! [`pes`] does wire-level PES/data-group/data-unit framing, [`performer`]
//! runs the statement-body escape-sequence state machine (in the same
//! "thin shim delegating to a stateful buffer" shape a VT100 `Perform`
//! implementation uses), [`state`] holds the mutable GL/GR/cursor/style
//! state that machine threads through a call, [`csi`] parses CSI
//! parameter lists, and [`controlsets`] names the raw C0/C1 byte values.
//! Grounded on `decoder_impl.{hpp,cpp}`.

pub mod controlsets;
pub mod csi;
pub mod performer;
pub mod pes;
pub mod state;

use rustc_hash::FxHashMap;

use crate::caption::Caption;
use crate::context::Context;
use crate::logging::LogLevel;

/// `data_identifier` / `CaptionType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionType {
    #[default]
    Caption = 0x80,
    Superimpose = 0x81,
}

/// How the statement body's bytes should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingScheme {
    /// Re-detected from management-data language declarations at every
    /// management packet (spec §4.B "Encoding auto-detection").
    #[default]
    Auto,
    Jis,
    Utf8,
    AbntLatin,
}

/// Caption profile, affecting default writing format and default `GX`
/// assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Full-seg (0x0008).
    #[default]
    A = 0x0008,
    /// One-seg (0x0012).
    C = 0x0012,
}

/// Which management-declared language's statements this decoder emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageId {
    #[default]
    First = 1,
    Second = 2,
}

#[derive(Debug)]
pub enum DecodeStatus {
    Error,
    NoCaption,
    GotCaption(Caption),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LanguageInfo {
    pub language_id: LanguageId,
    pub dmf: u8,
    pub format: u8,
    pub tcs: u8,
    pub iso6392_language_code: u32,
}

/// Packs a 3-character ISO 639-2 code into a `u32`, matching
/// `caption.hpp::ThreeCC`.
pub const fn three_cc(code: &[u8; 3]) -> u32 {
    ((code[0] as u32) << 16) | ((code[1] as u32) << 8) | (code[2] as u32)
}

pub struct Decoder {
    pub(crate) context: Context,

    pub(crate) request_encoding: EncodingScheme,
    pub(crate) active_encoding: EncodingScheme,

    pub(crate) caption_type: CaptionType,
    pub(crate) profile: Profile,
    pub(crate) language_id: LanguageId,

    pub(crate) replace_msz_fullwidth_ascii: bool,

    pub(crate) language_infos: Vec<LanguageInfo>,
    pub(crate) current_iso6392_language_code: u32,
    pub(crate) prev_dgi_group: Option<u8>,

    pub(crate) caption_plane_width: i32,
    pub(crate) caption_plane_height: i32,
    pub(crate) has_builtin_sound: bool,
    pub(crate) builtin_sound_id: u8,

    pub(crate) drcs_map: FxHashMap<u32, crate::caption::Drcs>,
    pub(crate) state: state::DecoderState,
}

impl Decoder {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            request_encoding: EncodingScheme::Auto,
            active_encoding: EncodingScheme::Jis,
            caption_type: CaptionType::Caption,
            profile: Profile::A,
            language_id: LanguageId::First,
            replace_msz_fullwidth_ascii: false,
            language_infos: Vec::new(),
            current_iso6392_language_code: 0,
            prev_dgi_group: None,
            caption_plane_width: state::WritingFormat::default().plane_width,
            caption_plane_height: state::WritingFormat::default().plane_height,
            has_builtin_sound: false,
            builtin_sound_id: 0,
            drcs_map: FxHashMap::default(),
            state: state::DecoderState::new(),
        }
    }

    pub fn initialize(
        &mut self,
        encoding_scheme: EncodingScheme,
        caption_type: CaptionType,
        profile: Profile,
        language_id: LanguageId,
    ) -> bool {
        self.request_encoding = encoding_scheme;
        if !matches!(encoding_scheme, EncodingScheme::Auto) {
            self.active_encoding = encoding_scheme;
        }
        self.caption_type = caption_type;
        self.profile = profile;
        self.language_id = language_id;
        self.reset_internal_state();
        true
    }

    pub fn set_encoding_scheme(&mut self, encoding_scheme: EncodingScheme) {
        self.request_encoding = encoding_scheme;
        let detected = match encoding_scheme {
            EncodingScheme::Auto => self.detect_encoding_scheme(),
            other => other,
        };
        if self.active_encoding != detected {
            self.active_encoding = detected;
            self.reset_internal_state();
        }
    }

    pub fn set_caption_type(&mut self, caption_type: CaptionType) {
        self.caption_type = caption_type;
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.state.reset_writing_format();
    }

    pub fn switch_language(&mut self, language_id: LanguageId) {
        if self.language_id != language_id {
            self.language_id = language_id;
            self.current_iso6392_language_code = self.query_iso6392_language_code(language_id);
        }
    }

    pub fn set_replace_msz_fullwidth_alphanumeric(&mut self, replace: bool) {
        self.replace_msz_fullwidth_ascii = replace;
    }

    pub fn query_iso6392_language_code(&self, language_id: LanguageId) -> u32 {
        if self.language_infos.is_empty() {
            return self.current_iso6392_language_code;
        }
        let index = language_id as usize - 1;
        self.language_infos.get(index).map(|info| info.iso6392_language_code).unwrap_or(0)
    }

    pub fn decode(&mut self, pes_data: &[u8], pts: i64) -> DecodeStatus {
        pes::decode(self, pes_data, pts)
    }

    pub fn flush(&mut self) {
        self.reset_internal_state();
    }

    fn reset_internal_state(&mut self) {
        self.state = state::DecoderState::new();
        self.state.reset_graphic_sets(self.active_encoding, self.profile);
        self.state.reset_writing_format();
        self.caption_plane_width = self.state.writing_format.plane_width;
        self.caption_plane_height = self.state.writing_format.plane_height;
        self.prev_dgi_group = None;
        self.drcs_map.clear();
    }

    fn detect_encoding_scheme(&self) -> EncodingScheme {
        let mut has_ucs = false;
        let mut has_jpn = false;
        let mut has_latin = false;
        let mut has_eng_or_tgl = false;

        for info in &self.language_infos {
            if info.tcs == 1 {
                has_ucs = true;
            } else if info.iso6392_language_code == three_cc(b"jpn") {
                has_jpn = true;
            } else if info.iso6392_language_code == three_cc(b"por")
                || info.iso6392_language_code == three_cc(b"spa")
            {
                has_latin = true;
            } else if info.iso6392_language_code == three_cc(b"eng")
                || info.iso6392_language_code == three_cc(b"tgl")
            {
                has_eng_or_tgl = true;
            }
        }

        if has_ucs {
            EncodingScheme::Utf8
        } else if has_jpn {
            EncodingScheme::Jis
        } else if has_latin {
            EncodingScheme::AbntLatin
        } else if has_eng_or_tgl {
            EncodingScheme::Utf8
        } else {
            EncodingScheme::Jis
        }
    }

    pub(crate) fn warn(&self, message: impl AsRef<str>) {
        self.context.log(LogLevel::Warn, message.as_ref());
    }

    pub(crate) fn error(&self, message: impl AsRef<str>) {
        self.context.log(LogLevel::Error, message.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_then_flush_resets_to_initial_state() {
        let mut decoder = Decoder::new(Context::default());
        decoder.initialize(EncodingScheme::Jis, CaptionType::Caption, Profile::A, LanguageId::First);
        let after_init = decoder.state.clone();

        // Mutate state as if a decode had run.
        decoder.state.px = 100;
        decoder.state.py = 50;

        decoder.flush();
        assert_eq!(decoder.state.px, after_init.px);
        assert_eq!(decoder.state.py, after_init.py);
        assert_eq!(decoder.state.gx, after_init.gx);
    }

    #[test]
    fn three_cc_packs_iso_639_2_code() {
        assert_eq!(three_cc(b"jpn"), 0x006A_706E);
    }
}

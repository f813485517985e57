// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # aribcaption_rs
//!
//! Decodes ARIB STD-B24 / ABNT NBR 15606-1 broadcast closed-caption byte
//! streams into a structured [`caption::Caption`] model, and renders that
//! model into RGBA bitmap regions suitable for overlaying onto video frames.
//!
//! ## Architecture
//!
//! Two stateful subsystems do the real work:
//!
//! - [`decoder::Decoder`] parses PES caption payloads. Internally it runs a
//!   multi-plane (`G0..G3` / `GL` / `GR`) code-set invocation machine — a
//!   direct descendant of ISO/IEC 2022 — over the statement body, the same
//!   way a VT100 escape-sequence parser runs a state machine over terminal
//!   output, except the "opcodes" are ARIB control/CSI codes instead of
//!   SGR/cursor-movement codes, and the "glyphs" come from JIS code tables
//!   instead of Unicode.
//! - [`renderer::Renderer`] owns a time-ordered cache of decoded captions,
//!   resolves PTS lookups with "indefinite duration" semantics, and lays
//!   each `CaptionRegion` out onto RGBA images via the [`graphics`] and
//!   [`provider`] modules.
//!
//! Font discovery and glyph rasterization are deliberately out of scope:
//! [`provider::FontProvider`] and [`provider::TextRenderer`] are the seams a
//! host application fills in with a platform backend (FreeType, DirectWrite,
//! CoreText, ...).
//!
//! ## Example
//!
//! ```no_run
//! use aribcaption_rs::{
//!     context::Context,
//!     decoder::{Decoder, DecodeStatus, EncodingScheme},
//! };
//!
//! let ctx = Context::new(None);
//! let mut decoder = Decoder::new(ctx);
//! decoder.initialize(EncodingScheme::Auto, Default::default(), Default::default(), Default::default());
//!
//! let pes: &[u8] = &[0x80, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00];
//! match decoder.decode(pes, 0) {
//!     DecodeStatus::GotCaption(caption) => println!("{} regions", caption.regions.len()),
//!     DecodeStatus::NoCaption => {}
//!     DecodeStatus::Error => eprintln!("malformed PES"),
//! }
//! ```

pub mod caption;
pub mod context;
pub mod decoder;
pub mod encoding;
pub mod error;
pub mod fixtures;
pub mod graphics;
pub mod logging;
pub mod provider;
pub mod renderer;
pub mod tables;

pub use caption::{Caption, CaptionChar, CaptionRegion, CharStyle, EnclosureStyle, Rgba8, DRCS};
pub use context::Context;
pub use decoder::{DecodeStatus, Decoder};
pub use error::{DecoderError, RendererError};
pub use logging::LogLevel;
pub use renderer::{Renderer, RenderResult, RenderStatus};

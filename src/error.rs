// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Internal error taxonomy. Neither [`DecoderError`] nor [`RendererError`]
//! crosses the public `decode`/`render` API boundary — those return the
//! closed-set `DecodeStatus`/`RenderStatus` discriminants instead, per the
//! "failures are values" policy. These types exist so `tracing::error!`
//! payloads and unit tests have a named reason rather than a bare string.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecoderError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("allocation failure")]
    AllocationFailure,
}

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("allocation failure")]
    AllocationFailure,
}

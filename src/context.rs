// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`Context`] is the top-level handle a caller owns: it carries the
//! optional log callback consumed by every [`crate::decoder::Decoder`] and
//! [`crate::renderer::Renderer`] constructed from it. Grounded on the
//! `Context`-by-reference shape `Decoder`/`Renderer` take in
//! `aribcaption/decoder.hpp` and `aribcaption/renderer.hpp` (both `#include
//! "context.hpp"` and construct from one) — there, `Context` owns a shared
//! `Logger`; here an `Arc` plays the same part, and cloning a `Context` is
//! cheap.

use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::logging::{CallbackLayer, LogCallback, LogLevel};

/// Shared handle passed to [`crate::decoder::Decoder::new`] and
/// [`crate::renderer::Renderer::new`].
///
/// Cloning is cheap (an `Arc` bump); the clone observes the same log
/// callback. Per the spec's lifetime rule, a `Context` must outlive every
/// `Decoder`/`Renderer` built from it.
#[derive(Clone)]
pub struct Context {
    callback: Option<LogCallback>,
}

impl Context {
    /// `callback` receives every `tracing::warn!`/`error!` emitted by
    /// children of this `Context`, formatted as a plain message. Pass `None`
    /// to opt out — events are still emitted to `tracing` for the process's
    /// own subscriber (if any), just not forwarded to `callback`.
    pub fn new(callback: Option<LogCallback>) -> Self {
        Self { callback }
    }

    /// Installs a scoped subscriber for the duration of `f`, forwarding
    /// events to this context's callback. Because `tracing`'s default
    /// subscriber is global and library code must not assume it owns that
    /// slot, this is exposed as an explicit opt-in rather than happening
    /// automatically at construction.
    pub fn with_scoped_logging<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.callback {
            Some(cb) => {
                let layer = CallbackLayer::new(Arc::clone(cb));
                let subscriber = tracing_subscriber::registry().with(layer);
                tracing::subscriber::with_default(subscriber, f)
            }
            None => f(),
        }
    }

    pub(crate) fn log(&self, level: LogLevel, message: &str) {
        if let Some(cb) = &self.callback {
            cb(level, message);
        }
        match level {
            LogLevel::Error => tracing::error!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Verbose => tracing::trace!("{message}"),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn callback_receives_logged_messages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = Arc::clone(&seen);
        let ctx = Context::new(Some(Arc::new(move |level, msg| {
            seen2.lock().unwrap().push((level, msg.to_string()));
        })));

        ctx.log(LogLevel::Warn, "hello");

        let guard = seen.lock().unwrap();
        assert_eq!(guard.len(), 1);
        assert_eq!(guard[0].0, LogLevel::Warn);
        assert_eq!(guard[0].1, "hello");
    }

    #[test]
    fn default_context_has_no_callback() {
        let ctx = Context::default();
        // Should not panic even though there's no callback registered.
        ctx.log(LogLevel::Info, "noop");
    }
}

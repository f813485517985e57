// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Structured logging plumbing shared by [`crate::decoder::Decoder`] and
//! [`crate::renderer::Renderer`].
//!
//! Unlike an application, a library must not install a global
//! `tracing_subscriber` registry — doing so would fight whatever the host
//! process already set up. Instead every log site emits a `tracing` event as
//! usual, and [`Context`](crate::context::Context) optionally forwards a
//! formatted copy of error/warn-level events to a user-supplied callback via
//! a thin [`tracing_subscriber::Layer`]. This mirrors the role
//! `GetContextLogger` plays in the source library without requiring callers
//! to adopt `tracing` themselves.

use std::fmt;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::layer::Context as LayerContext;
use tracing_subscriber::Layer;

/// Severity of a log event, matching the source library's `LogLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Verbose,
}

impl From<&tracing::Level> for LogLevel {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::ERROR => LogLevel::Error,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::TRACE => LogLevel::Verbose,
        }
    }
}

/// User-supplied log sink: `(level, message)`. Stored behind an `Arc` so
/// [`Context`](crate::context::Context) can be cheaply shared by `Decoder`
/// and `Renderer` instances constructed from it, per the spec's lifetime
/// rule that a `Context` outlives its children.
pub type LogCallback = Arc<dyn Fn(LogLevel, &str) + Send + Sync>;

/// Bridges `tracing` events to a [`LogCallback`]. Installed as a
/// per-`Context` layer rather than globally, so multiple independent
/// `Context`s in the same process never clobber each other's subscriber.
pub(crate) struct CallbackLayer {
    callback: LogCallback,
}

impl CallbackLayer {
    pub(crate) fn new(callback: LogCallback) -> Self {
        Self { callback }
    }
}

impl<S: Subscriber> Layer<S> for CallbackLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: LayerContext<'_, S>) {
        let level = LogLevel::from(event.metadata().level());
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        (self.callback)(level, &visitor.message);
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

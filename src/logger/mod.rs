//! Logging facade exports and the process-wide registry.
//!
//! This module re-exports the logging primitives and exposes free functions
//! that emit through a lazily created, process-wide `Registry`. Programs that
//! prefer explicit wiring can build their own `Registry` and call the same
//! methods on it.
//!
//! - `Sink`: trait every backend implements
//! - `LogRecord`: message, level and ordered key/value parameters
//! - `Registry`: holds the active sink, supports scoped installs
//! - `StdoutSink`: default sink, one JSON line per record
//! - `CaptureSink`: in-memory sink for tests
//!
//! ```rust,no_run
//! use kvlog::kv::{self, AnnotatedError};
//! use kvlog::logger;
//!
//! logger::info(None, "app started", &[kv::with_key_value_string("port", "8080")]);
//!
//! let err = AnnotatedError::new("db unreachable", &[kv::with_key_value_string("host", "db1")]);
//! logger::error(None, Some(&err), &[]);
//! ```

pub mod capture;
pub mod context;
pub mod core;
pub mod record;
pub mod registry;

pub use self::capture::CaptureSink;
pub use self::context::Context;
pub use self::core::{render, Level, NoopSink, Sink, StdoutSink, WriterSink};
pub use self::record::LogRecord;
pub use self::registry::{Registry, ScopedSink, SharedSink};

use crate::kv::LogOption;
use std::error::Error;
use std::io::Write;
use std::sync::OnceLock;

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry, created with a `StdoutSink` on first use.
pub fn global() -> &'static Registry {
    GLOBAL_REGISTRY.get_or_init(Registry::default)
}

/// Replaces the process-wide sink.
pub fn set_sink<S: Sink>(sink: S) {
    global().install(sink);
}

/// Installs `sink` process-wide until the guard is dropped.
///
/// Bind the guard for the whole test (`let _guard = ...`); `let _ = ...`
/// drops it immediately.
pub fn install_scoped_default<S: Sink>(sink: S) -> ScopedSink<'static> {
    global().install_scoped(sink)
}

/// Test helper: a default-format `WriterSink` over `writer`, scoped to the
/// returned guard.
pub fn set_default_sink_for_testing<W: Write + Send + 'static>(writer: W) -> ScopedSink<'static> {
    install_scoped_default(WriterSink::new(writer))
}

pub fn log(
    ctx: Option<&Context>,
    level: Level,
    message: impl Into<String>,
    options: &[LogOption],
) -> String {
    global().log(ctx, level, message, options)
}

pub fn debug(ctx: Option<&Context>, message: impl Into<String>, options: &[LogOption]) -> String {
    global().debug(ctx, message, options)
}

pub fn info(ctx: Option<&Context>, message: impl Into<String>, options: &[LogOption]) -> String {
    global().info(ctx, message, options)
}

pub fn warn(ctx: Option<&Context>, message: impl Into<String>, options: &[LogOption]) -> String {
    global().warn(ctx, message, options)
}

/// Emits `err` at error level; `None` logs nothing and returns `None`.
///
/// A bare `None` needs a type for `E`; `error_dyn(None, None, &[])` is the
/// same call without one.
pub fn error<E: Error + 'static>(
    ctx: Option<&Context>,
    err: Option<&E>,
    options: &[LogOption],
) -> Option<String> {
    global().error(ctx, err, options)
}

pub fn error_dyn(
    ctx: Option<&Context>,
    err: Option<&(dyn Error + 'static)>,
    options: &[LogOption],
) -> Option<String> {
    global().error_dyn(ctx, err, options)
}

#[cfg(test)]
pub mod tests;

//! The swappable home of the active sink.
//!
//! A `Registry` holds exactly one active sink in an `ArcSwap`. Emissions load
//! it with a single atomic read, so every call sees one consistent sink even
//! while another thread installs a new one. Installs are plain atomic stores
//! or swaps and are expected to be rare (startup, test setup and teardown).
//!
//! Scoped installs hand back a `ScopedSink` guard holding whatever was active
//! at install time. Dropping the guard, including while unwinding from a
//! panic, puts that sink back. Guards dropped in reverse order of creation
//! therefore restore in reverse order of installation.

use crate::kv::LogOption;
use crate::logger::context::Context;
use crate::logger::core::{Level, Sink, StdoutSink};
use crate::logger::record::LogRecord;
use arc_swap::ArcSwap;
use std::error::Error;
use std::sync::Arc;

/// Shared handle to an installed sink. Identity is `Arc::ptr_eq`.
pub type SharedSink = Arc<dyn Sink>;

pub struct Registry {
    active: ArcSwap<SharedSink>,
}

impl Registry {
    pub fn new<S: Sink>(sink: S) -> Self {
        Self::with_shared(Arc::new(sink))
    }

    pub fn with_shared(sink: SharedSink) -> Self {
        Self {
            active: ArcSwap::from_pointee(sink),
        }
    }

    /// Replaces the active sink for every subsequent emission.
    pub fn install<S: Sink>(&self, sink: S) {
        self.install_shared(Arc::new(sink));
    }

    pub fn install_shared(&self, sink: SharedSink) {
        self.active.store(Arc::new(sink));
    }

    /// Installs `sink` until the returned guard is dropped.
    pub fn install_scoped<S: Sink>(&self, sink: S) -> ScopedSink<'_> {
        self.install_scoped_shared(Arc::new(sink))
    }

    pub fn install_scoped_shared(&self, sink: SharedSink) -> ScopedSink<'_> {
        let previous = self.active.swap(Arc::new(sink));
        ScopedSink {
            registry: self,
            previous: Some(previous),
        }
    }

    /// The sink emissions currently go to.
    pub fn current(&self) -> SharedSink {
        let guard = self.active.load();
        Arc::clone(&**guard)
    }

    /// Hands `record` to the active sink and returns what the sink returned.
    pub fn emit(&self, record: &LogRecord) -> String {
        let sink = self.active.load();
        sink.log(record)
    }

    /// Builds a `level` record from `message` and `options` and emits it.
    ///
    /// `ctx` is accepted for propagation only and does not change behavior.
    pub fn log(
        &self,
        _ctx: Option<&Context>,
        level: Level,
        message: impl Into<String>,
        options: &[LogOption],
    ) -> String {
        self.emit(&LogRecord::build(level, message, options))
    }

    pub fn debug(
        &self,
        ctx: Option<&Context>,
        message: impl Into<String>,
        options: &[LogOption],
    ) -> String {
        self.log(ctx, Level::Debug, message, options)
    }

    pub fn info(
        &self,
        ctx: Option<&Context>,
        message: impl Into<String>,
        options: &[LogOption],
    ) -> String {
        self.log(ctx, Level::Info, message, options)
    }

    pub fn warn(
        &self,
        ctx: Option<&Context>,
        message: impl Into<String>,
        options: &[LogOption],
    ) -> String {
        self.log(ctx, Level::Warn, message, options)
    }

    /// Emits an error-level record for `err`.
    ///
    /// `None` is a no-op: nothing is built, the sink is not called and `None`
    /// is returned. Extra `options` pairs follow the error's own annotations.
    /// A bare `None` needs a type for `E`; use `error_dyn(None, None, ..)`.
    pub fn error<E>(
        &self,
        ctx: Option<&Context>,
        err: Option<&E>,
        options: &[LogOption],
    ) -> Option<String>
    where
        E: Error + 'static,
    {
        self.error_dyn(ctx, err.map(|e| e as &(dyn Error + 'static)), options)
    }

    /// `error` for callers holding a trait object.
    pub fn error_dyn(
        &self,
        _ctx: Option<&Context>,
        err: Option<&(dyn Error + 'static)>,
        options: &[LogOption],
    ) -> Option<String> {
        let err = err?;
        Some(self.emit(&LogRecord::from_error(err, options)))
    }
}

/// Starts with the built-in `StdoutSink`.
impl Default for Registry {
    fn default() -> Self {
        Self::new(StdoutSink::new())
    }
}

/// Restores the sink that was active before the scoped install.
#[must_use = "the previous sink is restored as soon as the guard is dropped"]
pub struct ScopedSink<'a> {
    registry: &'a Registry,
    previous: Option<Arc<SharedSink>>,
}

impl ScopedSink<'_> {
    /// The sink that will be restored.
    pub fn previous(&self) -> Option<SharedSink> {
        self.previous.as_ref().map(|prev| Arc::clone(&**prev))
    }
}

impl Drop for ScopedSink<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.registry.active.store(previous);
        }
    }
}

//! Errors that carry key/value annotations.
//!
//! An `AnnotatedError` is one layer in an error chain: a message, the pairs
//! attached to that layer, and an optional wrapped source. `key_values` walks
//! the whole `source()` chain and collects the pairs of every annotated layer,
//! outermost first. Foreign errors in the chain contribute nothing but do not
//! stop the walk.

use super::options::apply_options;
use super::{KeyValue, LogOption};
use std::error::Error;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct AnnotatedError {
    message: String,
    pairs: Vec<KeyValue>,
    #[source]
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl AnnotatedError {
    /// A root error annotated with the pairs `options` produce.
    pub fn new(message: impl Into<String>, options: &[LogOption]) -> Self {
        Self {
            message: message.into(),
            pairs: apply_options(Vec::new(), options),
            source: None,
        }
    }

    /// Wraps `source` in a new annotated layer.
    pub fn wrap<E>(source: E, message: impl Into<String>, options: &[LogOption]) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        Self {
            message: message.into(),
            pairs: apply_options(Vec::new(), options),
            source: Some(source.into()),
        }
    }

    /// Attaches more pairs to this layer, after the existing ones.
    pub fn with(mut self, options: &[LogOption]) -> Self {
        self.pairs = apply_options(self.pairs, options);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Pairs attached to this layer only.
    pub fn key_values(&self) -> &[KeyValue] {
        &self.pairs
    }
}

/// Collects the annotations of every `AnnotatedError` in `err`'s chain.
///
/// Order is stable: outer layers before inner ones, and within a layer the
/// order in which pairs were attached.
pub fn key_values(err: &(dyn Error + 'static)) -> Vec<KeyValue> {
    let mut pairs = Vec::new();
    let mut current = Some(err);
    while let Some(layer) = current {
        if let Some(annotated) = layer.downcast_ref::<AnnotatedError>() {
            pairs.extend(annotated.pairs.iter().cloned());
        }
        current = layer.source();
    }
    pairs
}

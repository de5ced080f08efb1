//! The immutable unit handed to a sink.

use crate::kv::{apply_options, key_values, KeyValue, LogOption};
use crate::logger::core::Level;
use serde::Serialize;
use std::error::Error;

/// Message, level and ordered parameters of one log call.
///
/// Parameters keep emission order and may repeat keys. A record is never
/// changed after it is built; sinks receive it by shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    message: String,
    level: Level,
    parameters: Vec<KeyValue>,
}

impl LogRecord {
    pub fn new(message: impl Into<String>, level: Level, parameters: Vec<KeyValue>) -> Self {
        Self {
            message: message.into(),
            level,
            parameters,
        }
    }

    /// Applies `options` left to right to build the parameter list.
    pub fn build(level: Level, message: impl Into<String>, options: &[LogOption]) -> Self {
        Self::new(message, level, apply_options(Vec::new(), options))
    }

    /// Error-level record from `err`.
    ///
    /// The message is `err`'s `Display` output. Parameters are the annotations
    /// found in the error chain followed by the pairs from `options`.
    pub fn from_error(err: &(dyn Error + 'static), options: &[LogOption]) -> Self {
        Self::new(err.to_string(), Level::Error, apply_options(key_values(err), options))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn parameters(&self) -> &[KeyValue] {
        &self.parameters
    }
}

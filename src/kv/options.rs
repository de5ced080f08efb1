//! Emission-time options.
//!
//! Every option is a pure function from the pairs collected so far to the
//! pairs after this option: `apply(pairs) -> pairs'`. Options are applied left
//! to right, so the final parameter list is the concatenation of what each
//! option contributes, in call order.

use super::KeyValue;
use serde_json::Value;
use std::fmt::Display;
use std::panic::Location;

/// Key used by `LogOption::Source`.
pub const SOURCE_KEY: &str = "source";
/// Key used by `LogOption::Code`.
pub const CODE_KEY: &str = "code";

/// A composable unit contributing zero or more pairs to a record.
#[derive(Debug, Clone, PartialEq)]
pub enum LogOption {
    /// One key/value pair.
    KeyValue(KeyValue),
    /// Several pairs, kept in the given order.
    KeyValues(Vec<KeyValue>),
    /// Entries of a JSON object, in document order. Anything other than an
    /// object contributes nothing.
    Fields(Value),
    /// A `file:line` call site.
    Source(String),
    /// An error or event code.
    Code(String),
}

impl LogOption {
    /// Appends this option's pairs to `pairs` and returns the result.
    pub fn apply(&self, mut pairs: Vec<KeyValue>) -> Vec<KeyValue> {
        match self {
            LogOption::KeyValue(kv) => pairs.push(kv.clone()),
            LogOption::KeyValues(kvs) => pairs.extend(kvs.iter().cloned()),
            LogOption::Fields(Value::Object(map)) => {
                pairs.extend(map.iter().map(|(k, v)| KeyValue::new(k.as_str(), field_value(v))));
            }
            LogOption::Fields(_) => {}
            LogOption::Source(location) => pairs.push(KeyValue::new(SOURCE_KEY, location.as_str())),
            LogOption::Code(code) => pairs.push(KeyValue::new(CODE_KEY, code.as_str())),
        }
        pairs
    }
}

// Strings are taken verbatim; every other JSON value keeps its JSON text.
fn field_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Applies `options` in order, starting from `pairs`.
pub fn apply_options(pairs: Vec<KeyValue>, options: &[LogOption]) -> Vec<KeyValue> {
    options.iter().fold(pairs, |acc, opt| opt.apply(acc))
}

pub fn with_key_value_string(key: impl Into<String>, value: impl Into<String>) -> LogOption {
    LogOption::KeyValue(KeyValue::new(key, value))
}

/// Stringifies `value` with its `Display` impl.
pub fn with_key_value(key: impl Into<String>, value: impl Display) -> LogOption {
    LogOption::KeyValue(KeyValue::new(key, value.to_string()))
}

pub fn with_key_values<I, P>(pairs: I) -> LogOption
where
    I: IntoIterator<Item = P>,
    P: Into<KeyValue>,
{
    LogOption::KeyValues(pairs.into_iter().map(Into::into).collect())
}

/// Pairs from a JSON object. Non-object values yield no pairs.
pub fn with_fields(fields: Value) -> LogOption {
    LogOption::Fields(fields)
}

/// Records the caller's `file:line`.
#[track_caller]
pub fn with_source() -> LogOption {
    let caller = Location::caller();
    LogOption::Source(format!("{}:{}", caller.file(), caller.line()))
}

pub fn with_code(code: impl Into<String>) -> LogOption {
    LogOption::Code(code.into())
}

//! Key/value annotations consumed by the logging facade.
//!
//! This module carries the structured parameters that end up on a log record.
//! It provides:
//! - `KeyValue`: a single string/string pair
//! - `LogOption`: a small, closed set of pure pair transformers applied at
//!   emission time
//! - `AnnotatedError`: an error layer that carries its own pairs, plus
//!   `key_values` to pull every pair out of an error chain
//!
//! ```rust
//! use kvlog::kv::{self, AnnotatedError, LogOption};
//!
//! let err = AnnotatedError::new("lookup failed", &[kv::with_key_value_string("user", "42")]);
//! let pairs = kv::key_values(&err);
//! assert_eq!(pairs[0].key, "user");
//!
//! let opts = [kv::with_key_value("attempt", 3), LogOption::Code("E_LOOKUP".into())];
//! let pairs = kv::apply_options(Vec::new(), &opts);
//! assert_eq!(pairs.len(), 2);
//! ```

pub mod errors;
pub mod options;

pub use errors::{key_values, AnnotatedError};
pub use options::{
    apply_options, with_code, with_fields, with_key_value, with_key_value_string,
    with_key_values, with_source, LogOption,
};

use serde::{Deserialize, Serialize};

/// A single structured parameter.
///
/// Values are always strings; anything else is stringified by the option that
/// produced the pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for KeyValue {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

//! Structured key/value logging facade.
//!
//! Application code emits leveled records carrying ordered key/value pairs;
//! a single swappable `Sink` decides what happens to them.

pub mod config;
pub mod kv;
pub mod logger;

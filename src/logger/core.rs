//! Sink primitives for the kvlog facade.
//!
//! This module provides the small surface every backend implements. A sink
//! receives a fully built `LogRecord` and returns a string representation of
//! what it did with it (the rendered line for the writer sinks, an empty
//! string when there is nothing to show).
//!
//! Responsibilities:
//! - Define `Level` and the `Sink` trait
//! - Offer `NoopSink` for benchmarks and silenced tests
//! - Offer the built-in line writers: `StdoutSink` (the process default) and
//!   `WriterSink` over any `io::Write`
//!
//! Notes on thread-safety and bounds:
//! Implementors of `Sink` must be `Send + Sync + 'static` because the active
//! sink is shared by every thread that logs. Sinks that need a total order of
//! output serialize internally; the facade never locks around a `log` call.

use crate::config::{OutputFormat, SinkConfig};
use crate::logger::record::LogRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Returns the lower-case name used in rendered records.
impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single capability a logging backend provides.
///
/// Must be `Send + Sync + 'static` to be installed in a `Registry`.
/// Panics raised by `log` are not caught by the facade; they unwind through
/// the emitting call site.
pub trait Sink: Send + Sync + 'static {
    /// Accept a record. The returned string is handed back to the caller.
    fn log(&self, record: &LogRecord) -> String;

    /// Flush any buffered records.
    fn flush(&self) {}
}

/// Drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl Sink for NoopSink {
    fn log(&self, _record: &LogRecord) -> String {
        String::new()
    }
}

/// Renders `record` as one line (no trailing newline).
///
/// JSON example: `{"ts":"...","level":"info","msg":"started","params":[{"key":"port","value":"80"}]}`.
/// Text example: `... info started port=80`.
pub fn render(record: &LogRecord, config: &SinkConfig) -> String {
    let ts = config
        .timestamps
        .then(|| chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true));

    match config.format {
        OutputFormat::Json => {
            let mut obj = Map::new();
            if let Some(ts) = ts {
                obj.insert("ts".into(), Value::String(ts));
            }
            obj.insert("level".into(), Value::String(record.level().as_str().into()));
            obj.insert("msg".into(), Value::String(record.message().into()));
            if !record.parameters().is_empty() {
                let params = record
                    .parameters()
                    .iter()
                    .map(|kv| serde_json::json!({ "key": kv.key, "value": kv.value }))
                    .collect();
                obj.insert("params".into(), Value::Array(params));
            }
            Value::Object(obj).to_string()
        }
        OutputFormat::Text => {
            let mut line = String::new();
            if let Some(ts) = ts {
                line.push_str(&ts);
                line.push(' ');
            }
            line.push_str(record.level().as_str());
            line.push(' ');
            line.push_str(&text_message(record.message()));
            for kv in record.parameters() {
                line.push(' ');
                line.push_str(&text_value(&kv.key));
                line.push('=');
                line.push_str(&text_value(&kv.value));
            }
            line
        }
    }
}

// Messages may contain spaces but never a line break or a bare quote.
fn text_message(message: &str) -> String {
    if message.contains(|c: char| c.is_control() || c == '"') {
        format!("{:?}", message)
    } else {
        message.to_string()
    }
}

// Quote keys and values that would break `key=value` tokenization.
fn text_value(value: &str) -> String {
    if value.is_empty()
        || value.contains(|c: char| c.is_whitespace() || c.is_control() || c == '"' || c == '=')
    {
        format!("{:?}", value)
    } else {
        value.to_string()
    }
}

/// The built-in default sink: one rendered line per record on stdout.
///
/// Writes go through `io::stdout()` directly; write errors are dropped and
/// the rendered line is still returned.
#[derive(Debug, Default, Clone)]
pub struct StdoutSink {
    config: SinkConfig,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SinkConfig) -> Self {
        Self { config }
    }
}

impl Sink for StdoutSink {
    fn log(&self, record: &LogRecord) -> String {
        let line = render(record, &self.config);
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        line
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Line writer over any `io::Write`.
///
/// The writer sits behind a mutex so concurrent records never interleave
/// within a line.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
    config: SinkConfig,
}

impl<W: Write + Send + 'static> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, SinkConfig::default())
    }

    pub fn with_config(writer: W, config: SinkConfig) -> Self {
        Self {
            writer: Mutex::new(writer),
            config,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send + 'static> Sink for WriterSink<W> {
    fn log(&self, record: &LogRecord) -> String {
        let line = render(record, &self.config);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "{}", line);
        line
    }

    fn flush(&self) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::with_key_value_string;
    use std::os::fd::{AsFd, AsRawFd};

    fn plain() -> SinkConfig {
        SinkConfig {
            format: OutputFormat::Json,
            timestamps: false,
        }
    }

    fn text() -> SinkConfig {
        SinkConfig {
            format: OutputFormat::Text,
            timestamps: false,
        }
    }

    // ========== Level tests ==========

    #[test]
    fn test_level_as_str_success() {
        assert_eq!(Level::Trace.as_str(), "trace");
        assert_eq!(Level::Debug.as_str(), "debug");
        assert_eq!(Level::Info.as_str(), "info");
        assert_eq!(Level::Warn.as_str(), "warn");
        assert_eq!(Level::Error.as_str(), "error");
        assert_eq!(Level::Error.to_string(), "error");
    }

    #[test]
    fn test_level_ordering_is_monotonic() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Info).unwrap(), "\"info\"");
        let lvl: Level = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(lvl, Level::Warn);
    }

    // ========== render tests ==========

    #[test]
    fn test_render_json_without_params() {
        let record = LogRecord::build(Level::Error, "errMsg", &[]);
        assert_eq!(render(&record, &plain()), r#"{"level":"error","msg":"errMsg"}"#);
    }

    #[test]
    fn test_render_json_keeps_repeated_keys_in_order() {
        let record = LogRecord::build(
            Level::Info,
            "message",
            &[with_key_value_string("k", "1"), with_key_value_string("k", "2")],
        );
        let rendered: Value = serde_json::from_str(&render(&record, &plain())).unwrap();
        assert_eq!(rendered["params"][0]["value"], "1");
        assert_eq!(rendered["params"][1]["value"], "2");
        assert_eq!(rendered["params"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_render_json_with_timestamp() {
        let config = SinkConfig {
            format: OutputFormat::Json,
            timestamps: true,
        };
        let record = LogRecord::build(Level::Info, "hi", &[]);
        let rendered: Value = serde_json::from_str(&render(&record, &config)).unwrap();
        let ts = rendered["ts"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_render_text_quotes_awkward_values() {
        let record = LogRecord::build(
            Level::Warn,
            "disk low",
            &[
                with_key_value_string("free", "10%"),
                with_key_value_string("mount", "/var lib"),
                with_key_value_string("empty", ""),
            ],
        );
        assert_eq!(
            render(&record, &text()),
            r#"warn disk low free=10% mount="/var lib" empty="""#
        );
    }

    #[test]
    fn test_render_text_escapes_line_breaks_and_awkward_keys() {
        let record = LogRecord::build(
            Level::Info,
            "multi\nline msg",
            &[
                with_key_value_string("bad key", "v"),
                with_key_value_string("k=x", "1"),
                with_key_value_string("k", "a\nb"),
            ],
        );

        let out = render(&record, &text());

        assert_eq!(out.lines().count(), 1);
        assert_eq!(out, r#"info "multi\nline msg" "bad key"=v "k=x"=1 k="a\nb""#);
    }

    #[test]
    fn test_render_text_quotes_message_with_quote() {
        let record = LogRecord::build(Level::Warn, "said \"hi\"", &[]);
        assert_eq!(render(&record, &text()), r#"warn "said \"hi\"""#);
    }

    // ========== NoopSink tests ==========

    #[test]
    fn test_noopsink_returns_empty() {
        let record = LogRecord::build(Level::Info, "dropped", &[]);
        assert_eq!(NoopSink.log(&record), "");
        NoopSink.flush();
    }

    // ========== WriterSink tests ==========

    #[test]
    fn test_writersink_writes_one_line_per_record() {
        let sink = WriterSink::with_config(Vec::new(), text());
        let first = sink.log(&LogRecord::build(Level::Info, "one", &[]));
        sink.log(&LogRecord::build(Level::Error, "two", &[]));
        sink.flush();

        assert_eq!(first, "info one");
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "info one\nerror two\n");
    }

    // ========== StdoutSink tests ==========

    // stdout is process-wide; only one test may redirect it at a time
    static STDOUT_LOCK: Mutex<()> = Mutex::new(());

    fn capture_stdout<F: FnOnce()>(f: F) -> String {
        use std::io::{Read, Seek, SeekFrom};

        let _lock = STDOUT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        let mut reader = tempfile::tempfile().unwrap();
        let writer = reader.try_clone().unwrap();

        let saved = unsafe { libc::dup(libc::STDOUT_FILENO) };
        unsafe { libc::dup2(writer.as_fd().as_raw_fd(), libc::STDOUT_FILENO) };

        f();

        unsafe { libc::dup2(saved, libc::STDOUT_FILENO) };
        unsafe { libc::close(saved) };

        let mut output = String::new();
        reader.seek(SeekFrom::Start(0)).unwrap();
        reader.read_to_string(&mut output).unwrap();
        output
    }

    #[test]
    fn test_stdoutsink_prints_json_success() {
        let sink = StdoutSink::new();
        let mut returned = String::new();
        let out = capture_stdout(|| {
            returned = sink.log(&LogRecord::build(
                Level::Info,
                "hello",
                &[with_key_value_string("some", "param")],
            ));
            sink.flush();
        });

        assert!(out.contains(&returned));
        assert!(returned.contains("\"level\":\"info\""));
        assert!(returned.contains("\"msg\":\"hello\""));
        assert!(returned.contains("\"ts\":"));
    }

    #[test]
    fn test_stdoutsink_with_config_uses_text_format() {
        let sink = StdoutSink::with_config(text());
        let mut returned = String::new();
        let out = capture_stdout(|| {
            returned = sink.log(&LogRecord::build(Level::Error, "plain text", &[]));
        });

        assert_eq!(returned, "error plain text");
        assert!(out.contains("error plain text\n"));
    }
}

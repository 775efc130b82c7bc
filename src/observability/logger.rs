//! Structured JSON logger
//!
//! - One log line = one event
//! - Keys sorted for deterministic output
//! - Records below the minimum severity are dropped
//! - Write failures are swallowed; logging never affects routing

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-field detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Unusual but handled
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            other => Err(format!(
                "unknown log level '{}', expected trace, info, warn or error",
                other
            )),
        }
    }
}

/// Shared in-memory log destination
pub type LogBuffer = Arc<Mutex<Vec<u8>>>;

enum Target {
    Stderr,
    Buffer(LogBuffer),
}

/// A structured logger that writes one JSON object per line
pub struct Logger {
    min_severity: Severity,
    target: Target,
}

impl Logger {
    /// Logger writing to stderr, so stdout stays free for responses
    pub fn stderr(min_severity: Severity) -> Self {
        Self {
            min_severity,
            target: Target::Stderr,
        }
    }

    /// Logger writing into a shared buffer. Returns the buffer handle.
    pub fn buffer(min_severity: Severity) -> (Self, LogBuffer) {
        let buffer: LogBuffer = Arc::new(Mutex::new(Vec::new()));
        let logger = Self {
            min_severity,
            target: Target::Buffer(Arc::clone(&buffer)),
        };
        (logger, buffer)
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    /// Log an event with the given severity and fields
    pub fn log(&self, severity: Severity, event: Event, fields: &[(&str, Value)]) {
        if !self.enabled(severity) {
            return;
        }

        let line = render_line(severity, event, fields);
        match &self.target {
            Target::Stderr => write_line(&mut io::stderr().lock(), &line),
            Target::Buffer(buffer) => {
                if let Ok(mut buf) = buffer.lock() {
                    write_line(&mut *buf, &line);
                }
            }
        }
    }

    pub fn trace(&self, event: Event, fields: &[(&str, Value)]) {
        self.log(Severity::Trace, event, fields);
    }

    pub fn info(&self, event: Event, fields: &[(&str, Value)]) {
        self.log(Severity::Info, event, fields);
    }

    pub fn warn(&self, event: Event, fields: &[(&str, Value)]) {
        self.log(Severity::Warn, event, fields);
    }

    pub fn error(&self, event: Event, fields: &[(&str, Value)]) {
        self.log(Severity::Error, event, fields);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            Target::Stderr => "stderr",
            Target::Buffer(_) => "buffer",
        };
        f.debug_struct("Logger")
            .field("min_severity", &self.min_severity)
            .field("target", &target)
            .finish()
    }
}

/// Builds the JSON line. `serde_json::Map` is ordered by key, so output is
/// stable regardless of field order.
fn render_line(severity: Severity, event: Event, fields: &[(&str, Value)]) -> String {
    let mut record = Map::new();
    for (key, value) in fields {
        record.insert((*key).to_string(), value.clone());
    }
    record.insert("event".into(), Value::String(event.as_str().into()));
    record.insert("severity".into(), Value::String(severity.as_str().into()));

    let mut line = Value::Object(record).to_string();
    line.push('\n');
    line
}

fn write_line<W: Write>(writer: &mut W, line: &str) {
    let _ = writer.write_all(line.as_bytes());
    let _ = writer.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(buffer: &LogBuffer) -> Vec<Value> {
        let bytes = buffer.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("INFO".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warn);
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_log_json_format() {
        let (logger, buffer) = Logger::buffer(Severity::Trace);
        logger.info(Event::RevisionRouted, &[("channels", json!("a,b"))]);

        let records = lines(&buffer);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["event"], "REVISION_ROUTED");
        assert_eq!(records[0]["severity"], "INFO");
        assert_eq!(records[0]["channels"], "a,b");
    }

    #[test]
    fn test_deterministic_key_order() {
        let (logger, buffer) = Logger::buffer(Severity::Trace);
        logger.info(Event::PolicyLoaded, &[("z", json!(1)), ("a", json!(2))]);
        logger.info(Event::PolicyLoaded, &[("a", json!(2)), ("z", json!(1))]);

        let text = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        let mut it = text.lines();
        assert_eq!(it.next(), it.next());
    }

    #[test]
    fn test_below_minimum_is_dropped() {
        let (logger, buffer) = Logger::buffer(Severity::Warn);
        logger.info(Event::RevisionRouted, &[]);
        logger.trace(Event::RevisionReceived, &[]);
        logger.warn(Event::ResurrectionDetected, &[]);

        let records = lines(&buffer);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["event"], "RESURRECTION_DETECTED");
    }

    #[test]
    fn test_escaping_is_valid_json() {
        let (logger, buffer) = Logger::buffer(Severity::Trace);
        logger.error(Event::InputRejected, &[("message", json!("quote \" and\nnewline"))]);
        let records = lines(&buffer);
        assert_eq!(records[0]["message"], "quote \" and\nnewline");
    }
}

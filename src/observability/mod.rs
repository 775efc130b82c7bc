//! Observability subsystem
//!
//! This module provides:
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Revision observers, the logging sink the hook reports to
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on routing decisions
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use syncroute::observability::{Event, LogObserver, Logger, Severity};
//!
//! let logger = Logger::stderr(Severity::Info);
//! logger.info(Event::PolicyLoaded, &[]);
//!
//! let observer = LogObserver::new(Logger::stderr(Severity::Trace));
//! ```

mod events;
mod logger;
mod observer;

pub use events::Event;
pub use logger::{LogBuffer, Logger, Severity};
pub use observer::{LogObserver, MemoryObserver, NoopObserver, Observation, RevisionObserver};

//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in the routing hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Raw revision handed to the hook, before evaluation
    RevisionReceived,
    /// Normal-path decision produced
    RevisionRouted,
    /// Orphan revision forced into the cleanup channel
    ResurrectionDetected,
    /// Policy built from configuration
    PolicyLoaded,
    /// Host input could not be turned into a revision
    InputRejected,
    /// Input stream exhausted
    StreamComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RevisionReceived => "REVISION_RECEIVED",
            Event::RevisionRouted => "REVISION_ROUTED",
            Event::ResurrectionDetected => "RESURRECTION_DETECTED",
            Event::PolicyLoaded => "POLICY_LOADED",
            Event::InputRejected => "INPUT_REJECTED",
            Event::StreamComplete => "STREAM_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

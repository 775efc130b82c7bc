//! Revision observers
//!
//! The hook reports each invocation twice: the raw inputs before
//! evaluation and the decision after. Observers are read-only; nothing
//! they do can change a decision.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use uuid::Uuid;

use crate::routing::{Decision, DocumentRevision, RevisionMetadata, RoutingPath};

use super::events::Event;
use super::logger::{Logger, Severity};

/// Sink for per-revision inputs and decisions.
pub trait RevisionObserver: Send + Sync {
    /// Called before evaluation with the raw inputs.
    fn revision_received(
        &self,
        invocation: Uuid,
        doc: &DocumentRevision,
        old_doc: Option<&DocumentRevision>,
        meta: &RevisionMetadata,
    );

    /// Called after evaluation with the decision.
    fn revision_routed(&self, invocation: Uuid, decision: &Decision);

    /// Called by host harnesses when input could not be read as a revision.
    fn input_rejected(&self, _reason: &str) {}
}

impl<O: RevisionObserver + ?Sized> RevisionObserver for Arc<O> {
    fn revision_received(
        &self,
        invocation: Uuid,
        doc: &DocumentRevision,
        old_doc: Option<&DocumentRevision>,
        meta: &RevisionMetadata,
    ) {
        (**self).revision_received(invocation, doc, old_doc, meta);
    }

    fn revision_routed(&self, invocation: Uuid, decision: &Decision) {
        (**self).revision_routed(invocation, decision);
    }

    fn input_rejected(&self, reason: &str) {
        (**self).input_rejected(reason);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RevisionObserver for NoopObserver {
    fn revision_received(
        &self,
        _invocation: Uuid,
        _doc: &DocumentRevision,
        _old_doc: Option<&DocumentRevision>,
        _meta: &RevisionMetadata,
    ) {
    }

    fn revision_routed(&self, _invocation: Uuid, _decision: &Decision) {}
}

/// Writes structured log lines through a [`Logger`].
///
/// Inputs are logged at TRACE, normal decisions at INFO, resurrections at
/// WARN.
#[derive(Debug)]
pub struct LogObserver {
    logger: Logger,
}

impl LogObserver {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl RevisionObserver for LogObserver {
    fn revision_received(
        &self,
        invocation: Uuid,
        doc: &DocumentRevision,
        old_doc: Option<&DocumentRevision>,
        meta: &RevisionMetadata,
    ) {
        if !self.logger.enabled(Severity::Trace) {
            return;
        }
        self.logger.trace(
            Event::RevisionReceived,
            &[
                ("invocation", json!(invocation.to_string())),
                ("doc", doc.to_value()),
                ("old_doc", old_doc.map_or(Value::Null, DocumentRevision::to_value)),
                ("meta", meta.to_value()),
            ],
        );
    }

    fn revision_routed(&self, invocation: Uuid, decision: &Decision) {
        let fields = [
            ("invocation", json!(invocation.to_string())),
            ("path", json!(decision.path().as_str())),
            ("channels", json!(decision.channel_list())),
            (
                "expiry",
                decision
                    .expiry
                    .as_ref()
                    .map_or(Value::Null, |e| json!(e.to_string())),
            ),
            ("short_circuited", json!(decision.short_circuited)),
        ];
        match decision.path() {
            RoutingPath::SoftDeleteResurrection => {
                self.logger.warn(Event::ResurrectionDetected, &fields)
            }
            RoutingPath::NormalRouting => self.logger.info(Event::RevisionRouted, &fields),
        }
    }

    fn input_rejected(&self, reason: &str) {
        self.logger
            .warn(Event::InputRejected, &[("reason", json!(reason))]);
    }
}

/// One recorded observer callback
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Received {
        invocation: Uuid,
        doc: DocumentRevision,
        old_doc: Option<DocumentRevision>,
        meta: RevisionMetadata,
    },
    Routed {
        invocation: Uuid,
        decision: Decision,
    },
}

impl Observation {
    pub fn invocation(&self) -> Uuid {
        match self {
            Observation::Received { invocation, .. } | Observation::Routed { invocation, .. } => {
                *invocation
            }
        }
    }
}

/// Keeps every callback in memory, in call order.
#[derive(Debug, Default)]
pub struct MemoryObserver {
    observations: Mutex<Vec<Observation>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn observations(&self) -> Vec<Observation> {
        self.observations
            .lock()
            .map(|o| o.clone())
            .unwrap_or_default()
    }

    /// Decisions only, in call order
    pub fn decisions(&self) -> Vec<Decision> {
        self.observations()
            .into_iter()
            .filter_map(|o| match o {
                Observation::Routed { decision, .. } => Some(decision),
                Observation::Received { .. } => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observations.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, observation: Observation) {
        if let Ok(mut observations) = self.observations.lock() {
            observations.push(observation);
        }
    }
}

impl RevisionObserver for MemoryObserver {
    fn revision_received(
        &self,
        invocation: Uuid,
        doc: &DocumentRevision,
        old_doc: Option<&DocumentRevision>,
        meta: &RevisionMetadata,
    ) {
        self.record(Observation::Received {
            invocation,
            doc: doc.clone(),
            old_doc: old_doc.cloned(),
            meta: meta.clone(),
        });
    }

    fn revision_routed(&self, invocation: Uuid, decision: &Decision) {
        self.record(Observation::Routed {
            invocation,
            decision: decision.clone(),
        });
    }
}

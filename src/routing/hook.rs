//! # Sync Hook
//!
//! Host-facing wrapper around the engine. Reads the clock once per
//! revision and reports inputs and decision to an observer. The decision
//! itself is exactly what [`RoutingDecisionEngine::evaluate`] returns.

use uuid::Uuid;

use crate::observability::{NoopObserver, RevisionObserver};

use super::clock::{Clock, SystemClock};
use super::decision::Decision;
use super::document::{DocumentRevision, PriorRevision, RevisionMetadata};
use super::engine::RoutingDecisionEngine;
use super::policy::ResurrectionPolicy;

/// Per-write routing hook invoked by the replication engine.
#[derive(Debug)]
pub struct SyncHook<C: Clock = SystemClock, O: RevisionObserver = NoopObserver> {
    engine: RoutingDecisionEngine,
    clock: C,
    observer: O,
}

impl SyncHook {
    /// Hook on the system clock with no observer.
    pub fn new(policy: ResurrectionPolicy) -> Self {
        Self {
            engine: RoutingDecisionEngine::new(policy),
            clock: SystemClock,
            observer: NoopObserver,
        }
    }
}

impl<C: Clock, O: RevisionObserver> SyncHook<C, O> {
    pub fn with_parts(engine: RoutingDecisionEngine, clock: C, observer: O) -> Self {
        Self {
            engine,
            clock,
            observer,
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> SyncHook<C2, O> {
        SyncHook {
            engine: self.engine,
            clock,
            observer: self.observer,
        }
    }

    pub fn with_observer<O2: RevisionObserver>(self, observer: O2) -> SyncHook<C, O2> {
        SyncHook {
            engine: self.engine,
            clock: self.clock,
            observer,
        }
    }

    pub fn engine(&self) -> &RoutingDecisionEngine {
        &self.engine
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Routes one revision.
    pub fn on_revision(
        &self,
        doc: &DocumentRevision,
        old_doc: Option<&PriorRevision>,
        meta: &RevisionMetadata,
    ) -> Decision {
        let invocation = Uuid::new_v4();
        self.observer.revision_received(invocation, doc, old_doc, meta);

        let now = self.clock.now();
        let decision = self.engine.evaluate(doc, old_doc, meta, now);

        self.observer.revision_routed(invocation, &decision);
        decision
    }
}

//! # Routing Decision Engine
//!
//! Evaluation order, first match wins:
//!
//! 1. No prior revision and a parseable `updatedAt` older than the window:
//!    force the cleanup channel and TTL, short-circuit. Age is measured in
//!    whole milliseconds and must strictly exceed the window.
//! 2. No prior revision but `updatedAt` missing or malformed: not a
//!    resurrection, fall through.
//! 3. Channels and expiry straight from the document.
//!
//! Evaluation is pure. `now` is supplied by the caller so identical
//! arguments always yield identical decisions.

use chrono::{DateTime, Utc};

use super::decision::Decision;
use super::document::{DocumentRevision, PriorRevision, RevisionMetadata};
use super::policy::ResurrectionPolicy;

/// Stateless per-revision evaluator bound to one policy.
///
/// Holds no mutable state; safe to share across threads without locking.
#[derive(Debug, Clone, Default)]
pub struct RoutingDecisionEngine {
    policy: ResurrectionPolicy,
}

impl RoutingDecisionEngine {
    pub fn new(policy: ResurrectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ResurrectionPolicy {
        &self.policy
    }

    /// Decides channels and expiry for a revision.
    pub fn evaluate(
        &self,
        doc: &DocumentRevision,
        old_doc: Option<&PriorRevision>,
        meta: &RevisionMetadata,
        now: DateTime<Utc>,
    ) -> Decision {
        evaluate(doc, old_doc, meta, now, &self.policy)
    }

    /// True when the revision would take the soft-delete branch.
    pub fn is_resurrection(
        &self,
        doc: &DocumentRevision,
        old_doc: Option<&PriorRevision>,
        now: DateTime<Utc>,
    ) -> bool {
        is_resurrection(doc, old_doc, now, &self.policy)
    }
}

/// Free-standing form of [`RoutingDecisionEngine::evaluate`].
///
/// `meta` is accepted for contract parity with the host and never read.
pub fn evaluate(
    doc: &DocumentRevision,
    old_doc: Option<&PriorRevision>,
    _meta: &RevisionMetadata,
    now: DateTime<Utc>,
    policy: &ResurrectionPolicy,
) -> Decision {
    if is_resurrection(doc, old_doc, now, policy) {
        return Decision::soft_delete(policy);
    }

    Decision::normal(doc.channels(), doc.expiry())
}

fn is_resurrection(
    doc: &DocumentRevision,
    old_doc: Option<&PriorRevision>,
    now: DateTime<Utc>,
    policy: &ResurrectionPolicy,
) -> bool {
    if old_doc.is_some() {
        return false;
    }

    // No timestamp evidence, no staleness verdict
    let Some(updated_at) = doc.updated_at() else {
        return false;
    };

    let age_ms = now.signed_duration_since(updated_at).num_milliseconds();
    age_ms > policy.window_ms()
}

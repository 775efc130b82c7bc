//! Routing subsystem
//!
//! Decides, for every incoming document revision:
//! - which replication channels it belongs to
//! - whether it carries an expiry
//! - whether it is a resurrection of a purged tombstone that must be
//!   forced into the cleanup channel with a short lifetime
//!
//! # Design Principles
//!
//! - Pure evaluation: no I/O, no shared mutable state
//! - Time is injected, never read implicitly by the engine
//! - Exactly one path per decision: soft-delete or normal
//! - Missing or malformed `updatedAt` is never evidence of staleness
//! - Document content never produces an error

mod clock;
mod decision;
mod document;
mod engine;
mod errors;
mod hook;
mod policy;

pub use clock::{Clock, FixedClock, SystemClock};
pub use decision::{Decision, Expiry, RoutingPath};
pub use document::{
    DocumentRevision, PriorRevision, RevisionMetadata, CHANNELS_FIELD, EXPIRY_FIELD,
    UPDATED_AT_FIELD,
};
pub use engine::{evaluate, RoutingDecisionEngine};
pub use errors::{RoutingError, RoutingResult};
pub use hook::SyncHook;
pub use policy::{ResurrectionPolicy, DEFAULT_SOFT_DELETE_CHANNEL};

//! syncroute - per-revision channel routing for document replication
//!
//! Decides, for each document revision written to a replicating store,
//! which channels it belongs to, what expiry it carries, and whether it
//! is a resurrected document that must be routed to a cleanup channel.

pub mod cli;
pub mod config;
pub mod observability;
pub mod routing;

//! # Routing Decisions
//!
//! The only output of the engine. The host applies `channels` and `expiry`
//! to the stored revision and skips its own routing when `short_circuited`
//! is set.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::policy::ResurrectionPolicy;

/// Expiry attached to a revision.
///
/// Values taken from a document are passed through uninterpreted; the host
/// owns validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expiry {
    /// Absolute timestamp string, e.g. `"2022-06-23T05:00:00+01:00"`
    Absolute(String),
    /// Relative TTL in seconds
    Relative(u64),
    /// Any other value found on the document
    Raw(Value),
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiry::Absolute(ts) => write!(f, "{}", ts),
            Expiry::Relative(secs) => write!(f, "{}s", secs),
            Expiry::Raw(value) => write!(f, "{}", value),
        }
    }
}

/// Which branch produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingPath {
    /// Orphan revision older than the window, forced into the cleanup channel
    SoftDeleteResurrection,
    /// Channels and expiry taken from the document
    NormalRouting,
}

impl RoutingPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingPath::SoftDeleteResurrection => "SOFT_DELETE_RESURRECTION",
            RoutingPath::NormalRouting => "NORMAL_ROUTING",
        }
    }
}

impl fmt::Display for RoutingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Channels and expiry for one revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub channels: BTreeSet<String>,
    pub expiry: Option<Expiry>,
    pub short_circuited: bool,
}

impl Decision {
    /// No channels, no expiry, normal path.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn normal(channels: BTreeSet<String>, expiry: Option<Expiry>) -> Self {
        Self {
            channels,
            expiry,
            short_circuited: false,
        }
    }

    /// The cleanup routing applied to a resurrected revision.
    pub fn soft_delete(policy: &ResurrectionPolicy) -> Self {
        let mut channels = BTreeSet::new();
        channels.insert(policy.soft_delete_channel().to_string());
        Self {
            channels,
            expiry: Some(Expiry::Relative(policy.soft_delete_ttl_secs())),
            short_circuited: true,
        }
    }

    pub fn path(&self) -> RoutingPath {
        if self.short_circuited {
            RoutingPath::SoftDeleteResurrection
        } else {
            RoutingPath::NormalRouting
        }
    }

    /// Channel names joined with commas, for log fields.
    pub fn channel_list(&self) -> String {
        self.channels.iter().map(String::as_str).collect::<Vec<_>>().join(",")
    }
}

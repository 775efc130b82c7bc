//! # Resurrection Policy
//!
//! Thresholds for resurrection detection and the cleanup routing applied
//! when it fires. Immutable once built; share it by reference or `Arc`.

use chrono::Duration;

use super::errors::{RoutingError, RoutingResult};

/// Cleanup channel used by both built-in profiles
pub const DEFAULT_SOFT_DELETE_CHANNEL: &str = "soft_deleted";

/// Resurrection detection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResurrectionPolicy {
    window: Duration,
    soft_delete_channel: String,
    soft_delete_ttl: Duration,
}

impl ResurrectionPolicy {
    /// Builds a validated policy.
    ///
    /// # Errors
    ///
    /// - window is zero or negative
    /// - channel name is empty
    /// - ttl is not a positive whole number of seconds
    pub fn new(
        window: Duration,
        soft_delete_channel: impl Into<String>,
        soft_delete_ttl: Duration,
    ) -> RoutingResult<Self> {
        let soft_delete_channel = soft_delete_channel.into();

        if window <= Duration::zero() {
            return Err(RoutingError::InvalidPolicy(format!(
                "window must be positive, got {}ms",
                window.num_milliseconds()
            )));
        }
        if soft_delete_channel.trim().is_empty() {
            return Err(RoutingError::InvalidPolicy(
                "soft delete channel must not be empty".into(),
            ));
        }
        if soft_delete_ttl <= Duration::zero() {
            return Err(RoutingError::InvalidPolicy(format!(
                "soft delete ttl must be positive, got {}s",
                soft_delete_ttl.num_seconds()
            )));
        }
        if soft_delete_ttl != Duration::seconds(soft_delete_ttl.num_seconds()) {
            return Err(RoutingError::InvalidPolicy(
                "soft delete ttl must be a whole number of seconds".into(),
            ));
        }

        Ok(Self {
            window,
            soft_delete_channel,
            soft_delete_ttl,
        })
    }

    /// One hour window, six month cleanup TTL.
    pub fn production() -> Self {
        Self {
            window: Duration::hours(1),
            soft_delete_channel: DEFAULT_SOFT_DELETE_CHANNEL.to_string(),
            soft_delete_ttl: Duration::days(180),
        }
    }

    /// One hour window, five minute cleanup TTL.
    pub fn testing() -> Self {
        Self {
            window: Duration::hours(1),
            soft_delete_channel: DEFAULT_SOFT_DELETE_CHANNEL.to_string(),
            soft_delete_ttl: Duration::minutes(5),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn window_ms(&self) -> i64 {
        self.window.num_milliseconds()
    }

    pub fn soft_delete_channel(&self) -> &str {
        &self.soft_delete_channel
    }

    pub fn soft_delete_ttl(&self) -> Duration {
        self.soft_delete_ttl
    }

    pub fn soft_delete_ttl_secs(&self) -> u64 {
        // Positive by construction
        self.soft_delete_ttl.num_seconds().max(0) as u64
    }
}

impl Default for ResurrectionPolicy {
    fn default() -> Self {
        Self::production()
    }
}

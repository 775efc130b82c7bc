//! Configuration subsystem
//!
//! Loads the router configuration file and turns it into an immutable
//! [`ResurrectionPolicy`](crate::routing::ResurrectionPolicy).
//!
//! - JSON only, unknown keys rejected
//! - Validated before use; an invalid file never yields a policy
//! - Loaded once at startup, read-only afterwards

mod errors;
mod router;

pub use errors::{ConfigError, ConfigResult};
pub use router::{PolicyProfile, RouterConfig};

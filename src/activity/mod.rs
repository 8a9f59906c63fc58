// Contribution activity lookups against the external contributions service

pub mod client;
pub mod payload;

pub use client::{ActivityClient, ContributionsApiClient};
pub use payload::parse_activity;

#[cfg(test)]
pub use client::MockActivityClient;

/// Why an activity lookup failed. Never retried by callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    /// The service answered with a non-200 status for this identity
    #[error("{0} is not known to the contributions service")]
    NotFound(String),

    /// Transport failure, including timeouts
    #[error("contributions lookup failed: {0}")]
    LookupFailed(String),

    #[error("malformed contributions payload: {0}")]
    Malformed(String),
}

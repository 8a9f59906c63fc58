use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

/// Group member as resolved from the user table, fixed for one ranking run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub identity: String,
    pub group: String,
    pub registered_at: DateTime<FixedOffset>,
}

/// One day of contributions reported by the activity service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub count: u64,
}

/// Member with experience and level derived, not yet ranked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedMember {
    pub identity: String,
    pub group: String,
    pub experience: u64,
    pub level: u64,
}

/// Leaderboard row. Only built by the ranking pass, which fixes order and rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub identity: String,
    pub group: String,
    pub experience: u64,
    pub level: u64,
    pub rank: u32,
}

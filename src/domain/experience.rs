use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::models::ActivityDay;

pub const EXPERIENCE_PER_LEVEL: u64 = 10;

/// Day from which contributions count toward experience.
///
/// Contribution days carry no timezone, so the registration offset is dropped
/// rather than converted: `2023-06-01T01:00:00+09:00` starts on 2023-06-01.
pub fn registration_cutoff(registered_at: &DateTime<FixedOffset>) -> NaiveDate {
    registered_at.date_naive()
}

/// Sum of contributions on or after the registration day
pub fn compute_experience(registered_at: &DateTime<FixedOffset>, activity: &[ActivityDay]) -> u64 {
    let cutoff = registration_cutoff(registered_at);

    activity
        .iter()
        .filter(|day| cutoff <= day.date)
        .fold(0u64, |total, day| total.saturating_add(day.count))
}

pub fn compute_level(experience: u64) -> u64 {
    experience / EXPERIENCE_PER_LEVEL
}

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::internal::Member;

/// Item stored in the user table.
///
/// `userName` is the partition key and `groupName` backs the group index.
/// `registerDate` keeps the offset the user registered with, e.g.
/// `2023-06-01T19:52:21+09:00`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_name: String,
    pub group_name: String,
    pub register_date: String,
}

impl UserRecord {
    pub fn new(
        user_name: impl Into<String>,
        group_name: impl Into<String>,
        registered_at: DateTime<chrono::FixedOffset>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            group_name: group_name.into(),
            register_date: registered_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
        }
    }

    /// Parse the stored registration date and build the ranking-side view
    pub fn to_member(&self) -> Result<Member, chrono::ParseError> {
        let registered_at = DateTime::parse_from_rfc3339(&self.register_date)?;

        Ok(Member {
            identity: self.user_name.clone(),
            group: self.group_name.clone(),
            registered_at,
        })
    }
}

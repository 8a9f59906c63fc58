use serde::{Deserialize, Serialize};

use super::internal::RankedEntry;
use super::record::UserRecord;

/// Body of `POST /users`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    pub user_name: String,
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    pub user_name: String,
    pub group_name: String,
}

impl From<UserRecord> for UserGroup {
    fn from(record: UserRecord) -> Self {
        Self {
            user_name: record.user_name,
            group_name: record.group_name,
        }
    }
}

/// Envelope echoing the request method next to the result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodResponse<T> {
    pub request_method: String,
    pub result: T,
}

impl<T> MethodResponse<T> {
    pub fn new(request_method: impl Into<String>, result: T) -> Self {
        Self {
            request_method: request_method.into(),
            result,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupUsersResponse {
    pub group_name: String,
    pub users: Vec<UserRecord>,
}

/// Leaderboard row as returned to the web app - field order is part of the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntryResponse {
    pub user_name: String,
    pub group_name: String,
    pub rank: u32,
    pub exp: u64,
    pub lv: u64,
}

impl From<RankedEntry> for RankingEntryResponse {
    fn from(entry: RankedEntry) -> Self {
        Self {
            user_name: entry.identity,
            group_name: entry.group,
            rank: entry.rank,
            exp: entry.experience,
            lv: entry.level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResponse {
    pub ranking: Vec<RankingEntryResponse>,
}

impl RankingResponse {
    pub fn from_entries(entries: Vec<RankedEntry>) -> Self {
        Self {
            ranking: entries.into_iter().map(RankingEntryResponse::from).collect(),
        }
    }
}

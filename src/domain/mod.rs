// Domain layer - ranking and user logic with no HTTP concerns
// Handlers call into these modules; stores and the activity client are passed in

pub mod experience;
pub mod ranking;
pub mod roster;
pub mod users;

use crate::db::StoreError;

// Domain error type - no HTTP concerns
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Unknown identity: {0}")]
    UnknownIdentity(String),

    #[error(transparent)]
    Ranking(#[from] ranking::RankingError),

    #[error("Activity service error: {0}")]
    ActivityService(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(name) => DomainError::MemberNotFound(name),
            StoreError::AlreadyExists(name) => DomainError::UserAlreadyExists(name),
            StoreError::InvalidData(msg) | StoreError::Backend(msg) => DomainError::Store(msg),
            StoreError::Serialization(e) => DomainError::Internal(e.to_string()),
        }
    }
}

// Re-export commonly used types and functions
pub use experience::{compute_experience, compute_level};
pub use ranking::{build_ranking, calculate_ranking_for, rank_members, RankingError};
pub use roster::{resolve_group_members, RosterKey};
pub use users::{delete_user, get_user_group, list_group_users, register_user};

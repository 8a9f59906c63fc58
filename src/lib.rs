pub mod activity;
pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod models;

// Re-export commonly used types
pub use models::{
    EnrichedMember, Member, RankedEntry, RankingResponse, UserRecord,
};

pub use activity::{ActivityClient, ActivityError, ContributionsApiClient};

pub use config::{AppConfig, ConfigError};

pub use db::{DynamoUserStore, InMemoryUserStore, StoreError, UserStore};

pub use domain::{build_ranking, calculate_ranking_for, rank_members, DomainError, RankingError, RosterKey};

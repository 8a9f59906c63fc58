use chrono::FixedOffset;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_AWS_REGION: &str = "ap-northeast-1";
pub const DEFAULT_USER_TABLE_NAME: &str = "userGroup";
pub const DEFAULT_GROUP_INDEX_NAME: &str = "GSI-groupName";
pub const DEFAULT_ACTIVITY_API_BASE_URL: &str = "https://github-contributions-api.deno.dev";
pub const DEFAULT_ACTIVITY_API_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 4;
pub const DEFAULT_REGISTRATION_UTC_OFFSET_HOURS: i32 = 9;
// JST, the offset registration dates have always been written with
const DEFAULT_REGISTRATION_OFFSET: FixedOffset =
    match FixedOffset::east_opt(DEFAULT_REGISTRATION_UTC_OFFSET_HOURS * 3600) {
        Some(offset) => offset,
        None => panic!("default registration offset out of range"),
    };
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "https://demetara.vercel.app";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Where user records live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    /// Process-local map, for running without DynamoDB
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub region: String,
    /// Overrides the regional endpoint, e.g. `http://dynamodb:8000` for DynamoDB Local
    pub endpoint: Option<String>,
    pub table_name: String,
    pub group_index_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Everything the service needs at startup, resolved once and passed down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub activity: ActivityConfig,
    pub max_concurrent_lookups: usize,
    pub registration_offset: FixedOffset,
    pub cors_allowed_origin: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                backend: StoreBackend::DynamoDb,
                region: DEFAULT_AWS_REGION.to_string(),
                endpoint: None,
                table_name: DEFAULT_USER_TABLE_NAME.to_string(),
                group_index_name: DEFAULT_GROUP_INDEX_NAME.to_string(),
            },
            activity: ActivityConfig {
                base_url: DEFAULT_ACTIVITY_API_BASE_URL.to_string(),
                timeout: Duration::from_secs(DEFAULT_ACTIVITY_API_TIMEOUT_SECS),
            },
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            registration_offset: DEFAULT_REGISTRATION_OFFSET,
            cors_allowed_origin: DEFAULT_CORS_ALLOWED_ORIGIN.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any name -> value source, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let backend = match get("USER_STORE_BACKEND").as_deref() {
            None | Some("dynamodb") => StoreBackend::DynamoDb,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "USER_STORE_BACKEND",
                    reason: format!("expected `dynamodb` or `memory`, got `{}`", other),
                })
            }
        };

        let store = StoreConfig {
            backend,
            region: get("AWS_REGION").unwrap_or(defaults.store.region),
            endpoint: get("DYNAMODB_ENDPOINT"),
            table_name: get("USER_TABLE_NAME").unwrap_or(defaults.store.table_name),
            group_index_name: get("GROUP_INDEX_NAME").unwrap_or(defaults.store.group_index_name),
        };

        let timeout_secs = parse_or(
            "ACTIVITY_API_TIMEOUT_SECS",
            get("ACTIVITY_API_TIMEOUT_SECS"),
            DEFAULT_ACTIVITY_API_TIMEOUT_SECS,
        )?;
        let activity = ActivityConfig {
            base_url: get("ACTIVITY_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.activity.base_url),
            timeout: Duration::from_secs(timeout_secs),
        };

        let max_concurrent_lookups = parse_or(
            "RANKING_MAX_CONCURRENT_LOOKUPS",
            get("RANKING_MAX_CONCURRENT_LOOKUPS"),
            DEFAULT_MAX_CONCURRENT_LOOKUPS,
        )?;
        if max_concurrent_lookups == 0 {
            return Err(ConfigError::InvalidValue {
                name: "RANKING_MAX_CONCURRENT_LOOKUPS",
                reason: "must be at least 1".to_string(),
            });
        }

        let offset_hours = parse_or(
            "REGISTRATION_UTC_OFFSET_HOURS",
            get("REGISTRATION_UTC_OFFSET_HOURS"),
            DEFAULT_REGISTRATION_UTC_OFFSET_HOURS,
        )?;

        let config = Self {
            store,
            activity,
            max_concurrent_lookups,
            registration_offset: offset_from_hours("REGISTRATION_UTC_OFFSET_HOURS", offset_hours)?,
            cors_allowed_origin: get("CORS_ALLOWED_ORIGIN").unwrap_or(defaults.cors_allowed_origin),
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
        };

        info!(
            table = %config.store.table_name,
            region = %config.store.region,
            endpoint = ?config.store.endpoint,
            backend = ?config.store.backend,
            "Loaded configuration"
        );

        Ok(config)
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            name,
            reason: format!("`{}`: {}", value, e),
        }),
    }
}

fn offset_from_hours(name: &'static str, hours: i32) -> Result<FixedOffset, ConfigError> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ConfigError::InvalidValue {
            name,
            reason: format!("{} hours is not a valid UTC offset", hours),
        })
}

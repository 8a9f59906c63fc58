use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::activity::ActivityError;
use crate::domain::{DomainError, RankingError};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// The request named something the contributions service does not know
    UnprocessableEntity(String),
    /// A group member's activity could not be found, so no ranking was built
    ActivityLookupFailed(String),
    /// The contributions service could not be reached or answered badly
    BadGateway(String),
    Internal(String),
    Database(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::UnprocessableEntity(msg) => write!(f, "Unprocessable entity: {}", msg),
            ApiError::ActivityLookupFailed(msg) => write!(f, "Activity lookup failed: {}", msg),
            ApiError::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable_entity", msg)
            }
            ApiError::ActivityLookupFailed(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "activity_lookup_failed", msg)
            }
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ApiError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error", msg),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MemberNotFound(name) => {
                ApiError::NotFound(format!("userName {} not found", name))
            }
            DomainError::UserAlreadyExists(name) => {
                ApiError::Conflict(format!("userName {} already exists", name))
            }
            DomainError::UnknownIdentity(name) => {
                ApiError::UnprocessableEntity(format!("userName {} is not found in GitHub", name))
            }
            DomainError::Ranking(err) => err.into(),
            DomainError::ActivityService(msg) => ApiError::BadGateway(msg),
            DomainError::Store(msg) => ApiError::Database(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<RankingError> for ApiError {
    fn from(err: RankingError) -> Self {
        let message = err.to_string();
        match err {
            RankingError::ActivityLookupFailed { source, .. } => match source {
                ActivityError::NotFound(_) => ApiError::ActivityLookupFailed(message),
                ActivityError::LookupFailed(_) => ApiError::BadGateway(message),
                ActivityError::Malformed(_) => ApiError::Internal(message),
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_failed(source: ActivityError) -> ApiError {
        DomainError::Ranking(RankingError::ActivityLookupFailed {
            identity: "bob".to_string(),
            source,
        })
        .into()
    }

    #[test]
    fn test_ranking_failures_name_the_identity() {
        match lookup_failed(ActivityError::NotFound("bob".to_string())) {
            ApiError::ActivityLookupFailed(msg) => assert!(msg.contains("bob")),
            other => panic!("unexpected mapping: {:?}", other),
        }
        assert!(matches!(
            lookup_failed(ActivityError::LookupFailed("timed out".to_string())),
            ApiError::BadGateway(msg) if msg.contains("bob")
        ));
        assert!(matches!(
            lookup_failed(ActivityError::Malformed("eof".to_string())),
            ApiError::Internal(msg) if msg.contains("bob")
        ));
    }

    #[test]
    fn test_not_found_and_conflict_are_distinct() {
        let not_found: ApiError = DomainError::MemberNotFound("octocat".to_string()).into();
        let conflict: ApiError = DomainError::UserAlreadyExists("octocat".to_string()).into();

        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);
    }
}

// User registration and lookup handlers

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::api::utils::{is_valid_group_name, is_valid_identity};
use crate::domain;
use crate::models::{GroupUsersResponse, MethodResponse, RegisterUserPayload, UserGroup};

const SUCCESS: &str = "success";

fn validate_user_name(user_name: &str) -> ApiResult<()> {
    if is_valid_identity(user_name) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Invalid userName: {:?}", user_name)))
    }
}

fn validate_group_name(group_name: &str) -> ApiResult<()> {
    if is_valid_group_name(group_name) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Invalid groupName: {:?}", group_name)))
    }
}

#[tracing::instrument(
    skip(state, payload),
    fields(user_name = %payload.user_name, group_name = %payload.group_name)
)]
pub async fn register_user_handler(
    State(state): State<AppState>,
    method: Method,
    Json(payload): Json<RegisterUserPayload>,
) -> ApiResult<(StatusCode, Json<MethodResponse<&'static str>>)> {
    info!("Processing register user request");

    // 1. Input validation
    validate_user_name(&payload.user_name)?;
    validate_group_name(&payload.group_name)?;

    // 2. Register, stamped with the current time in the configured offset
    let registered_at = Utc::now().with_timezone(&state.config.registration_offset);
    domain::register_user(
        &payload.user_name,
        &payload.group_name,
        registered_at,
        state.store.as_ref(),
        state.activity.as_ref(),
    )
    .await?;

    // 3. Transform
    Ok((
        StatusCode::CREATED,
        Json(MethodResponse::new(method.as_str(), SUCCESS)),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn get_user_handler(
    State(state): State<AppState>,
    method: Method,
    Path(user_name): Path<String>,
) -> ApiResult<Json<MethodResponse<UserGroup>>> {
    info!("Processing get user request");

    validate_user_name(&user_name)?;

    let record = domain::get_user_group(&user_name, state.store.as_ref()).await?;

    Ok(Json(MethodResponse::new(method.as_str(), UserGroup::from(record))))
}

#[tracing::instrument(skip(state))]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    method: Method,
    Path(user_name): Path<String>,
) -> ApiResult<Json<MethodResponse<&'static str>>> {
    info!("Processing delete user request");

    validate_user_name(&user_name)?;

    domain::delete_user(&user_name, state.store.as_ref()).await?;

    Ok(Json(MethodResponse::new(method.as_str(), SUCCESS)))
}

#[tracing::instrument(skip(state))]
pub async fn list_group_users_handler(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> ApiResult<Json<GroupUsersResponse>> {
    info!("Processing list group users request");

    validate_group_name(&group_name)?;

    let users = domain::list_group_users(&group_name, state.store.as_ref()).await?;
    info!(user_count = users.len(), "Listed group users");

    Ok(Json(GroupUsersResponse { group_name, users }))
}

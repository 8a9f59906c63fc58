// Leaderboard handlers - both resolve a roster and hand it to the shared ranking logic

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::api::utils::{is_valid_group_name, is_valid_identity};
use crate::domain::{self, RosterKey};
use crate::models::RankingResponse;

async fn ranking_response(state: &AppState, key: RosterKey<'_>) -> ApiResult<Json<RankingResponse>> {
    let entries = domain::calculate_ranking_for(
        key,
        state.store.as_ref(),
        state.activity.as_ref(),
        state.config.max_concurrent_lookups,
    )
    .await?;

    info!(entry_count = entries.len(), "Ranking calculated");
    Ok(Json(RankingResponse::from_entries(entries)))
}

/// Ranking of the group the given user belongs to
#[tracing::instrument(skip(state))]
pub async fn user_ranking_handler(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> ApiResult<Json<RankingResponse>> {
    info!("Processing user ranking request");

    if !is_valid_identity(&user_name) {
        return Err(ApiError::BadRequest(format!("Invalid userName: {:?}", user_name)));
    }

    ranking_response(&state, RosterKey::Identity(&user_name)).await
}

#[tracing::instrument(skip(state))]
pub async fn group_ranking_handler(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> ApiResult<Json<RankingResponse>> {
    info!("Processing group ranking request");

    if !is_valid_group_name(&group_name) {
        return Err(ApiError::BadRequest(format!("Invalid groupName: {:?}", group_name)));
    }

    ranking_response(&state, RosterKey::Group(&group_name)).await
}

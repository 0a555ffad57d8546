use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use hultagram_types::FollowResponse;

use crate::{
    api::{parse_id, ApiResult},
    auth::require_user,
    services::engagement,
    state::AppState,
};

/// POST /follows/:user_id - Follow a user
pub async fn follow_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<FollowResponse>> {
    let followed_id = parse_id(&user_id, "user")?;
    let follower_id = require_user(&state, &headers)?;

    state
        .db
        .transaction(|tx| engagement::follow(tx, follower_id, followed_id))?;

    Ok(Json(FollowResponse {
        followed_id,
        following: true,
    }))
}

/// DELETE /follows/:user_id - Stop following a user
pub async fn unfollow_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<FollowResponse>> {
    let followed_id = parse_id(&user_id, "user")?;
    let follower_id = require_user(&state, &headers)?;

    state
        .db
        .transaction(|tx| engagement::unfollow(tx, follower_id, followed_id))?;

    Ok(Json(FollowResponse {
        followed_id,
        following: false,
    }))
}

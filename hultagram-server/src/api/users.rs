use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;

use hultagram_types::{AuthResponse, ProfileView, RegisterRequest, UserSummary};

use crate::{
    api::ApiResult,
    auth::require_user,
    services::{access, accounts, feed},
    state::AppState,
};

/// POST /users - Create an account and start a session for it
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let cost = state.bcrypt_cost;
    let user = state.db.transaction(|tx| {
        accounts::register(tx, &payload.username, &payload.email, &payload.password, cost)
    })?;

    let session_token = state.session_manager.create_session(user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user,
            session_token,
        }),
    ))
}

/// GET /users/:username - Profile page
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<ProfileView>> {
    let viewer_id = require_user(&state, &headers)?;

    let profile = state
        .db
        .read(|conn| feed::get_profile(conn, &username, viewer_id))?;

    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /search?q=query - Find users whose username contains the query
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let mode = state.search_mode;
    let users = state
        .db
        .read(|conn| access::find_users_by_username(conn, &query.q, mode))?;

    Ok(Json(users))
}

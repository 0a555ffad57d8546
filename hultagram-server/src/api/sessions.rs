use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};

use hultagram_types::{AuthResponse, LoginRequest};

use crate::{
    api::{ApiError, ApiResult},
    auth::{require_user, session_token},
    services::accounts,
    state::AppState,
};

/// POST /sessions - Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state
        .db
        .read(|conn| accounts::authenticate(conn, &payload.email, &payload.password))?;

    let session_token = state.session_manager.create_session(user.id)?;

    tracing::info!("User {} logged in", user.id);
    Ok(Json(AuthResponse {
        user,
        session_token,
    }))
}

/// DELETE /sessions - Log out the current session
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let user_id = require_user(&state, &headers)?;
    let token = session_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

    state.session_manager.delete_session(token)?;

    tracing::info!("User {} logged out", user_id);
    Ok(StatusCode::NO_CONTENT)
}

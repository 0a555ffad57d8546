use axum::http::HeaderMap;

use hultagram_types::UserId;

use crate::api::ApiError;
use crate::state::AppState;

/// Header carrying the opaque session token
pub const SESSION_HEADER: &str = "X-Session-Token";

/// Extract the raw session token, if the client sent one
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

/// Extract user ID from session token header
pub fn require_user(state: &AppState, headers: &HeaderMap) -> Result<UserId, ApiError> {
    let token = session_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

    state
        .get_authenticated_user_id_from_token(token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid session token".to_string()))
}

/// Extract optional user ID from session token header (for public endpoints)
pub fn optional_user(state: &AppState, headers: &HeaderMap) -> Option<UserId> {
    let token = session_token(headers)?;
    state.get_authenticated_user_id_from_token(token)
}

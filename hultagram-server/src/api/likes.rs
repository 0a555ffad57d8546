use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use hultagram_types::LikeToggleResponse;

use crate::{
    api::{parse_id, ApiResult},
    auth::require_user,
    db::repositories::LikeRepository,
    services::{engagement, ServiceError},
    state::AppState,
};

/// POST /likes/:post_id - Like the post, or take the like back
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<LikeToggleResponse>> {
    let post_id = parse_id(&post_id, "post")?;
    let user_id = require_user(&state, &headers)?;

    let (like_state, like_count) = state.db.transaction(|tx| {
        let like_state = engagement::toggle_like(tx, user_id, post_id)?;
        let like_count = LikeRepository::new(tx).count_for_post(post_id)?;
        Ok::<_, ServiceError>((like_state, like_count))
    })?;

    Ok(Json(LikeToggleResponse {
        post_id,
        state: like_state,
        like_count,
    }))
}

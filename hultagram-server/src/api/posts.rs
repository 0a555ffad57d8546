use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use hultagram_types::{
    Comment, CreateCommentRequest, CreatePostRequest, Post, PostDetail, UpdatePostRequest,
};

use crate::{
    api::{parse_id, ApiResult},
    auth::{optional_user, require_user},
    services::{access, accounts, feed},
    state::AppState,
};

/// GET / - All posts, newest first
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    let posts = state.db.read(|conn| feed::list_posts(conn))?;
    Ok(Json(posts))
}

/// POST /posts - Create a new post
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let user_id = require_user(&state, &headers)?;

    let post = state.db.transaction(|tx| {
        accounts::create_post(tx, user_id, &payload.image_ref, payload.caption.as_deref())
    })?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts/:id - Post with comments, likers and the viewer's follow set
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<PostDetail>> {
    let post_id = parse_id(&post_id, "post")?;
    let viewer_id = optional_user(&state, &headers);

    let detail = state
        .db
        .read(|conn| feed::get_post_detail(conn, post_id, viewer_id))?;

    Ok(Json(detail))
}

/// PUT /posts/:id - Edit the caption (author only)
pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdatePostRequest>,
) -> ApiResult<Json<Post>> {
    let post_id = parse_id(&post_id, "post")?;
    let user_id = require_user(&state, &headers)?;

    let post = state.db.transaction(|tx| {
        access::edit_post(tx, post_id, user_id, payload.caption.as_deref())
    })?;

    Ok(Json(post))
}

/// POST /posts/:id/comments - Comment on a post
pub async fn add_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let post_id = parse_id(&post_id, "post")?;
    let user_id = require_user(&state, &headers)?;

    let comment = state.db.transaction(|tx| {
        feed::add_comment(tx, post_id, user_id, payload.content.as_deref())
    })?;

    Ok((StatusCode::CREATED, Json(comment)))
}

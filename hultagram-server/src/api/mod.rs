pub mod error;
pub mod follows;
pub mod likes;
pub mod posts;
pub mod sessions;
pub mod users;

pub use error::{ApiError, ApiResult};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Build the application router with every public endpoint
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Feed and post routes
        .route("/", get(posts::list_posts))
        .route("/posts", post(posts::create_post))
        .route("/posts/:id", get(posts::get_post).put(posts::update_post))
        .route("/posts/:id/comments", post(posts::add_comment))
        .route("/likes/:post_id", post(likes::toggle_like))
        // Accounts and sessions
        .route("/users", post(users::register))
        .route("/users/:username", get(users::get_profile))
        .route("/sessions", post(sessions::login).delete(sessions::logout))
        // Social graph
        .route("/follows/:user_id", post(follows::follow_user).delete(follows::unfollow_user))
        .route("/search", get(users::search_users))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Parse a numeric path segment
pub(crate) fn parse_id(raw: &str, what: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} ID", what)))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::enums::LikeState;

pub type UserId = i64;
pub type PostId = i64;
pub type CommentId = i64;

/// Profile picture assigned to accounts that never uploaded one.
pub const DEFAULT_PROFILE_PICTURE: &str = "default.png";

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// bcrypt hash; never leaves the server
    #[serde(skip)]
    pub password_hash: String,
    pub profile_picture: String,
    #[serde(with = "datetime_format")]
    pub joined_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }
}

/// The public face of a user, as shown in lists and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub profile_picture: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub author_username: String,
    pub image_ref: String,
    pub caption: Option<String>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub author_username: String,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: i64,
    pub user_id: UserId,
    pub post_id: PostId,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

/// Directed edge: `follower_id` follows `followed_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    pub id: i64,
    pub follower_id: UserId,
    pub followed_id: UserId,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

/// A post together with everything the detail page shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    /// Oldest first
    pub comments: Vec<Comment>,
    pub liked_users: BTreeSet<UserId>,
    pub like_count: usize,
    /// Users the viewer follows; empty for anonymous viewers
    pub followed_users: BTreeSet<UserId>,
    pub viewer_has_liked: bool,
    pub viewer_follows_author: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub user: UserSummary,
    #[serde(with = "datetime_format")]
    pub joined_at: DateTime<Utc>,
    pub followed_users: Vec<UserSummary>,
    pub posts: Vec<Post>,
    pub follower_count: usize,
    pub following_count: usize,
    pub viewer_follows: bool,
    pub is_self: bool,
}

// Request/Response types for API
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub session_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub image_ref: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeToggleResponse {
    pub post_id: PostId,
    pub state: LikeState,
    pub like_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FollowResponse {
    pub followed_id: UserId,
    pub following: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

use chrono::Utc;
use rusqlite::Connection;

use hultagram_types::{Like, LikeState, PostId, UserId};

use crate::db::repositories::{FollowRepository, LikeRepository, PostRepository, UserRepository};
use crate::services::{ServiceError, ServiceResult};

/// Flip the like state of `(user_id, post_id)`.
///
/// Delete first: if a row went away the post is now unliked. Otherwise insert
/// with `ON CONFLICT DO NOTHING`; the pair stays unique either way.
pub fn toggle_like(conn: &Connection, user_id: UserId, post_id: PostId) -> ServiceResult<LikeState> {
    if !PostRepository::new(conn).exists(post_id)? {
        return Err(ServiceError::not_found("Post"));
    }

    let likes = LikeRepository::new(conn);
    let state = if likes.remove(user_id, post_id)? > 0 {
        LikeState::Unliked
    } else {
        likes.insert_if_absent(user_id, post_id, Utc::now())?;
        LikeState::Liked
    };

    tracing::info!("User {} {} post {}", user_id, state.as_str(), post_id);
    Ok(state)
}

/// Materialised likes for a post, oldest first
pub fn likes_for_post(conn: &Connection, post_id: PostId) -> ServiceResult<Vec<Like>> {
    if !PostRepository::new(conn).exists(post_id)? {
        return Err(ServiceError::not_found("Post"));
    }
    Ok(LikeRepository::new(conn).for_post(post_id)?)
}

/// Create the edge `follower_id -> followed_id`. Following twice is a no-op.
pub fn follow(conn: &Connection, follower_id: UserId, followed_id: UserId) -> ServiceResult<()> {
    if follower_id == followed_id {
        return Err(ServiceError::InvalidOperation(
            "You cannot follow yourself".to_string(),
        ));
    }
    if !UserRepository::new(conn).exists(followed_id)? {
        return Err(ServiceError::not_found("User"));
    }

    let inserted = FollowRepository::new(conn).follow(follower_id, followed_id, Utc::now())?;
    if inserted > 0 {
        tracing::info!("User {} now follows {}", follower_id, followed_id);
    } else {
        tracing::debug!("User {} already follows {}", follower_id, followed_id);
    }
    Ok(())
}

/// Remove the edge if present. Returns whether anything was removed.
pub fn unfollow(conn: &Connection, follower_id: UserId, followed_id: UserId) -> ServiceResult<bool> {
    if !UserRepository::new(conn).exists(followed_id)? {
        return Err(ServiceError::not_found("User"));
    }

    let removed = FollowRepository::new(conn).unfollow(follower_id, followed_id)? > 0;
    if removed {
        tracing::info!("User {} unfollowed {}", follower_id, followed_id);
    }
    Ok(removed)
}

pub fn is_following(conn: &Connection, follower_id: UserId, followed_id: UserId) -> ServiceResult<bool> {
    Ok(FollowRepository::new(conn).is_following(follower_id, followed_id)?)
}

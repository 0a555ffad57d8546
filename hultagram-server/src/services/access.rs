use rusqlite::Connection;

use hultagram_types::{Owned, Post, PostId, SearchMode, UserId, UserSummary};

use crate::db::repositories::{PostRepository, UserRepository};
use crate::services::{ServiceError, ServiceResult};

/// Only the author may edit a post
pub fn can_edit_post(post: &Post, user_id: UserId) -> bool {
    post.is_owned_by(user_id)
}

pub fn ensure_can_edit_post(post: &Post, user_id: UserId) -> ServiceResult<()> {
    if can_edit_post(post, user_id) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "Only the author can edit this post".to_string(),
        ))
    }
}

/// Replace the caption of a post owned by `user_id`.
///
/// A blank caption clears it.
pub fn edit_post(
    conn: &Connection,
    post_id: PostId,
    user_id: UserId,
    caption: Option<&str>,
) -> ServiceResult<Post> {
    let posts = PostRepository::new(conn);
    let post = posts
        .get_by_id(post_id)?
        .ok_or_else(|| ServiceError::not_found("Post"))?;

    if let Err(err) = ensure_can_edit_post(&post, user_id) {
        tracing::warn!("User {} tried to edit post {} owned by {}", user_id, post_id, post.user_id);
        return Err(err);
    }

    let caption = caption.map(str::trim).filter(|c| !c.is_empty());
    posts.update_caption(post_id, caption)?;
    tracing::info!("User {} edited post {}", user_id, post_id);

    Ok(Post {
        caption: caption.map(str::to_string),
        ..post
    })
}

/// Username substring search. A blank query matches nobody.
pub fn find_users_by_username(
    conn: &Connection,
    query: &str,
    mode: SearchMode,
) -> ServiceResult<Vec<UserSummary>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let users = UserRepository::new(conn).search_by_username(query, mode)?;
    tracing::debug!("Search {:?} ({}) matched {} users", query, mode.as_str(), users.len());
    Ok(users.iter().map(|u| u.summary()).collect())
}

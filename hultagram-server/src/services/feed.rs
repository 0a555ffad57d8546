use chrono::Utc;
use rusqlite::Connection;
use std::collections::BTreeSet;

use hultagram_types::{Comment, Post, PostDetail, PostId, ProfileView, UserId};

use crate::db::repositories::{
    CommentRepository, FollowRepository, LikeRepository, PostRepository, UserRepository,
};
use crate::services::{ServiceError, ServiceResult};

/// Every post, newest first
pub fn list_posts(conn: &Connection) -> ServiceResult<Vec<Post>> {
    let posts = PostRepository::new(conn).list_newest_first()?;
    tracing::debug!("Listing {} posts", posts.len());
    Ok(posts)
}

/// Assemble the detail view of a post for an optional viewer
pub fn get_post_detail(
    conn: &Connection,
    post_id: PostId,
    viewer_id: Option<UserId>,
) -> ServiceResult<PostDetail> {
    let post = PostRepository::new(conn)
        .get_by_id(post_id)?
        .ok_or_else(|| ServiceError::not_found("Post"))?;

    let comments = CommentRepository::new(conn).for_post(post_id)?;
    let liked_users = LikeRepository::new(conn).user_ids_for_post(post_id)?;

    let followed_users = match viewer_id {
        Some(viewer) => FollowRepository::new(conn).followed_ids(viewer)?,
        None => BTreeSet::new(),
    };
    let viewer_has_liked = viewer_id.is_some_and(|viewer| liked_users.contains(&viewer));
    let viewer_follows_author = followed_users.contains(&post.user_id);

    Ok(PostDetail {
        like_count: liked_users.len(),
        post,
        comments,
        liked_users,
        followed_users,
        viewer_has_liked,
        viewer_follows_author,
    })
}

/// Add a comment to a post. Empty or whitespace-only content is rejected.
pub fn add_comment(
    conn: &Connection,
    post_id: PostId,
    user_id: UserId,
    content: Option<&str>,
) -> ServiceResult<Comment> {
    let content = content.map(str::trim).unwrap_or_default();
    if content.is_empty() {
        return Err(ServiceError::validation("Comment cannot be empty"));
    }

    if !PostRepository::new(conn).exists(post_id)? {
        return Err(ServiceError::not_found("Post"));
    }
    let author = UserRepository::new(conn)
        .get_by_id(user_id)?
        .ok_or_else(|| ServiceError::not_found("User"))?;

    let comment =
        CommentRepository::new(conn).create(post_id, user_id, &author.username, content, Utc::now())?;
    tracing::info!("User {} commented on post {}", user_id, post_id);
    Ok(comment)
}

/// Profile page: the user, who they follow and what they posted
pub fn get_profile(conn: &Connection, username: &str, viewer_id: UserId) -> ServiceResult<ProfileView> {
    let user = UserRepository::new(conn)
        .get_by_username(username)?
        .ok_or_else(|| ServiceError::not_found("User"))?;

    let follows = FollowRepository::new(conn);

    Ok(ProfileView {
        user: user.summary(),
        joined_at: user.joined_at,
        followed_users: follows.followed_users(user.id)?,
        posts: PostRepository::new(conn).get_by_user(user.id)?,
        follower_count: follows.follower_count(user.id)?,
        following_count: follows.following_count(user.id)?,
        viewer_follows: follows.is_following(viewer_id, user.id)?,
        is_self: viewer_id == user.id,
    })
}

use anyhow::Context;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;

use hultagram_types::{Identifiable, Post, User, UserId};

use crate::db::is_constraint_violation;
use crate::db::repositories::{PostRepository, UserRepository};
use crate::services::{ServiceError, ServiceResult};

/// letters, digits, `_`, `.` and `-`; at most 80 characters
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.\-]{1,80}$").expect("Failed to compile username regex")
});

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Failed to compile email regex")
});

const MAX_EMAIL_LEN: usize = 120;

/// Something that can prove who it is with a password
pub trait Authenticatable: Identifiable {
    fn password_hash(&self) -> &str;

    fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, self.password_hash()).unwrap_or(false)
    }
}

impl Authenticatable for User {
    fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// Register a new account. Emails are stored lowercased.
pub fn register(
    conn: &Connection,
    username: &str,
    email: &str,
    password: &str,
    hash_cost: u32,
) -> ServiceResult<User> {
    let username = username.trim();
    let email = email.trim().to_lowercase();

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ServiceError::validation(
            "Username, email and password are required",
        ));
    }
    if !USERNAME_REGEX.is_match(username) {
        return Err(ServiceError::validation(
            "Username may only contain letters, digits, '_', '.' and '-'",
        ));
    }
    if email.len() > MAX_EMAIL_LEN || !EMAIL_REGEX.is_match(&email) {
        return Err(ServiceError::validation("Email address is not valid"));
    }

    let users = UserRepository::new(conn);
    if users.get_by_username(username)?.is_some() {
        return Err(ServiceError::Conflict("Username is already taken".to_string()));
    }
    if users.get_by_email(&email)?.is_some() {
        return Err(ServiceError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = bcrypt::hash(password, hash_cost).context("Failed to hash password")?;

    let user = users
        .create(username, &email, &password_hash, Utc::now())
        .map_err(|err| {
            if is_constraint_violation(&err) {
                ServiceError::Conflict("Username or email is already registered".to_string())
            } else {
                ServiceError::Storage(err)
            }
        })?;

    tracing::info!("Registered user {} ({})", user.username, user.id);
    Ok(user)
}

/// Check login credentials. Unknown email and wrong password look the same.
pub fn authenticate(conn: &Connection, email: &str, password: &str) -> ServiceResult<User> {
    let email = email.trim().to_lowercase();
    let invalid = || ServiceError::Unauthenticated("Invalid email or password".to_string());

    let user = UserRepository::new(conn)
        .get_by_email(&email)?
        .ok_or_else(invalid)?;

    if !user.verify_password(password) {
        tracing::warn!("Failed login for user {}", user.id);
        return Err(invalid());
    }
    Ok(user)
}

/// Publish a post for `user_id`
pub fn create_post(
    conn: &Connection,
    user_id: UserId,
    image_ref: &str,
    caption: Option<&str>,
) -> ServiceResult<Post> {
    let image_ref = sanitize_image_ref(image_ref)
        .ok_or_else(|| ServiceError::validation("An image is required"))?;

    if !UserRepository::new(conn).exists(user_id)? {
        return Err(ServiceError::not_found("User"));
    }

    let caption = caption.map(str::trim).filter(|c| !c.is_empty());
    let posts = PostRepository::new(conn);
    let post_id = posts.create(user_id, &image_ref, caption, Utc::now())?;

    tracing::info!("User {} created post {}", user_id, post_id);
    posts
        .get_by_id(post_id)?
        .ok_or_else(|| ServiceError::not_found("Post"))
}

/// Reduce an uploaded file name to a safe bare name.
///
/// Directory components are dropped, anything outside `[A-Za-z0-9._-]`
/// becomes `_`, and leading dots/underscores are stripped.
pub fn sanitize_image_ref(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '_']);

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

use hultagram_types::{Post, PostId, UserId};

use crate::db::{format_timestamp, parse_timestamp};

/// Posts joined with their author and engagement counters
const POST_SELECT: &str = "SELECT p.id, p.user_id, u.username, p.image_ref, p.caption, p.created_at,
        (SELECT COUNT(*) FROM likes WHERE post_id = p.id) AS like_count,
        (SELECT COUNT(*) FROM comments WHERE post_id = p.id) AS comment_count
     FROM posts p
     JOIN users u ON p.user_id = u.id";

pub struct PostRepository<'a> {
    conn: &'a Connection,
}

fn map_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        user_id: row.get(1)?,
        author_username: row.get(2)?,
        image_ref: row.get(3)?,
        caption: row.get(4)?,
        created_at: parse_timestamp(5, &row.get::<_, String>(5)?)?,
        like_count: row.get(6)?,
        comment_count: row.get(7)?,
    })
}

impl<'a> PostRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new post, returning its id
    pub fn create(
        &self,
        user_id: UserId,
        image_ref: &str,
        caption: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<PostId> {
        self.conn
            .execute(
                "INSERT INTO posts (user_id, image_ref, caption, created_at) VALUES (?, ?, ?, ?)",
                (user_id, image_ref, caption, format_timestamp(&created_at)),
            )
            .context("Failed to create post")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a single post by ID
    pub fn get_by_id(&self, post_id: PostId) -> Result<Option<Post>> {
        let post = self
            .conn
            .query_row(&format!("{} WHERE p.id = ?", POST_SELECT), [post_id], map_post)
            .optional()?;
        Ok(post)
    }

    pub fn exists(&self, post_id: PostId) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All posts, newest first
    pub fn list_newest_first(&self) -> Result<Vec<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY p.created_at DESC, p.id DESC", POST_SELECT))?;

        let posts = stmt
            .query_map([], map_post)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Get posts by a specific user, newest first
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Post>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE p.user_id = ? ORDER BY p.created_at DESC, p.id DESC",
            POST_SELECT
        ))?;

        let posts = stmt
            .query_map([user_id], map_post)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Replace a post's caption
    pub fn update_caption(&self, post_id: PostId, caption: Option<&str>) -> Result<usize> {
        let rows = self
            .conn
            .execute(
                "UPDATE posts SET caption = ? WHERE id = ?",
                (caption, post_id),
            )
            .context("Failed to update post caption")?;
        Ok(rows)
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count)
    }
}

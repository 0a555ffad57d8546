use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row};

use hultagram_types::{Comment, PostId, UserId};

use crate::db::{format_timestamp, parse_timestamp};

pub struct CommentRepository<'a> {
    conn: &'a Connection,
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        user_id: row.get(2)?,
        author_username: row.get(3)?,
        content: row.get(4)?,
        created_at: parse_timestamp(5, &row.get::<_, String>(5)?)?,
    })
}

impl<'a> CommentRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(
        &self,
        post_id: PostId,
        user_id: UserId,
        author_username: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Comment> {
        self.conn
            .execute(
                "INSERT INTO comments (post_id, user_id, content, created_at) VALUES (?, ?, ?, ?)",
                (post_id, user_id, content, format_timestamp(&created_at)),
            )
            .context("Failed to create comment")?;

        Ok(Comment {
            id: self.conn.last_insert_rowid(),
            post_id,
            user_id,
            author_username: author_username.to_string(),
            content: content.to_string(),
            created_at,
        })
    }

    /// Comments on a post, oldest first
    pub fn for_post(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.post_id, c.user_id, u.username, c.content, c.created_at
             FROM comments c
             JOIN users u ON c.user_id = u.id
             WHERE c.post_id = ?
             ORDER BY c.created_at ASC, c.id ASC",
        )?;

        let comments = stmt
            .query_map([post_id], map_comment)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    pub fn count_for_post(&self, post_id: PostId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE post_id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

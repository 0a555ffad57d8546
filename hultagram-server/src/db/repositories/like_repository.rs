use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::collections::BTreeSet;

use hultagram_types::{Like, PostId, UserId};

use crate::db::{format_timestamp, parse_timestamp};

pub struct LikeRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LikeRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a like unless the (user, post) pair already has one.
    ///
    /// Returns the number of rows inserted (0 or 1). The UNIQUE constraint on
    /// the pair decides, not a prior read.
    pub fn insert_if_absent(
        &self,
        user_id: UserId,
        post_id: PostId,
        created_at: DateTime<Utc>,
    ) -> Result<usize> {
        let rows = self
            .conn
            .execute(
                "INSERT INTO likes (user_id, post_id, created_at) VALUES (?, ?, ?)
                 ON CONFLICT(user_id, post_id) DO NOTHING",
                (user_id, post_id, format_timestamp(&created_at)),
            )
            .context("Failed to like post")?;
        Ok(rows)
    }

    /// Remove the like for a pair, returning how many rows went away
    pub fn remove(&self, user_id: UserId, post_id: PostId) -> Result<usize> {
        let rows = self
            .conn
            .execute(
                "DELETE FROM likes WHERE user_id = ? AND post_id = ?",
                (user_id, post_id),
            )
            .context("Failed to unlike post")?;
        Ok(rows)
    }

    pub fn exists(&self, user_id: UserId, post_id: PostId) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE user_id = ? AND post_id = ?",
            (user_id, post_id),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Likes on a post, oldest first
    pub fn for_post(&self, post_id: PostId) -> Result<Vec<Like>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, post_id, created_at FROM likes
             WHERE post_id = ?
             ORDER BY created_at ASC, id ASC",
        )?;

        let likes = stmt
            .query_map([post_id], |row| {
                Ok(Like {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    post_id: row.get(2)?,
                    created_at: parse_timestamp(3, &row.get::<_, String>(3)?)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(likes)
    }

    /// Ids of every user who liked the post
    pub fn user_ids_for_post(&self, post_id: PostId) -> Result<BTreeSet<UserId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id FROM likes WHERE post_id = ?")?;

        let users = stmt
            .query_map([post_id], |row| row.get(0))?
            .collect::<Result<BTreeSet<UserId>, _>>()?;

        Ok(users)
    }

    pub fn count_for_post(&self, post_id: PostId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE post_id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::collections::BTreeSet;

use hultagram_types::{UserId, UserSummary};

use crate::db::format_timestamp;

pub struct FollowRepository<'a> {
    conn: &'a Connection,
}

impl<'a> FollowRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Check if user A is following user B
    pub fn is_following(&self, follower_id: UserId, followed_id: UserId) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ? AND followed_id = ?",
            (follower_id, followed_id),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Follow a user; returns 0 when the edge already existed
    pub fn follow(
        &self,
        follower_id: UserId,
        followed_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<usize> {
        let rows = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO follows (follower_id, followed_id, created_at) VALUES (?, ?, ?)",
                (follower_id, followed_id, format_timestamp(&created_at)),
            )
            .context("Failed to follow user")?;
        Ok(rows)
    }

    /// Unfollow a user; returns 0 when there was no edge
    pub fn unfollow(&self, follower_id: UserId, followed_id: UserId) -> Result<usize> {
        let rows = self
            .conn
            .execute(
                "DELETE FROM follows WHERE follower_id = ? AND followed_id = ?",
                (follower_id, followed_id),
            )
            .context("Failed to unfollow user")?;
        Ok(rows)
    }

    /// Ids of users this user follows
    pub fn followed_ids(&self, user_id: UserId) -> Result<BTreeSet<UserId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT followed_id FROM follows WHERE follower_id = ?")?;

        let followed = stmt
            .query_map([user_id], |row| row.get(0))?
            .collect::<Result<BTreeSet<UserId>, _>>()?;

        Ok(followed)
    }

    /// Users this user follows, most recently followed first
    pub fn followed_users(&self, user_id: UserId) -> Result<Vec<UserSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.username, u.profile_picture
             FROM follows f
             JOIN users u ON f.followed_id = u.id
             WHERE f.follower_id = ?
             ORDER BY f.created_at DESC, f.id DESC",
        )?;

        let users = stmt
            .query_map([user_id], |row| {
                Ok(UserSummary {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    profile_picture: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Get follower count
    pub fn follower_count(&self, user_id: UserId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE followed_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Get following count
    pub fn following_count(&self, user_id: UserId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_user, setup_test_db};

    #[test]
    fn test_follow_is_directed_and_unique() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let alice = insert_user(&conn, "alice");
        let bob = insert_user(&conn, "bob");
        let repo = FollowRepository::new(&conn);

        assert_eq!(repo.follow(alice, bob, Utc::now()).unwrap(), 1);
        assert_eq!(repo.follow(alice, bob, Utc::now()).unwrap(), 0);

        assert!(repo.is_following(alice, bob).unwrap());
        assert!(!repo.is_following(bob, alice).unwrap());
        assert_eq!(repo.following_count(alice).unwrap(), 1);
        assert_eq!(repo.follower_count(bob).unwrap(), 1);
        assert_eq!(repo.follower_count(alice).unwrap(), 0);
    }

    #[test]
    fn test_followed_users_and_ids() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let alice = insert_user(&conn, "alice");
        let bob = insert_user(&conn, "bob");
        let carol = insert_user(&conn, "carol");
        let repo = FollowRepository::new(&conn);

        let now = Utc::now();
        repo.follow(alice, bob, now - chrono::Duration::minutes(1)).unwrap();
        repo.follow(alice, carol, now).unwrap();

        assert_eq!(repo.followed_ids(alice).unwrap(), BTreeSet::from([bob, carol]));
        let names: Vec<String> = repo
            .followed_users(alice)
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["carol", "bob"]);
        assert!(repo.followed_ids(bob).unwrap().is_empty());
    }

    #[test]
    fn test_unfollow_reports_rows() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let alice = insert_user(&conn, "alice");
        let bob = insert_user(&conn, "bob");
        let repo = FollowRepository::new(&conn);

        assert_eq!(repo.unfollow(alice, bob).unwrap(), 0);
        repo.follow(alice, bob, Utc::now()).unwrap();
        assert_eq!(repo.unfollow(alice, bob).unwrap(), 1);
        assert!(!repo.is_following(alice, bob).unwrap());
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

use hultagram_types::{SearchMode, User, UserId, DEFAULT_PROFILE_PICTURE};

use crate::db::{format_timestamp, parse_timestamp};

const USER_COLUMNS: &str = "id, username, email, password_hash, profile_picture, joined_at";

pub struct UserRepository<'a> {
    conn: &'a Connection,
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        profile_picture: row.get(4)?,
        joined_at: parse_timestamp(5, &row.get::<_, String>(5)?)?,
    })
}

impl<'a> UserRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new user with the default profile picture
    ///
    /// Duplicate usernames or emails surface as a constraint violation.
    pub fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        joined_at: DateTime<Utc>,
    ) -> Result<User> {
        self.conn
            .execute(
                "INSERT INTO users (username, email, password_hash, profile_picture, joined_at)
                 VALUES (?, ?, ?, ?, ?)",
                (
                    username,
                    email,
                    password_hash,
                    DEFAULT_PROFILE_PICTURE,
                    format_timestamp(&joined_at),
                ),
            )
            .context("Failed to create user")?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
            joined_at,
        })
    }

    /// Get user by ID
    pub fn get_by_id(&self, user_id: UserId) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                [user_id],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get user by username
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS),
                [username],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get user by email (login)
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                [email],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn exists(&self, user_id: UserId) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Substring search over usernames, ordered by username
    pub fn search_by_username(&self, query: &str, mode: SearchMode) -> Result<Vec<User>> {
        // instr() never treats the needle as a pattern, so '%' and '_' match literally
        let predicate = match mode {
            SearchMode::CaseSensitive => "instr(username, ?1) > 0",
            SearchMode::CaseInsensitive => "instr(lower(username), lower(?1)) > 0",
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM users WHERE {} ORDER BY username",
            USER_COLUMNS, predicate
        ))?;

        let users = stmt
            .query_map([query], map_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::is_constraint_violation;
    use crate::db::repositories::test_support::{insert_user, setup_test_db};

    #[test]
    fn test_create_and_lookup() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let repo = UserRepository::new(&conn);

        let created = repo
            .create("alice", "alice@example.com", "hash", Utc::now())
            .unwrap();
        assert_eq!(created.profile_picture, DEFAULT_PROFILE_PICTURE);

        let by_id = repo.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        assert_eq!(by_id.password_hash, "hash");

        assert!(repo.get_by_username("alice").unwrap().is_some());
        assert!(repo.get_by_email("alice@example.com").unwrap().is_some());
        assert!(repo.get_by_username("bob").unwrap().is_none());
        assert!(repo.exists(created.id).unwrap());
        assert!(!repo.exists(created.id + 1).unwrap());
    }

    #[test]
    fn test_duplicate_username_is_constraint_violation() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let repo = UserRepository::new(&conn);

        repo.create("alice", "alice@example.com", "hash", Utc::now()).unwrap();
        let err = repo
            .create("alice", "other@example.com", "hash", Utc::now())
            .unwrap_err();
        assert!(is_constraint_violation(&err));

        let err = repo
            .create("alice2", "alice@example.com", "hash", Utc::now())
            .unwrap_err();
        assert!(is_constraint_violation(&err));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_search_modes() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        insert_user(&conn, "Alice");
        insert_user(&conn, "malice");
        insert_user(&conn, "bob");
        let repo = UserRepository::new(&conn);

        let insensitive: Vec<String> = repo
            .search_by_username("ALI", SearchMode::CaseInsensitive)
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(insensitive, vec!["Alice".to_string(), "malice".to_string()]);

        let sensitive: Vec<String> = repo
            .search_by_username("ali", SearchMode::CaseSensitive)
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(sensitive, vec!["malice".to_string()]);
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        insert_user(&conn, "bob");
        let repo = UserRepository::new(&conn);

        assert!(repo
            .search_by_username("%", SearchMode::CaseInsensitive)
            .unwrap()
            .is_empty());
    }
}

use anyhow::{Context, Result};

use crate::db::{repositories::UserRepository, Database};
use crate::services::{accounts, engagement, feed, ServiceResult};

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "password";

const DEMO_USERS: [(&str, &str); 3] = [
    ("alice", "alice@example.com"),
    ("bob", "bob@example.com"),
    ("charlie", "charlie@example.com"),
];

/// Populate an empty database with a few accounts, posts and interactions.
///
/// Returns `false` without touching anything when users already exist.
pub fn seed_demo_data(db: &Database, bcrypt_cost: u32) -> Result<bool> {
    let populated = db.read(|conn| UserRepository::new(conn).count())? > 0;
    if populated {
        tracing::debug!("Database already has users, skipping demo data");
        return Ok(false);
    }

    db.transaction(|tx| -> ServiceResult<()> {
        let mut users = Vec::with_capacity(DEMO_USERS.len());
        for (username, email) in DEMO_USERS {
            users.push(accounts::register(tx, username, email, DEMO_PASSWORD, bcrypt_cost)?);
        }
        let (alice, bob, charlie) = (&users[0], &users[1], &users[2]);

        let sunrise = accounts::create_post(tx, alice.id, "sunrise.jpg", Some("Morning on the lake"))?;
        accounts::create_post(tx, bob.id, "coffee.jpg", Some("Fuel"))?;
        accounts::create_post(tx, charlie.id, "trail.jpg", None)?;

        engagement::follow(tx, bob.id, alice.id)?;
        engagement::follow(tx, charlie.id, alice.id)?;
        engagement::toggle_like(tx, bob.id, sunrise.id)?;
        feed::add_comment(tx, sunrise.id, bob.id, Some("Beautiful light!"))?;
        Ok(())
    })
    .context("Failed to seed demo data")?;

    tracing::info!("Seeded demo data for {} users", DEMO_USERS.len());
    Ok(true)
}

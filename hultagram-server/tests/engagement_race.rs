use std::sync::{Arc, Barrier};
use std::thread;

use anyhow::Result;
use chrono::Utc;

use hultagram_server::db::repositories::{
    CommentRepository, FollowRepository, LikeRepository, PostRepository, UserRepository,
};
use hultagram_server::db::Database;
use hultagram_server::services::{engagement, feed, ServiceError};

fn file_database() -> Result<(tempfile::TempDir, Database)> {
    let dir = tempfile::tempdir()?;
    let db = Database::new(dir.path().join("race.db"))?;
    db.initialize()?;
    Ok((dir, db))
}

fn seed_pair(db: &Database) -> Result<(i64, i64, i64)> {
    let conn = db.connection()?;
    let users = UserRepository::new(&conn);
    let alice = users.create("alice", "alice@example.com", "hash", Utc::now())?.id;
    let bob = users.create("bob", "bob@example.com", "hash", Utc::now())?.id;
    let post = PostRepository::new(&conn).create(alice, "a.png", None, Utc::now())?;
    Ok((alice, bob, post))
}

/// Run `f` on `threads` threads released at the same moment
fn race<F>(threads: usize, f: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(threads));
    let f = Arc::new(f);
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let f = Arc::clone(&f);
            thread::spawn(move || {
                barrier.wait();
                f();
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
}

#[test]
fn test_concurrent_follows_create_one_edge() -> Result<()> {
    let (_dir, db) = file_database()?;
    let (alice, bob, _) = seed_pair(&db)?;

    let racing_db = db.clone();
    race(8, move || {
        racing_db
            .transaction(|tx| engagement::follow(tx, alice, bob))
            .expect("follow failed");
    });

    let conn = db.connection()?;
    let follows = FollowRepository::new(&conn);
    assert!(follows.is_following(alice, bob)?);
    assert_eq!(follows.follower_count(bob)?, 1);
    Ok(())
}

#[test]
fn test_concurrent_toggles_keep_parity() -> Result<()> {
    let (_dir, db) = file_database()?;
    let (_, bob, post) = seed_pair(&db)?;

    let racing_db = db.clone();
    race(8, move || {
        racing_db
            .transaction(|tx| engagement::toggle_like(tx, bob, post))
            .expect("toggle failed");
    });

    let count = {
        let conn = db.connection()?;
        LikeRepository::new(&conn).count_for_post(post)?
    };
    assert_eq!(count, 0, "an even number of toggles leaves no like");

    db.transaction(|tx| engagement::toggle_like(tx, bob, post))?;
    let conn = db.connection()?;
    assert_eq!(LikeRepository::new(&conn).count_for_post(post)?, 1);
    Ok(())
}

#[test]
fn test_failed_transaction_leaves_nothing_behind() -> Result<()> {
    let (_dir, db) = file_database()?;
    let (alice, bob, post) = seed_pair(&db)?;

    let result: Result<(), ServiceError> = db.transaction(|tx| {
        engagement::follow(tx, alice, bob)?;
        feed::add_comment(tx, post, alice, Some("   "))?;
        Ok(())
    });
    assert!(matches!(result, Err(ServiceError::Validation(_))));

    let conn = db.connection()?;
    assert!(!FollowRepository::new(&conn).is_following(alice, bob)?);
    Ok(())
}

#[test]
fn test_deleting_post_removes_likes_and_comments() -> Result<()> {
    let (_dir, db) = file_database()?;
    let (alice, bob, post) = seed_pair(&db)?;

    db.transaction(|tx| -> Result<(), ServiceError> {
        engagement::toggle_like(tx, bob, post)?;
        feed::add_comment(tx, post, bob, Some("nice"))?;
        feed::add_comment(tx, post, alice, Some("thanks"))?;
        Ok(())
    })?;

    let conn = db.connection()?;
    conn.execute("DELETE FROM posts WHERE id = ?1", [post])?;

    assert_eq!(LikeRepository::new(&conn).count_for_post(post)?, 0);
    assert_eq!(CommentRepository::new(&conn).count_for_post(post)?, 0);
    Ok(())
}

#[test]
fn test_deleting_user_removes_their_graph() -> Result<()> {
    let (_dir, db) = file_database()?;
    let (alice, bob, post) = seed_pair(&db)?;

    db.transaction(|tx| -> Result<(), ServiceError> {
        engagement::follow(tx, alice, bob)?;
        engagement::follow(tx, bob, alice)?;
        engagement::toggle_like(tx, bob, post)?;
        Ok(())
    })?;

    let conn = db.connection()?;
    conn.execute("DELETE FROM users WHERE id = ?1", [alice])?;

    let follows = FollowRepository::new(&conn);
    assert_eq!(follows.follower_count(bob)?, 0);
    assert_eq!(follows.following_count(bob)?, 0);
    assert_eq!(PostRepository::new(&conn).count()?, 0);
    assert_eq!(LikeRepository::new(&conn).count_for_post(post)?, 0);
    Ok(())
}

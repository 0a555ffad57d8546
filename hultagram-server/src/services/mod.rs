//! Business rules for the social graph and engagement.
//!
//! Every function takes an explicit storage handle (usually a transaction
//! from [`crate::db::Database::transaction`]) so one request is one unit of work.

pub mod access;
pub mod accounts;
pub mod engagement;
pub mod error;
pub mod feed;

pub use error::{ServiceError, ServiceResult};

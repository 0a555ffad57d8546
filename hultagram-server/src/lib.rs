// Library exports for hultagram-server
// The binary and the integration tests both build on these modules

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod seed;
pub mod services;
pub mod session;
pub mod state;

pub use api::router;

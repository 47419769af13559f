//! Infrastructure layer - Stores, credentials and runtime plumbing

pub mod auth;
pub mod film;
pub mod logging;
pub mod storage;
pub mod user;

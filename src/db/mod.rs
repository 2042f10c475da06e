//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool setup and the per-table storage types

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbAccount, DbDashboardUser};
pub use schema::SQLITE_INIT;
pub use sqlite::{AccountsStorage, DashboardUsersStorage, SqlitePool, connect};

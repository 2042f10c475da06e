//! SQL DDL for initializing the account and dashboard-user tables.

/// SQLite schema with:
/// - `accounts`: primary login accounts
/// - `dashboard_users`: records managed from the dashboard
///
/// Both tables carry their own UNIQUE constraints on `email` and `username`;
/// the two tables are independent of each other.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS dashboard_users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL -- UTC timestamp
);
"#;

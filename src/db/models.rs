use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `accounts` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbAccount {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Row of the `dashboard_users` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbDashboardUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

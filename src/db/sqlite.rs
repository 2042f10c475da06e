use crate::db::models::{DbAccount, DbDashboardUser};
use crate::db::schema::SQLITE_INIT;
use crate::error::GatehouseError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the database at `database_url` and apply the schema.
pub async fn connect(database_url: &str) -> Result<SqlitePool, GatehouseError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), GatehouseError> {
    // sqlx::query runs one statement at a time
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct AccountsStorage {
    pool: SqlitePool,
}

impl AccountsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// True when either the email or the username is already taken.
    pub async fn exists(&self, email: &str, username: &str) -> Result<bool, GatehouseError> {
        let rec: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE email = ? OR username = ?")
                .bind(email)
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(rec.0 > 0)
    }

    /// Insert a new account. Returns the row id.
    pub async fn insert(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<i64, GatehouseError> {
        let result =
            sqlx::query("INSERT INTO accounts (email, username, password_hash) VALUES (?, ?, ?)")
                .bind(email)
                .bind(username)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(GatehouseError::from_write)?;
        Ok(result.last_insert_rowid())
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<DbAccount>, GatehouseError> {
        let row = sqlx::query_as::<_, DbAccount>(
            "SELECT id, email, username, password_hash FROM accounts WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn count(&self) -> Result<i64, GatehouseError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}

#[derive(Clone)]
pub struct DashboardUsersStorage {
    pool: SqlitePool,
}

impl DashboardUsersStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn exists(&self, email: &str, username: &str) -> Result<bool, GatehouseError> {
        let rec: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM dashboard_users WHERE email = ? OR username = ?")
                .bind(email)
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(rec.0 > 0)
    }

    pub async fn list(&self) -> Result<Vec<DbDashboardUser>, GatehouseError> {
        let rows = sqlx::query_as::<_, DbDashboardUser>(
            r#"SELECT id, email, username, password_hash, created_at
               FROM dashboard_users ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<DbDashboardUser>, GatehouseError> {
        let row = sqlx::query_as::<_, DbDashboardUser>(
            r#"SELECT id, email, username, password_hash, created_at
               FROM dashboard_users WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn insert(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<i64, GatehouseError> {
        let result = sqlx::query(
            r#"INSERT INTO dashboard_users (email, username, password_hash, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(GatehouseError::from_write)?;
        Ok(result.last_insert_rowid())
    }

    /// Overwrite email and username, and the hash when one is given.
    /// Returns false when no row has this id.
    pub async fn update_by_id(
        &self,
        id: i64,
        email: &str,
        username: &str,
        password_hash: Option<&str>,
    ) -> Result<bool, GatehouseError> {
        let result = sqlx::query(
            r#"UPDATE dashboard_users SET
                email = ?,
                username = ?,
                password_hash = COALESCE(?, password_hash)
              WHERE id = ?"#,
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(GatehouseError::from_write)?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns false when no row has this id.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, GatehouseError> {
        let result = sqlx::query("DELETE FROM dashboard_users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, GatehouseError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dashboard_users")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}

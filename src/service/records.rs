use crate::db::{DashboardUsersStorage, DbDashboardUser};
use crate::error::GatehouseError;
use crate::service::fields::require_identity;
use crate::service::password::hash_password_blocking;
use chrono::{DateTime, Utc};
use tracing::info;

/// A dashboard user as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedRecord {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbDashboardUser> for ManagedRecord {
    fn from(d: DbDashboardUser) -> Self {
        ManagedRecord {
            id: d.id,
            email: d.email,
            username: d.username,
            created_at: d.created_at,
        }
    }
}

/// CRUD over the `dashboard_users` table.
#[derive(Clone)]
pub struct ManagedRecordStore {
    storage: DashboardUsersStorage,
}

impl ManagedRecordStore {
    pub fn new(storage: DashboardUsersStorage) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<ManagedRecord>, GatehouseError> {
        let rows = self.storage.list().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<i64, GatehouseError> {
        require_identity(email, username)?;
        if self.storage.exists(email, username).await? {
            return Err(GatehouseError::Conflict);
        }
        let hash = hash_password_blocking(password.to_string()).await?;
        let id = self.storage.insert(email, username, &hash).await?;
        info!(id, username, "dashboard user created");
        Ok(id)
    }

    /// Overwrite email and username; rehash only when `new_password` is non-empty.
    ///
    /// Uniqueness against other records is not pre-checked here; a collision
    /// only surfaces through the table's UNIQUE constraint as `Conflict`.
    pub async fn update(
        &self,
        id: i64,
        email: &str,
        username: &str,
        new_password: &str,
    ) -> Result<(), GatehouseError> {
        require_identity(email, username)?;
        let hash = if new_password.is_empty() {
            None
        } else {
            Some(hash_password_blocking(new_password.to_string()).await?)
        };
        let found = self
            .storage
            .update_by_id(id, email, username, hash.as_deref())
            .await?;
        if !found {
            return Err(GatehouseError::NotFound);
        }
        info!(id, username, password_changed = hash.is_some(), "dashboard user updated");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), GatehouseError> {
        if !self.storage.delete_by_id(id).await? {
            return Err(GatehouseError::NotFound);
        }
        info!(id, "dashboard user deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, GatehouseError> {
        self.storage.count().await
    }
}

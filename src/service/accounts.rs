use crate::db::{AccountsStorage, DbAccount};
use crate::error::GatehouseError;
use crate::service::fields::require_identity;
use crate::service::password::{hash_password_blocking, verify_password_blocking};
use tracing::{info, warn};

/// A signed-in primary account, without its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub username: String,
}

impl From<DbAccount> for Account {
    fn from(d: DbAccount) -> Self {
        Account {
            id: d.id,
            email: d.email,
            username: d.username,
        }
    }
}

/// Registration and login against the `accounts` table.
#[derive(Clone)]
pub struct CredentialStore {
    storage: AccountsStorage,
}

impl CredentialStore {
    pub fn new(storage: AccountsStorage) -> Self {
        Self { storage }
    }

    /// Create a new account. Returns its id.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<i64, GatehouseError> {
        require_identity(email, username)?;
        if password != confirm_password {
            return Err(GatehouseError::Validation(
                "Passwords do not match".to_string(),
            ));
        }
        if self.storage.exists(email, username).await? {
            warn!(username, "registration rejected: username or email taken");
            return Err(GatehouseError::Conflict);
        }

        let hash = hash_password_blocking(password.to_string()).await?;
        let id = self.storage.insert(email, username, &hash).await?;
        info!(id, username, "account registered");
        Ok(id)
    }

    /// Check a username/password pair. Unknown users and wrong passwords both
    /// yield `AuthenticationFailed`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, GatehouseError> {
        let Some(account) = self.storage.get_by_username(username).await? else {
            return Err(GatehouseError::AuthenticationFailed);
        };
        let ok =
            verify_password_blocking(password.to_string(), account.password_hash.clone()).await?;
        if !ok {
            return Err(GatehouseError::AuthenticationFailed);
        }
        Ok(account.into())
    }

    pub async fn count(&self) -> Result<i64, GatehouseError> {
        self.storage.count().await
    }
}

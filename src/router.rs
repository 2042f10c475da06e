use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;

use crate::db::{AccountsStorage, DashboardUsersStorage, SqlitePool};
use crate::handlers::{auth, dashboard};
use crate::middleware::SessionManager;
use crate::service::{CredentialStore, ManagedRecordStore};

#[derive(Clone)]
pub struct AppState {
    pub accounts: CredentialStore,
    pub records: ManagedRecordStore,
    pub sessions: SessionManager,
    pub key: Key,
}

impl AppState {
    /// `insecure_cookie` drops the `Secure` attribute from issued cookies.
    pub fn new(pool: SqlitePool, key: Key, insecure_cookie: bool) -> Self {
        Self {
            accounts: CredentialStore::new(AccountsStorage::new(pool.clone())),
            records: ManagedRecordStore::new(DashboardUsersStorage::new(pool)),
            sessions: SessionManager::new(!insecure_cookie),
            key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

pub fn gatehouse_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(auth::index))
        .route("/login", post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/create_user", post(dashboard::create_user))
        .route("/edit_user/{id}", post(dashboard::edit_user))
        .route("/delete_user/{id}", post(dashboard::delete_user))
        .with_state(state)
}

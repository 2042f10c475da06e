use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::views;

#[derive(Debug, ThisError)]
pub enum GatehouseError {
    #[error("{0}")]
    Validation(String),

    #[error("Username or email already registered")]
    Conflict,

    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("secret_key must be at least 32 bytes")]
    InvalidSecretKey,
}

impl GatehouseError {
    /// Map a sqlx error, folding UNIQUE constraint violations into `Conflict`.
    pub fn from_write(err: SqlxError) -> Self {
        match &err {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => GatehouseError::Conflict,
            _ => GatehouseError::Database(err),
        }
    }
}

impl From<figment::Error> for GatehouseError {
    fn from(e: figment::Error) -> Self {
        GatehouseError::Config(Box::new(e))
    }
}

impl IntoResponse for GatehouseError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            GatehouseError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            GatehouseError::Conflict => (StatusCode::CONFLICT, self.to_string()),
            GatehouseError::AuthenticationFailed => (StatusCode::UNAUTHORIZED, self.to_string()),
            GatehouseError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            GatehouseError::Database(_)
            | GatehouseError::PasswordHash(_)
            | GatehouseError::Task(_)
            | GatehouseError::Config(_)
            | GatehouseError::InvalidSecretKey => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };
        (status, Html(views::render_error_page(status, &message))).into_response()
    }
}

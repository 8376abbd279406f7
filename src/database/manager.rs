use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;
use crate::error::ApiError;
use crate::messages::Message;

/// PostgreSQL SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors surfaced by the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        let code = err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.into_owned());

        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => DatabaseError::UniqueViolation(err.to_string()),
            Some(FOREIGN_KEY_VIOLATION) => DatabaseError::ForeignKeyViolation(err.to_string()),
            _ => DatabaseError::Sqlx(err),
        }
    }
}

impl DatabaseError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation(_))
    }

    /// Log the cause and hide it behind a resource-specific 500
    pub fn into_internal(self, message: Message) -> ApiError {
        tracing::error!("Database error: {}", self);
        ApiError::internal_server_error(message.text())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        err.into_internal(Message::Internal)
    }
}

/// Open the PostgreSQL pool named by `DATABASE_URL`.
///
/// Returns `Ok(None)` when the variable is unset so callers can fall back to
/// the in-memory store.
pub async fn connect_from_env() -> Result<Option<PgPool>, DatabaseError> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => return Ok(None),
    };

    let settings = &config::config().database;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.connection_timeout))
        .connect(&url)
        .await?;

    info!("Connected to PostgreSQL (max {} connections)", settings.max_connections);

    if settings.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    Ok(Some(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_conflicts() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(!err.is_unique_violation());
        assert!(matches!(err, DatabaseError::Sqlx(_)));
    }

    #[test]
    fn internal_mapping_hides_cause() {
        let err = DatabaseError::QueryError("relation \"expenses\" does not exist".into());
        let api = err.into_internal(Message::ExpenseListFailed);
        assert_eq!(api.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message().contains("relation"));
    }
}

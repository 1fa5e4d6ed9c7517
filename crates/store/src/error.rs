//! Translation of backend errors into the persistence port taxonomy.

use domain::RepositoryError;

/// Maps a sqlx error onto [`RepositoryError`].
///
/// Constraint violations become `IntegrityViolation`; connection-level
/// failures become `Transient`. Missing rows are detected by the adapters
/// through `rows_affected` or `fetch_optional`, so a `RowNotFound` here
/// means a query that should have returned a row did not, and is a
/// `Backend` failure.
pub fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(ref db_err)
            if db_err.is_foreign_key_violation() || db_err.is_unique_violation() =>
        {
            RepositoryError::IntegrityViolation(db_err.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::warn!(error = %err, "database unavailable");
            RepositoryError::Transient(err.to_string())
        }
        other => RepositoryError::Backend(other.to_string()),
    }
}

//! MySQL repository implementations

pub mod account_repository_impl;
pub mod template_repository_impl;
pub mod token_repository_impl;

pub use account_repository_impl::MySqlAccountRepository;
pub use template_repository_impl::MySqlTemplateRepository;
pub use token_repository_impl::MySqlTokenRepository;

use us_core::errors::DomainError;

/// Whether a driver error is a duplicate-key violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

/// Convert a driver error into a store failure, keeping detail in the logs
pub(crate) fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, context, "Database operation failed");
    DomainError::database(format!("{}: {}", context, err))
}

/// Read a column and turn decoding failures into store failures
pub(crate) fn column<'r, T>(row: &'r sqlx::mysql::MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    use sqlx::Row;
    row.try_get(name)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", name, e)))
}

/// Parse a CHAR(36) identifier column
pub(crate) fn uuid_column(row: &sqlx::mysql::MySqlRow, name: &str) -> Result<uuid::Uuid, DomainError> {
    let raw: String = column(row, name)?;
    uuid::Uuid::parse_str(&raw)
        .map_err(|e| DomainError::database(format!("Invalid UUID in {}: {}", name, e)))
}

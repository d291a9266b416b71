use contest_hub_domain::storage::StorageError;
use sea_orm::{DbErr, SqlErr};

/// Maps a SeaORM error onto the domain storage error, surfacing unique-key
/// violations as `Duplicate` so callers can branch on them instead of
/// pattern-matching driver messages.
pub(crate) fn map_db_err(err: DbErr) -> StorageError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => StorageError::Duplicate(message),
        _ => StorageError::Database(err.to_string()),
    }
}

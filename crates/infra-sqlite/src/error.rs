// Storage error translation
//
// The only place raw sqlx errors are inspected. Constraint classification is
// left to call sites, which know which domain code a violation means.

use mailroom_core::error::StoreError;

/// Constraint violation classes reported by SQLite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// PRIMARY KEY or UNIQUE
    Unique,
    ForeignKey,
}

/// Classify a constraint violation by its extended result code.
///
/// SQLite result codes: https://www.sqlite.org/rescode.html
pub fn constraint_violation(err: &sqlx::Error) -> Option<Constraint> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };

    match db_err.code()?.as_ref() {
        // SQLITE_CONSTRAINT_PRIMARYKEY, SQLITE_CONSTRAINT_UNIQUE
        "1555" | "2067" => Some(Constraint::Unique),
        // SQLITE_CONSTRAINT_FOREIGNKEY
        "787" => Some(Constraint::ForeignKey),
        _ => None,
    }
}

/// Helper to convert sqlx::Error into StorageUnavailable, keeping the driver error as source
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => match code.as_ref() {
                // SQLITE_BUSY - database is locked
                "5" | "517" => format!("database locked (SQLITE_BUSY): {}", db_err.message()),
                // SQLITE_FULL - database or disk is full
                "13" => format!("database full: {}", db_err.message()),
                other => format!("database error [{}]: {}", other, db_err.message()),
            },
            None => format!("database error: {}", db_err.message()),
        },
        sqlx::Error::PoolTimedOut => "timed out acquiring a connection".to_string(),
        sqlx::Error::PoolClosed => "connection pool closed".to_string(),
        sqlx::Error::ColumnNotFound(col) => format!("column not found: {}", col),
        sqlx::Error::ColumnDecode { index, .. } => format!("column {} could not be decoded", index),
        // Connection, I/O and protocol errors
        other => other.to_string(),
    };

    StoreError::storage(message, err)
}

//! Error taxonomy shared by every fallible operation in the engine.

use std::io;

use thiserror::Error;

/// A convenience `Result` type for engine operations that may fail with a
/// [DbError].
pub type DbResult<T> = Result<T, DbError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DbError {
    /// A value was rejected by a column: NULL in a non-nullable column, an
    /// uncoercible literal, or an over-long string.
    #[error("validation error: {0}")]
    Validation(String),

    /// A duplicate value for a primary-key or unique column.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The named table does not exist.
    #[error("table {0} does not exist")]
    NotFound(String),

    /// A table with the same name already exists.
    #[error("table {0} already exists")]
    AlreadyExists(String),

    /// The statement text does not match any recognized grammar.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The leading keyword is not one of the supported statement verbs.
    #[error("unsupported statement: {0}")]
    Unsupported(String),

    /// I/O failure while saving or loading a snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A snapshot file that cannot be decoded: wrong magic, wrong format
    /// version, or a truncated/garbled payload.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

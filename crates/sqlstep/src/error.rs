//! Types for working with errors produced by sqlstep.

use std::io;
use std::num::TryFromIntError;

use crate::{SqliteDataType, sqlite::error::SqliteError};

/// A specialized `Result` type for sqlstep.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("incompatible source data type: {0}")]
    DataType(SqliteDataType),
    #[error("decoding conversion error: {0}")]
    Conversion(String),
}

impl From<TryFromIntError> for DecodeError {
    fn from(err: TryFromIntError) -> Self {
        DecodeError::Conversion(err.to_string())
    }
}

impl From<String> for DecodeError {
    fn from(err: String) -> Self {
        DecodeError::Conversion(err)
    }
}

/// Represents all the ways a statement operation can fail.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The SQL text is empty or cannot be handed to SQLite.
    #[error("invalid SQL statement: {0}")]
    InvalidStatement(String),

    /// The parameter slots supplied by the bindings do not match the slots declared by the
    /// compiled statement.
    #[error("parameter count mismatch: the statement declares {expected}, but {actual} were supplied")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// A row was consumed after the statement reported it had no more rows.
    #[error("no data received")]
    NoData,

    /// Error returned from SQLite.
    #[error("error returned from database: {0}")]
    Sqlite(#[source] SqliteError),

    /// Error touching the database file before SQLite could report anything.
    #[error("error opening database: {0}")]
    Io(#[from] io::Error),

    /// Column index was out of bounds.
    #[error("column index out of bounds: the len is {len}, but the index is {index}")]
    ColumnIndexOutOfBounds { index: usize, len: usize },

    /// Error occurred while decoding a value from a specific column.
    #[error("error occurred while decoding column {index}: {source}")]
    ColumnDecode {
        index: usize,

        #[source]
        source: DecodeError,
    },
}

impl Error {
    /// Translate a native status code and diagnostic text into an [`Error`].
    pub(crate) fn from_status(code: i32, message: impl Into<String>) -> Self {
        Error::Sqlite(SqliteError::from_code(code, message))
    }

    pub fn into_sqlite_error(self) -> Option<SqliteError> {
        match self {
            Error::Sqlite(err) => Some(err),
            _ => None,
        }
    }

    /// The SQLite error behind this error, if there is one.
    pub fn as_sqlite_error(&self) -> Option<&SqliteError> {
        match self {
            Error::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SqliteError> for Error {
    fn from(error: SqliteError) -> Self {
        Error::Sqlite(error)
    }
}

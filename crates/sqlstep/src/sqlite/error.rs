use std::ffi::CStr;

use crate::sqlite::ffi;
use libsqlite3_sys::{self, sqlite3};

// Error Codes And Messages
// https://www.sqlite.org/c3ref/errcode.html

/// Primary Sqlite error codes.
///
/// **Note:** This enum is marked `#[non_exhaustive]`; avoid exhaustive
/// matches as new variants may be introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PrimaryErrCode {
    Error,
    Internal,
    Perm,
    Abort,
    Busy,
    Locked,
    NoMem,
    ReadOnly,
    Interrupt,
    IoErr,
    Corrupt,
    NotFound,
    Full,
    CantOpen,
    Protocol,
    Empty,
    Schema,
    TooBig,
    Constraint,
    Mismatch,
    Misuse,
    NoLfs,
    Auth,
    Format,
    Range,
    NotADB,
    Notice,
    Warning,
    Unknown(u32),
}

impl PrimaryErrCode {
    pub(crate) fn from_code(code: i32) -> PrimaryErrCode {
        match code & 255 {
            libsqlite3_sys::SQLITE_ERROR => PrimaryErrCode::Error,
            libsqlite3_sys::SQLITE_INTERNAL => PrimaryErrCode::Internal,
            libsqlite3_sys::SQLITE_PERM => PrimaryErrCode::Perm,
            libsqlite3_sys::SQLITE_ABORT => PrimaryErrCode::Abort,
            libsqlite3_sys::SQLITE_BUSY => PrimaryErrCode::Busy,
            libsqlite3_sys::SQLITE_LOCKED => PrimaryErrCode::Locked,
            libsqlite3_sys::SQLITE_NOMEM => PrimaryErrCode::NoMem,
            libsqlite3_sys::SQLITE_READONLY => PrimaryErrCode::ReadOnly,
            libsqlite3_sys::SQLITE_INTERRUPT => PrimaryErrCode::Interrupt,
            libsqlite3_sys::SQLITE_IOERR => PrimaryErrCode::IoErr,
            libsqlite3_sys::SQLITE_CORRUPT => PrimaryErrCode::Corrupt,
            libsqlite3_sys::SQLITE_NOTFOUND => PrimaryErrCode::NotFound,
            libsqlite3_sys::SQLITE_FULL => PrimaryErrCode::Full,
            libsqlite3_sys::SQLITE_CANTOPEN => PrimaryErrCode::CantOpen,
            libsqlite3_sys::SQLITE_PROTOCOL => PrimaryErrCode::Protocol,
            libsqlite3_sys::SQLITE_EMPTY => PrimaryErrCode::Empty,
            libsqlite3_sys::SQLITE_SCHEMA => PrimaryErrCode::Schema,
            libsqlite3_sys::SQLITE_TOOBIG => PrimaryErrCode::TooBig,
            libsqlite3_sys::SQLITE_CONSTRAINT => PrimaryErrCode::Constraint,
            libsqlite3_sys::SQLITE_MISMATCH => PrimaryErrCode::Mismatch,
            libsqlite3_sys::SQLITE_MISUSE => PrimaryErrCode::Misuse,
            libsqlite3_sys::SQLITE_NOLFS => PrimaryErrCode::NoLfs,
            libsqlite3_sys::SQLITE_AUTH => PrimaryErrCode::Auth,
            libsqlite3_sys::SQLITE_FORMAT => PrimaryErrCode::Format,
            libsqlite3_sys::SQLITE_RANGE => PrimaryErrCode::Range,
            libsqlite3_sys::SQLITE_NOTADB => PrimaryErrCode::NotADB,
            libsqlite3_sys::SQLITE_NOTICE => PrimaryErrCode::Notice,
            libsqlite3_sys::SQLITE_WARNING => PrimaryErrCode::Warning,
            _ => PrimaryErrCode::Unknown(code as u32),
        }
    }
}

/// Extended Sqlite error codes that callers commonly branch on.
///
/// Codes without a dedicated variant are kept as [`ExtendedErrCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtendedErrCode {
    BusyRecovery,
    BusySnapshot,
    BusyTimeout,
    LockedSharedCache,
    LockedVTab,
    ReadOnlyDbMoved,
    ConstraintCheck,
    ConstraintCommitHook,
    ConstraintForeignKey,
    ConstraintFunction,
    ConstraintNotNull,
    ConstraintPrimaryKey,
    ConstraintTrigger,
    ConstraintUnique,
    ConstraintVTab,
    ConstraintRowId,
    ConstraintPinned,
    ConstraintDataType,
    Other(u32),
}

impl ExtendedErrCode {
    pub(crate) fn from_code(code: i32) -> ExtendedErrCode {
        match code {
            libsqlite3_sys::SQLITE_BUSY_RECOVERY => ExtendedErrCode::BusyRecovery,
            libsqlite3_sys::SQLITE_BUSY_SNAPSHOT => ExtendedErrCode::BusySnapshot,
            libsqlite3_sys::SQLITE_BUSY_TIMEOUT => ExtendedErrCode::BusyTimeout,
            libsqlite3_sys::SQLITE_LOCKED_SHAREDCACHE => ExtendedErrCode::LockedSharedCache,
            libsqlite3_sys::SQLITE_LOCKED_VTAB => ExtendedErrCode::LockedVTab,
            libsqlite3_sys::SQLITE_READONLY_DBMOVED => ExtendedErrCode::ReadOnlyDbMoved,
            libsqlite3_sys::SQLITE_CONSTRAINT_CHECK => ExtendedErrCode::ConstraintCheck,
            libsqlite3_sys::SQLITE_CONSTRAINT_COMMITHOOK => ExtendedErrCode::ConstraintCommitHook,
            libsqlite3_sys::SQLITE_CONSTRAINT_FOREIGNKEY => ExtendedErrCode::ConstraintForeignKey,
            libsqlite3_sys::SQLITE_CONSTRAINT_FUNCTION => ExtendedErrCode::ConstraintFunction,
            libsqlite3_sys::SQLITE_CONSTRAINT_NOTNULL => ExtendedErrCode::ConstraintNotNull,
            libsqlite3_sys::SQLITE_CONSTRAINT_PRIMARYKEY => ExtendedErrCode::ConstraintPrimaryKey,
            libsqlite3_sys::SQLITE_CONSTRAINT_TRIGGER => ExtendedErrCode::ConstraintTrigger,
            libsqlite3_sys::SQLITE_CONSTRAINT_UNIQUE => ExtendedErrCode::ConstraintUnique,
            libsqlite3_sys::SQLITE_CONSTRAINT_VTAB => ExtendedErrCode::ConstraintVTab,
            libsqlite3_sys::SQLITE_CONSTRAINT_ROWID => ExtendedErrCode::ConstraintRowId,
            libsqlite3_sys::SQLITE_CONSTRAINT_PINNED => ExtendedErrCode::ConstraintPinned,
            libsqlite3_sys::SQLITE_CONSTRAINT_DATATYPE => ExtendedErrCode::ConstraintDataType,
            _ => ExtendedErrCode::Other(code as u32),
        }
    }
}

/// An error returned from Sqlite
#[derive(Debug, thiserror::Error)]
#[error("(code: {code}, {:?}) {message}", .extended)]
pub struct SqliteError {
    pub primary: PrimaryErrCode,
    pub extended: ExtendedErrCode,
    /// The raw (extended) result code.
    pub code: i32,
    pub message: String,
}

impl SqliteError {
    /// Capture the most recent error recorded on a database connection.
    pub(crate) fn new(handle: *mut sqlite3) -> Self {
        let code = ffi::extended_errcode(handle);
        let message = unsafe {
            let msg = ffi::errmsg(handle);
            debug_assert!(!msg.is_null());
            CStr::from_ptr(msg).to_string_lossy().into_owned()
        };

        Self::with_message(code, message)
    }

    /// Build an error from a status code that was not recorded on a connection.
    ///
    /// An empty message is replaced by SQLite's generic description of the code.
    pub(crate) fn from_code(code: i32, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = unsafe { CStr::from_ptr(ffi::errstr(code)) }
                .to_string_lossy()
                .into_owned();
        }
        Self::with_message(code, message)
    }

    fn with_message(code: i32, message: String) -> Self {
        Self {
            primary: PrimaryErrCode::from_code(code),
            extended: ExtendedErrCode::from_code(code),
            code,
            message,
        }
    }

    /// `true` if the database was locked by another connection past the busy timeout.
    pub fn is_busy(&self) -> bool {
        self.primary == PrimaryErrCode::Busy
    }

    pub fn primary_code(&self) -> PrimaryErrCode {
        self.primary
    }

    pub fn extended_code(&self) -> ExtendedErrCode {
        self.extended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_code_masks_extended_bits() {
        assert_eq!(
            PrimaryErrCode::from_code(libsqlite3_sys::SQLITE_CONSTRAINT_UNIQUE),
            PrimaryErrCode::Constraint
        );
        assert_eq!(
            PrimaryErrCode::from_code(libsqlite3_sys::SQLITE_BUSY_TIMEOUT),
            PrimaryErrCode::Busy
        );
        assert_eq!(PrimaryErrCode::from_code(0), PrimaryErrCode::Unknown(0));
    }

    #[test]
    fn from_code_fills_in_generic_message() {
        let err = SqliteError::from_code(libsqlite3_sys::SQLITE_MISUSE, "");
        assert_eq!(err.primary, PrimaryErrCode::Misuse);
        assert_eq!(err.extended, ExtendedErrCode::Other(21));
        assert!(!err.message.is_empty());

        let err = SqliteError::from_code(libsqlite3_sys::SQLITE_BUSY_SNAPSHOT, "snap");
        assert!(err.is_busy());
        assert_eq!(err.message, "snap");
    }
}

use std::{
    os::raw::c_char,
    ptr::{NonNull, null, null_mut},
};

use bytes::{Buf, Bytes};
use libsqlite3_sys::{sqlite3, sqlite3_stmt};

use crate::{
    error::{Error, Result},
    sqlite::{ffi, statement::StatementHandle},
};

/// Check that `sql` can be handed to `sqlite3_prepare_v3` at all.
pub(super) fn validate(sql: &str) -> Result<()> {
    if sql.is_empty() {
        return Err(Error::InvalidStatement("empty statements are illegal".into()));
    }

    if sql.len() > i32::MAX as usize {
        return Err(Error::InvalidStatement(format!(
            "statement text must be smaller than {} bytes",
            i32::MAX
        )));
    }

    // SQLite would silently stop reading at the nul byte.
    if sql.as_bytes().contains(&0) {
        return Err(Error::InvalidStatement("statement text contains nul bytes".into()));
    }

    Ok(())
}

/// Compile the first executable statement in `sql`.
///
/// Leading statements that compile to nothing (comments, whitespace, lone `;`) are skipped.
/// `Ok(None)` means the whole text compiled to nothing, which is a valid no-op statement.
pub(super) fn compile(conn: *mut sqlite3, sql: &str) -> Result<Option<StatementHandle>> {
    validate(sql)?;

    let mut query = Bytes::copy_from_slice(sql.as_bytes());

    // Each pass either returns or advances `query` by at least one byte.
    while !query.is_empty() {
        let mut statement_handle: *mut sqlite3_stmt = null_mut();
        let mut tail: *const c_char = null();

        let query_ptr = query.as_ptr() as *const c_char;
        let query_len = query.len() as i32;

        // <https://www.sqlite.org/c3ref/prepare.html>
        let prepared = ffi::prepare_v3(
            conn,
            query_ptr,
            query_len,
            0,
            &mut statement_handle,
            &mut tail,
        );

        if let Err(e) = prepared {
            // SQLite documents the out pointer as NULL on error, but never leak it.
            if !statement_handle.is_null() {
                ffi::finalize(statement_handle);
            }
            return Err(e.into());
        }

        if let Some(handle) = NonNull::new(statement_handle) {
            return Ok(Some(StatementHandle::new(handle)));
        }

        // tail points to the first byte past the statement SQLite just consumed.
        let consumed = if tail.is_null() {
            query.len()
        } else {
            (tail as usize) - (query_ptr as usize)
        };

        if consumed == 0 {
            // SQLite made no progress; nothing executable remains.
            break;
        }

        query.advance(consumed);
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::Error;

    #[test]
    fn rejects_empty_text() {
        assert!(matches!(validate(""), Err(Error::InvalidStatement(_))));
    }

    #[test]
    fn rejects_interior_nul() {
        assert!(matches!(
            validate("SELECT 1;\0SELECT 2"),
            Err(Error::InvalidStatement(msg)) if msg.contains("nul")
        ));
    }

    #[test]
    fn whitespace_is_not_empty() {
        assert!(validate("   ").is_ok());
        assert!(validate("-- nothing here").is_ok());
    }
}

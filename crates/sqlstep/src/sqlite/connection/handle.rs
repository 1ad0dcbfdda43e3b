use std::{ffi::CString, ptr::NonNull};

use libsqlite3_sys::sqlite3;

use crate::{Error, Result, sqlite::ffi};

/// Owned `sqlite3` database handle. Closed when dropped.
#[derive(Debug)]
pub(crate) struct ConnectionHandle(NonNull<sqlite3>);

// A database handle may move between threads as long as only one thread uses it at a
// time, which `&mut`/`!Sync` access through `Connection` upholds.
// <https://www.sqlite.org/c3ref/threadsafe.html>
unsafe impl Send for ConnectionHandle {}

impl ConnectionHandle {
    pub(super) fn new(ptr: NonNull<sqlite3>) -> Self {
        Self(ptr)
    }

    pub(crate) fn as_ptr(&self) -> *mut sqlite3 {
        self.0.as_ptr()
    }

    pub(crate) fn last_insert_rowid(&self) -> i64 {
        ffi::last_insert_rowid(self.as_ptr())
    }

    /// Run one or more statements that return no rows.
    pub(crate) fn exec(&self, query: &str) -> Result<()> {
        let query = CString::new(query)
            .map_err(|_| Error::InvalidStatement("statement text contains nul bytes".into()))?;
        ffi::exec(self.as_ptr(), query.as_ptr())?;
        Ok(())
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        // https://sqlite.org/c3ref/close.html
        if let Err(e) = ffi::close(self.0.as_ptr()) {
            // Statements borrow their connection, so an unfinalized statement here means
            // a handle escaped its owner.
            panic!("{e}");
        }
    }
}

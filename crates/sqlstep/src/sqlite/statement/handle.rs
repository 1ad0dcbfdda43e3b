use std::ffi::CStr;
use std::ptr::NonNull;

use libsqlite3_sys::{SQLITE_MISUSE, SQLITE_OK, sqlite3, sqlite3_stmt};

use crate::sqlite::{SqliteError, ffi};

/// Owned `sqlite3_stmt`. Finalized when dropped.
#[derive(Debug)]
pub(crate) struct StatementHandle(NonNull<sqlite3_stmt>);

// access to SQLite3 statement handles are safe to send between threads
// as long as the `sqlite3_step` call is serialized.

unsafe impl Send for StatementHandle {}

impl StatementHandle {
    pub(super) fn new(ptr: NonNull<sqlite3_stmt>) -> Self {
        Self(ptr)
    }

    pub(crate) fn as_ptr(&self) -> *mut sqlite3_stmt {
        self.0.as_ptr()
    }

    fn db_handle(&self) -> *mut sqlite3 {
        // O(c) access to the connection handle for this statement handle
        // https://sqlite.org/c3ref/db_handle.html
        ffi::db_handle(self.as_ptr())
    }

    pub(crate) fn last_error(&self) -> SqliteError {
        SqliteError::new(self.db_handle())
    }

    pub(crate) fn column_count(&self) -> usize {
        // https://sqlite.org/c3ref/column_count.html
        ffi::column_count(self.as_ptr()) as usize
    }

    pub(crate) fn changes(&self) -> u64 {
        // returns the number of changes of the *last* statement run on the connection
        // https://sqlite.org/c3ref/changes.html
        ffi::changes(self.db_handle()) as u64
    }

    pub(crate) fn column_name(&self, index: usize) -> String {
        // https://sqlite.org/c3ref/column_name.html
        let name = ffi::column_name(self.as_ptr(), index as i32);
        if name.is_null() {
            // only on OOM
            return String::new();
        }
        unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned()
    }

    /// The declared type text of a result column, or `None` for expressions and subqueries.
    pub(crate) fn column_decltype(&self, index: usize) -> Option<String> {
        let decl = ffi::column_decltype(self.as_ptr(), index as i32);
        if decl.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(decl) }.to_string_lossy().into_owned())
    }

    // Number Of SQL Parameters
    // https://www.sqlite.org/c3ref/bind_parameter_count.html

    pub(crate) fn bind_parameter_count(&self) -> usize {
        ffi::bind_parameter_count(self.as_ptr()) as usize
    }

    // Binding Values To Prepared Statements
    // NOTE: The first host parameter has an index of 1, not 0.
    // https://www.sqlite.org/c3ref/bind_blob.html

    pub(crate) fn bind_blob(&mut self, index: usize, v: &[u8]) -> Result<(), SqliteError> {
        ffi::bind_blob64(self.as_ptr(), index as i32, v)
    }

    pub(crate) fn bind_text(&mut self, index: usize, v: &str) -> Result<(), SqliteError> {
        ffi::bind_text64(self.as_ptr(), index as i32, v)
    }

    pub(crate) fn bind_int(&mut self, index: usize, v: i32) -> Result<(), SqliteError> {
        ffi::bind_int(self.as_ptr(), index as i32, v)
    }

    pub(crate) fn bind_int64(&mut self, index: usize, v: i64) -> Result<(), SqliteError> {
        ffi::bind_int64(self.as_ptr(), index as i32, v)
    }

    pub(crate) fn bind_double(&mut self, index: usize, v: f64) -> Result<(), SqliteError> {
        ffi::bind_double(self.as_ptr(), index as i32, v)
    }

    pub(crate) fn bind_null(&mut self, index: usize) -> Result<(), SqliteError> {
        ffi::bind_null(self.as_ptr(), index as i32)
    }

    // Result values from the current row. Column indices start at 0.
    // https://www.sqlite.org/c3ref/column_blob.html

    pub(crate) fn column_type(&self, index: usize) -> i32 {
        ffi::column_type(self.as_ptr(), index as i32)
    }

    pub(crate) fn column_int64(&self, index: usize) -> i64 {
        ffi::column_int64(self.as_ptr(), index as i32)
    }

    pub(crate) fn column_double(&self, index: usize) -> f64 {
        ffi::column_double(self.as_ptr(), index as i32)
    }

    pub(crate) fn column_bytes(&self, index: usize) -> Vec<u8> {
        ffi::column_bytes_owned(self.as_ptr(), index as i32)
    }

    pub(crate) fn clear_bindings(&mut self) {
        ffi::clear_bindings(self.as_ptr());
    }

    /// Rewind the statement so it can be stepped again.
    ///
    /// The returned error repeats the status of the most recent failed step, if any.
    pub(crate) fn reset(&mut self) -> Result<(), SqliteError> {
        ffi::reset(self.as_ptr())
    }

    /// Advance the statement, returning SQLite's raw status code.
    pub(crate) fn step(&mut self) -> i32 {
        ffi::step(self.as_ptr())
    }
}

impl Drop for StatementHandle {
    fn drop(&mut self) {
        let db = self.db_handle();

        // Reset first so sqlite3_finalize does not report a stale step error.
        if let Err(e) = self.reset() {
            tracing::debug!(error = %e, "sqlite3_reset before finalize reported an error");
        }

        // https://sqlite.org/c3ref/finalize.html
        let status = ffi::finalize(self.as_ptr());
        if status == SQLITE_MISUSE {
            // sqlite3_finalize reports misuse at least for a double free, which would mean
            // this handle was aliased.
            panic!("Detected sqlite3_finalize misuse.");
        } else if status != SQLITE_OK {
            tracing::error!("sqlite3_finalize failed: {}", SqliteError::new(db));
        }
    }
}

// Safe wrappers around the libsqlite3_sys functions used by the statement lifecycle.
// Every `unsafe` call into the SQLite C API lives here so the rest of the crate
// only deals with raw pointers it was handed by these functions.

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};
use std::ptr;

use crate::sqlite::error::SqliteError;
use libsqlite3_sys::{self as ffi_sys, sqlite3, sqlite3_stmt};

#[allow(dead_code)]
const fn assert_c_int_is_32bit() {
    assert!(std::mem::size_of::<c_int>() == 4);
}

// Parameter and column indices are passed through as `i32`.
const _ASSERT_C_INT_32BIT: () = assert_c_int_is_32bit();

fn check(db: *mut sqlite3, rc: c_int) -> Result<(), SqliteError> {
    if rc == ffi_sys::SQLITE_OK {
        Ok(())
    } else {
        Err(SqliteError::new(db))
    }
}

fn check_stmt(stmt: *mut sqlite3_stmt, rc: c_int) -> Result<(), SqliteError> {
    if rc == ffi_sys::SQLITE_OK {
        Ok(())
    } else {
        Err(SqliteError::new(db_handle(stmt)))
    }
}

/// Wrapper around [`sqlite3_open_v2`].
pub(crate) fn open_v2(
    filename: *const c_char,
    handle: *mut *mut sqlite3,
    flags: i32,
    vfs: *const c_char,
) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_open_v2(filename, handle, flags as c_int, vfs) };
    if rc == ffi_sys::SQLITE_OK {
        return Ok(());
    }

    // handle may be null on OOM
    let db = unsafe { *handle };
    if db.is_null() {
        return Err(SqliteError::from_code(rc, "sqlite3_open_v2 failed"));
    }

    let err = SqliteError::new(db);
    unsafe {
        ffi_sys::sqlite3_close(db);
        *handle = ptr::null_mut();
    }
    Err(err)
}

/// Wrapper around [`sqlite3_extended_result_codes`].
pub(crate) fn extended_result_codes(db: *mut sqlite3, onoff: bool) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_extended_result_codes(db, onoff as c_int) };
    check(db, rc)
}

/// Wrapper around [`sqlite3_busy_timeout`].
pub(crate) fn busy_timeout(db: *mut sqlite3, ms: i32) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_busy_timeout(db, ms as c_int) };
    check(db, rc)
}

/// Wrapper around [`sqlite3_prepare_v3`].
///
/// On failure `stmt` may still have been written; the caller owns whatever it points to.
pub(crate) fn prepare_v3(
    db: *mut sqlite3,
    sql: *const c_char,
    n_byte: i32,
    flags: u32,
    stmt: *mut *mut sqlite3_stmt,
    tail: *mut *const c_char,
) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_prepare_v3(db, sql, n_byte as c_int, flags, stmt, tail) };
    check(db, rc)
}

/// Wrapper around [`sqlite3_extended_errcode`].
pub(crate) fn extended_errcode(db: *mut sqlite3) -> i32 {
    unsafe { ffi_sys::sqlite3_extended_errcode(db) as i32 }
}

/// Wrapper around [`sqlite3_errmsg`].
pub(crate) fn errmsg(db: *mut sqlite3) -> *const c_char {
    unsafe { ffi_sys::sqlite3_errmsg(db) }
}

/// Wrapper around [`sqlite3_errstr`]. The returned string is static.
pub(crate) fn errstr(code: i32) -> *const c_char {
    unsafe { ffi_sys::sqlite3_errstr(code as c_int) }
}

/// Wrapper around [`sqlite3_close`].
pub(crate) fn close(db: *mut sqlite3) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_close(db) };
    check(db, rc)
}

/// Wrapper around [`sqlite3_exec`] with no callback.
pub(crate) fn exec(db: *mut sqlite3, sql: *const c_char) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_exec(db, sql, None, ptr::null_mut(), ptr::null_mut()) };
    check(db, rc)
}

/// Wrapper around [`sqlite3_last_insert_rowid`].
pub(crate) fn last_insert_rowid(db: *mut sqlite3) -> i64 {
    unsafe { ffi_sys::sqlite3_last_insert_rowid(db) }
}

/// Wrapper around [`sqlite3_changes64`].
pub(crate) fn changes(db: *mut sqlite3) -> i64 {
    unsafe { ffi_sys::sqlite3_changes64(db) }
}

/// Wrapper around [`sqlite3_db_handle`].
pub(crate) fn db_handle(stmt: *mut sqlite3_stmt) -> *mut sqlite3 {
    unsafe { ffi_sys::sqlite3_db_handle(stmt) }
}

/// Wrapper around [`sqlite3_column_count`].
pub(crate) fn column_count(stmt: *mut sqlite3_stmt) -> i32 {
    unsafe { ffi_sys::sqlite3_column_count(stmt) as i32 }
}

/// Wrapper around [`sqlite3_column_name`]. Returns a pointer to a null terminated string.
pub(crate) fn column_name(stmt: *mut sqlite3_stmt, index: i32) -> *const c_char {
    unsafe { ffi_sys::sqlite3_column_name(stmt, index as c_int) }
}

/// Wrapper around [`sqlite3_column_decltype`].
pub(crate) fn column_decltype(stmt: *mut sqlite3_stmt, index: i32) -> *const c_char {
    unsafe { ffi_sys::sqlite3_column_decltype(stmt, index as c_int) }
}

/// Wrapper around [`sqlite3_bind_parameter_count`].
pub(crate) fn bind_parameter_count(stmt: *mut sqlite3_stmt) -> i32 {
    unsafe { ffi_sys::sqlite3_bind_parameter_count(stmt) as i32 }
}

/// Wrapper around [`sqlite3_bind_blob64`].
pub(crate) fn bind_blob64(
    stmt: *mut sqlite3_stmt,
    index: i32,
    data: &[u8],
) -> Result<(), SqliteError> {
    let rc = unsafe {
        ffi_sys::sqlite3_bind_blob64(
            stmt,
            index as c_int,
            data.as_ptr() as *const c_void,
            data.len() as u64,
            ffi_sys::SQLITE_TRANSIENT(),
        )
    };
    check_stmt(stmt, rc)
}

/// Wrapper around [`sqlite3_bind_text64`].
pub(crate) fn bind_text64(
    stmt: *mut sqlite3_stmt,
    index: i32,
    data: &str,
) -> Result<(), SqliteError> {
    let rc = unsafe {
        ffi_sys::sqlite3_bind_text64(
            stmt,
            index as c_int,
            data.as_ptr() as *const c_char,
            data.len() as u64,
            ffi_sys::SQLITE_TRANSIENT(),
            ffi_sys::SQLITE_UTF8 as u8,
        )
    };
    check_stmt(stmt, rc)
}

/// Wrapper around [`sqlite3_bind_int`].
pub(crate) fn bind_int(stmt: *mut sqlite3_stmt, index: i32, value: i32) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_bind_int(stmt, index as c_int, value as c_int) };
    check_stmt(stmt, rc)
}

/// Wrapper around [`sqlite3_bind_int64`].
pub(crate) fn bind_int64(
    stmt: *mut sqlite3_stmt,
    index: i32,
    value: i64,
) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_bind_int64(stmt, index as c_int, value) };
    check_stmt(stmt, rc)
}

/// Wrapper around [`sqlite3_bind_double`].
pub(crate) fn bind_double(
    stmt: *mut sqlite3_stmt,
    index: i32,
    value: f64,
) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_bind_double(stmt, index as c_int, value) };
    check_stmt(stmt, rc)
}

/// Wrapper around [`sqlite3_bind_null`].
pub(crate) fn bind_null(stmt: *mut sqlite3_stmt, index: i32) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_bind_null(stmt, index as c_int) };
    check_stmt(stmt, rc)
}

/// Wrapper around [`sqlite3_column_type`].
pub(crate) fn column_type(stmt: *mut sqlite3_stmt, index: i32) -> i32 {
    unsafe { ffi_sys::sqlite3_column_type(stmt, index as c_int) as i32 }
}

/// Wrapper around [`sqlite3_column_int64`].
pub(crate) fn column_int64(stmt: *mut sqlite3_stmt, index: i32) -> i64 {
    unsafe { ffi_sys::sqlite3_column_int64(stmt, index as c_int) }
}

/// Wrapper around [`sqlite3_column_double`].
pub(crate) fn column_double(stmt: *mut sqlite3_stmt, index: i32) -> f64 {
    unsafe { ffi_sys::sqlite3_column_double(stmt, index as c_int) }
}

/// Copy out the bytes of a TEXT or BLOB column.
///
/// Wraps [`sqlite3_column_blob`] followed by [`sqlite3_column_bytes`], in that order, so
/// the length refers to the buffer the pointer was taken from.
pub(crate) fn column_bytes_owned(stmt: *mut sqlite3_stmt, index: i32) -> Vec<u8> {
    unsafe {
        let ptr = ffi_sys::sqlite3_column_blob(stmt, index as c_int) as *const u8;
        let len = ffi_sys::sqlite3_column_bytes(stmt, index as c_int);
        if ptr.is_null() || len <= 0 {
            return Vec::new();
        }
        std::slice::from_raw_parts(ptr, len as usize).to_vec()
    }
}

/// Wrapper around [`sqlite3_clear_bindings`].
pub(crate) fn clear_bindings(stmt: *mut sqlite3_stmt) {
    unsafe { ffi_sys::sqlite3_clear_bindings(stmt) };
}

/// Wrapper around [`sqlite3_reset`].
pub(crate) fn reset(stmt: *mut sqlite3_stmt) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_reset(stmt) };
    check_stmt(stmt, rc)
}

/// Wrapper around [`sqlite3_step`]. Returns the raw status code.
pub(crate) fn step(stmt: *mut sqlite3_stmt) -> i32 {
    unsafe { ffi_sys::sqlite3_step(stmt) as i32 }
}

/// Wrapper around [`sqlite3_finalize`]. Returns the raw status code.
///
/// The statement pointer is dangling once this returns, so no error is built from it.
pub(crate) fn finalize(stmt: *mut sqlite3_stmt) -> i32 {
    unsafe { ffi_sys::sqlite3_finalize(stmt) as i32 }
}

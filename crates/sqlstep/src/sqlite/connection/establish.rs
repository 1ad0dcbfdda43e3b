use std::{
    ffi::CString,
    io,
    ptr::{NonNull, null, null_mut},
    time::Duration,
};

use libsqlite3_sys::{
    SQLITE_OPEN_CREATE, SQLITE_OPEN_MEMORY, SQLITE_OPEN_NOMUTEX, SQLITE_OPEN_PRIVATECACHE,
    SQLITE_OPEN_READONLY, SQLITE_OPEN_READWRITE,
};

use crate::{Error, Options, Result, sqlite::connection::handle::ConnectionHandle, sqlite::ffi};

/// Everything `sqlite3_open_v2` needs, resolved from [`Options`].
pub(crate) struct EstablishParams {
    filename: CString,
    open_flags: i32,
    busy_timeout: Duration,
}

impl EstablishParams {
    pub(crate) fn from_options(options: &Options) -> Result<Self> {
        let filename = options.filename.to_str().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "filename passed to SQLite must be valid UTF-8",
            )
        })?;

        // Statements borrow the connection, so SQLite's own mutexes are never needed.
        let mut flags = SQLITE_OPEN_NOMUTEX | SQLITE_OPEN_PRIVATECACHE;

        flags |= if options.read_only {
            SQLITE_OPEN_READONLY
        } else if options.create_if_missing || options.in_memory {
            SQLITE_OPEN_CREATE | SQLITE_OPEN_READWRITE
        } else {
            SQLITE_OPEN_READWRITE
        };

        if options.in_memory {
            flags |= SQLITE_OPEN_MEMORY;
        }

        let filename = CString::new(filename).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "filename passed to SQLite must not contain nul bytes",
            )
        })?;

        Ok(Self {
            filename,
            open_flags: flags,
            busy_timeout: options.busy_timeout,
        })
    }

    /// Open the database.
    ///
    /// The busy timeout is passed to `sqlite3_busy_timeout` in milliseconds, clamped to
    /// `i32::MAX`.
    pub(crate) fn establish(&self) -> Result<ConnectionHandle> {
        let mut handle = null_mut();

        // <https://www.sqlite.org/c3ref/open.html>
        ffi::open_v2(self.filename.as_ptr(), &mut handle, self.open_flags, null())?;

        let Some(handle) = NonNull::new(handle) else {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::OutOfMemory,
                "SQLite is unable to allocate memory to hold the sqlite3 object",
            )));
        };
        let handle = ConnectionHandle::new(handle);

        // https://www.sqlite.org/c3ref/extended_result_codes.html
        ffi::extended_result_codes(handle.as_ptr(), true)?;

        // SQLite sleeps in increasing intervals while a table is locked during a step.
        let ms = i32::try_from(self.busy_timeout.as_millis()).unwrap_or(i32::MAX);
        ffi::busy_timeout(handle.as_ptr(), ms)?;

        Ok(handle)
    }
}

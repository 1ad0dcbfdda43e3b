use std::fmt::{self, Debug, Formatter};

use libsqlite3_sys::sqlite3;

use crate::{
    Options, Result, Statement, logger::LogSettings,
    sqlite::connection::{establish::EstablishParams, handle::ConnectionHandle},
};

mod establish;
mod handle;

/// An open SQLite database.
///
/// Every [`Statement`] borrows the connection it was created from, so the database
/// cannot be closed while a statement still holds a prepared handle. Dropping the
/// connection closes the database.
pub struct Connection {
    handle: ConnectionHandle,
    log_settings: LogSettings,
}

impl Debug for Connection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("handle", &self.handle)
            .field("log_settings", &self.log_settings)
            .finish()
    }
}

impl Connection {
    /// Open a database with `options`, then run its configured pragmas.
    pub fn open(options: &Options) -> Result<Self> {
        let handle = EstablishParams::from_options(options)?.establish()?;
        let conn = Self {
            handle,
            log_settings: options.log_settings.clone(),
        };

        let pragmas = options.pragma_string();
        if !pragmas.is_empty() {
            conn.execute_batch(&pragmas)?;
        }

        tracing::debug!(filename = %options.filename.display(), "opened database");
        Ok(conn)
    }

    /// Open a private in-memory database with default options.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&Options::new().in_memory())
    }

    /// Create a statement for `sql`. Nothing is compiled until it is used.
    pub fn statement(&self, sql: &str) -> Statement<'_> {
        Statement::new(self, sql)
    }

    /// Run a batch of `;`-separated statements that return no rows.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.handle.exec(sql)
    }

    /// Rowid of the most recent successful `INSERT` on this connection.
    pub fn last_insert_rowid(&self) -> i64 {
        self.handle.last_insert_rowid()
    }

    pub(crate) fn as_ptr(&self) -> *mut sqlite3 {
        self.handle.as_ptr()
    }

    pub(crate) fn log_settings(&self) -> &LogSettings {
        &self.log_settings
    }
}

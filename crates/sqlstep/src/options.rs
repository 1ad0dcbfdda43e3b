use std::{
    fmt::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use indexmap::IndexMap;
use log::LevelFilter;

use crate::{Connection, Result, logger::LogSettings};

enum_mode! {
    /// Refer to [SQLite documentation] for the meaning of the database journaling mode.
    ///
    /// [SQLite documentation]: https://www.sqlite.org/pragma.html#pragma_journal_mode
    pub JournalMode {
        Delete => "DELETE",
        Truncate => "TRUNCATE",
        Persist => "PERSIST",
        Memory => "MEMORY",
        Wal => "WAL",
        Off => "OFF",
    }
    default Delete
}

enum_mode! {
    /// Refer to [SQLite documentation] for the meaning of various synchronous settings.
    ///
    /// [SQLite documentation]: https://www.sqlite.org/pragma.html#pragma_synchronous
    pub Synchronous {
        Off => "OFF",
        Normal => "NORMAL",
        Full => "FULL",
        Extra => "EXTRA",
    }
    default Full
}

/// Configuration for opening a [`Connection`].
#[derive(Clone, Debug)]
pub struct Options {
    pub(crate) filename: PathBuf,
    pub(crate) in_memory: bool,
    pub(crate) read_only: bool,
    pub(crate) create_if_missing: bool,
    pub(crate) busy_timeout: Duration,
    pub(crate) log_settings: LogSettings,

    pub(crate) pragmas: IndexMap<String, Option<String>>,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    /// Construct `Self` with default options: an in-memory database, foreign keys
    /// enforced and a five second busy timeout.
    #[must_use]
    pub fn new() -> Self {
        let mut pragmas: IndexMap<String, Option<String>> = IndexMap::new();

        // Insertion order is the order the pragmas run in, even if a setter later
        // overwrites the value. journal_mode stays unset unless requested, since WAL is
        // a persistent property of the database file.
        pragmas.insert("journal_mode".into(), None);
        pragmas.insert("foreign_keys".into(), Some("ON".into()));
        pragmas.insert("synchronous".into(), None);

        Self {
            filename: ":memory:".into(),
            in_memory: true,
            read_only: false,
            create_if_missing: false,
            busy_timeout: Duration::from_secs(5),
            log_settings: LogSettings::default(),
            pragmas,
        }
    }

    /// Sets the name of the database file. This turns off in-memory mode.
    #[must_use]
    pub fn filename(mut self, filename: impl AsRef<Path>) -> Self {
        self.filename = filename.as_ref().to_owned();
        self.in_memory = false;
        self
    }

    /// Use a private in-memory database.
    #[must_use]
    pub fn in_memory(mut self) -> Self {
        self.filename = ":memory:".into();
        self.in_memory = true;
        self
    }

    /// Set the enforcement of [foreign key constraints](https://www.sqlite.org/pragma.html#pragma_foreign_keys).
    ///
    /// Enabled by default.
    #[must_use]
    pub fn foreign_keys(self, on: bool) -> Self {
        self.pragma("foreign_keys", if on { "ON" } else { "OFF" })
    }

    /// Sets the [journal mode](https://www.sqlite.org/pragma.html#pragma_journal_mode).
    ///
    /// No journal mode is set by default, so an existing WAL database stays in WAL mode.
    #[must_use]
    pub fn journal_mode(self, mode: JournalMode) -> Self {
        self.pragma("journal_mode", mode.as_str())
    }

    /// Sets the [synchronous](https://www.sqlite.org/pragma.html#pragma_synchronous) setting.
    #[must_use]
    pub fn synchronous(self, synchronous: Synchronous) -> Self {
        self.pragma("synchronous", synchronous.as_str())
    }

    /// Open the database for read-only access.
    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Create the database file if it does not exist.
    ///
    /// By default, a missing file is an error.
    #[must_use]
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// How long a step waits on a locked database before failing with `SQLITE_BUSY`.
    ///
    /// The default busy timeout is 5 seconds.
    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets a custom pragma, run when the connection opens.
    #[must_use]
    pub fn pragma(mut self, key: &str, value: &str) -> Self {
        self.pragmas.insert(key.into(), Some(value.into()));
        self
    }

    #[must_use]
    pub fn log_statements(mut self, level: LevelFilter) -> Self {
        self.log_settings.log_statements(level);
        self
    }

    #[must_use]
    pub fn log_slow_statements(mut self, level: LevelFilter, duration: Duration) -> Self {
        self.log_settings.log_slow_statements(level, duration);
        self
    }

    /// Collect all `PRAGMA` commands into a single string.
    pub(crate) fn pragma_string(&self) -> String {
        let mut string = String::new();
        for (key, opt_value) in &self.pragmas {
            if let Some(value) = opt_value {
                write!(string, "PRAGMA {key} = {value}; ").ok();
            }
        }
        string
    }

    /// Open a connection with these options.
    pub fn open(&self) -> Result<Connection> {
        Connection::open(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pragmas_keep_insertion_order() {
        let options = Options::new()
            .pragma("cache_size", "-2000")
            .journal_mode(JournalMode::Wal)
            .foreign_keys(false);
        assert_eq!(
            options.pragma_string(),
            "PRAGMA journal_mode = WAL; PRAGMA foreign_keys = OFF; PRAGMA cache_size = -2000; "
        );
    }

    #[test]
    fn filename_leaves_memory_mode() {
        let options = Options::new();
        assert!(options.in_memory);
        let options = options.filename("db.sqlite");
        assert!(!options.in_memory);
        assert!(options.in_memory().in_memory);
    }

    #[test]
    fn mode_defaults() {
        assert_eq!(JournalMode::default(), JournalMode::Delete);
        assert_eq!(Synchronous::default().to_string(), "FULL");
    }
}

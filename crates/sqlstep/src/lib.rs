//! A synchronous SQLite statement driver.
//!
//! A [`Statement`] takes SQL text through its whole execution lifecycle: it compiles the
//! text into a prepared handle, binds caller-supplied [`Binding`]s, steps through the
//! result rows and writes each one into caller-supplied [`Extraction`] targets.
//!
//! ```no_run
//! use sqlstep::{Bind, Connection, ExtractAll};
//!
//! # fn main() -> sqlstep::Result<()> {
//! let conn = Connection::open_in_memory()?;
//! let mut names: Vec<String> = Vec::new();
//! let mut stmt = conn.statement("SELECT name FROM sqlite_schema WHERE type = ?");
//! stmt.execute(&mut [&mut Bind::new("table")], &mut [&mut ExtractAll::new(&mut names)])?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod enum_mode;

mod binding;
mod column;
pub mod decode;
pub mod encode;
mod error;
mod extraction;
mod logger;
mod options;
mod sqlite;
pub mod types;

pub use crate::{
    binding::{Bind, BindBatch, BindTuple, Binder, Binding},
    column::MetaColumn,
    decode::Decode,
    encode::Encode,
    error::{DecodeError, Error, Result},
    extraction::{Extract, ExtractAll, ExtractRow, Extraction, Extractor},
    logger::LogSettings,
    options::{JournalMode, Options, Synchronous},
    sqlite::{
        Connection, SqliteDataType, SqliteError, Statement, Value,
        error::{ExtendedErrCode, PrimaryErrCode},
    },
};

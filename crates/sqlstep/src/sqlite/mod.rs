pub use connection::Connection;
pub use error::SqliteError;
pub use statement::Statement;
pub use type_info::SqliteDataType;
pub use value::Value;

/// SQLite connection handling.
mod connection;
/// SQLite error types and helpers.
pub mod error;
/// Safe wrappers over the raw C API.
mod ffi;
/// The statement lifecycle.
pub(crate) mod statement;
/// SQLite type information utilities.
mod type_info;
/// SQLite value container and accessors.
pub mod value;

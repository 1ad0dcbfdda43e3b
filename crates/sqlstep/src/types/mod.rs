//! Conversions between Rust and **SQLite** types.
//!
//! # Types
//!
//! | Rust type                             | SQLite type(s)      |
//! |---------------------------------------|---------------------|
//! | `bool`                                | BOOLEAN             |
//! | `i8`, `i16`, `i32`                    | INTEGER             |
//! | `i64`                                 | BIGINT, INT8        |
//! | `u8`, `u16`, `u32`                    | INTEGER             |
//! | `f32`, `f64`                          | REAL                |
//! | `&str`, [`String`]                    | TEXT                |
//! | `&[u8]`, `Vec<u8>`                    | BLOB                |
//! | `time::Date`                          | DATE                |
//! | `time::Time`                          | TIME                |
//! | `time::PrimitiveDateTime`             | DATETIME            |
//! | `time::OffsetDateTime`                | DATETIME            |
//!
//! `u64` is not supported: SQLite integers are signed 64-bit values and there is no wider
//! type to widen into.
//!
//! # Nullable
//!
//! `Option<T>` is supported where `T` implements `Encode` or `Decode`. An `Option<T>` represents a potentially `NULL`
//! value from SQLite.

macro_rules! compatible {
    ($x:expr, $($y:path)|+) => {
        let t = $x.type_info();
        if !t.is_null() && !matches!(t, $($y)|+) {
            return Err(DecodeError::DataType(t))
        }
    };
}

mod bool;
mod bytes;
mod float;
mod int;
mod str;
mod time;

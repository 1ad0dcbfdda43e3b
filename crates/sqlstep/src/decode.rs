//! Provides [`Decode`] for decoding values from the database.
use std::result::Result as StdResult;

use crate::{Value, error::DecodeError};

/// A type that can be decoded from a column of the current row.
pub trait Decode: Sized {
    /// Decode a new value of this type using a raw value from the database.
    fn decode(value: &Value) -> StdResult<Self, DecodeError>;
}

// implement `Decode` for Option<T> for all SQL types
impl<T> Decode for Option<T>
where
    T: Decode,
{
    fn decode(value: &Value) -> StdResult<Self, DecodeError> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::decode(value)?))
        }
    }
}

impl Decode for Value {
    fn decode(value: &Value) -> StdResult<Self, DecodeError> {
        Ok(value.clone())
    }
}

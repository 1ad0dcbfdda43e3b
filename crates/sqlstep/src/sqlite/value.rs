use std::str::from_utf8;

use crate::{error::DecodeError, sqlite::type_info::SqliteDataType};

/// A single column value read from, or bound into, a statement.
///
/// The optional type is the declared type of the result column the value came from,
/// when SQLite knows it.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null(Option<SqliteDataType>),
    Integer(i64, Option<SqliteDataType>),
    Double(f64, Option<SqliteDataType>),
    Text(Vec<u8>, Option<SqliteDataType>),
    Blob(Vec<u8>, Option<SqliteDataType>),
}

impl Value {
    pub fn int(&self) -> std::result::Result<i32, DecodeError> {
        Ok(i32::try_from(self.int64()?)?)
    }

    pub fn int64(&self) -> std::result::Result<i64, DecodeError> {
        match self {
            Value::Integer(v, _) => Ok(*v),
            _ => Err(DecodeError::Conversion("not an integer".into())),
        }
    }

    pub fn double(&self) -> std::result::Result<f64, DecodeError> {
        match self {
            Value::Double(v, _) => Ok(*v),
            Value::Integer(v, _) => Ok(*v as f64),
            _ => Err(DecodeError::Conversion("not a float".into())),
        }
    }

    pub fn blob(&self) -> &[u8] {
        match self {
            Value::Blob(v, _) | Value::Text(v, _) => v.as_slice(),
            _ => &[],
        }
    }

    pub fn text(&self) -> std::result::Result<&str, DecodeError> {
        match self {
            Value::Text(v, _) => from_utf8(v).map_err(|e| DecodeError::Conversion(e.to_string())),
            _ => Err(DecodeError::Conversion("not text".into())),
        }
    }

    /// The declared type when known, otherwise the storage class of the value.
    pub fn type_info(&self) -> SqliteDataType {
        match self {
            Value::Null(t) => t.unwrap_or(SqliteDataType::Null),
            Value::Integer(_, t) => t.unwrap_or(SqliteDataType::Int),
            Value::Double(_, t) => t.unwrap_or(SqliteDataType::Float),
            Value::Text(_, t) => t.unwrap_or(SqliteDataType::Text),
            Value::Blob(_, t) => t.unwrap_or(SqliteDataType::Blob),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_type_wins_over_storage_class() {
        let v = Value::Integer(1, Some(SqliteDataType::Bool));
        assert_eq!(v.type_info(), SqliteDataType::Bool);
        assert_eq!(Value::Integer(1, None).type_info(), SqliteDataType::Int);
        assert_eq!(Value::Null(None).type_info(), SqliteDataType::Null);
    }

    #[test]
    fn narrowing_out_of_range_integer_fails() {
        let v = Value::Integer(i64::MAX, None);
        assert!(matches!(v.int(), Err(DecodeError::Conversion(_))));
        assert_eq!(v.int64().unwrap(), i64::MAX);
        assert_eq!(Value::Integer(3, None).double().unwrap(), 3.0);
    }
}

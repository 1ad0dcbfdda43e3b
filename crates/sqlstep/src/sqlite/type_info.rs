use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use libsqlite3_sys::{SQLITE_BLOB, SQLITE_FLOAT, SQLITE_INTEGER, SQLITE_NULL, SQLITE_TEXT};

/// Data types reported for SQLite result columns.
///
/// Declared column types are free text in SQLite; they are folded onto these variants
/// using the [affinity rules](https://www.sqlite.org/datatype3.html#affname), with a few
/// non-standard names recognised for dates and booleans.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SqliteDataType {
    Null,
    Int,
    Float,
    Text,
    Blob,

    /// Values that follow SQLite's `NUMERIC` affinity.
    Numeric,

    // non-standard extensions
    Bool,
    Int64,
    Date,
    Time,
    Datetime,
}

impl Display for SqliteDataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl SqliteDataType {
    pub fn is_null(&self) -> bool {
        matches!(self, SqliteDataType::Null)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SqliteDataType::Null => "NULL",
            SqliteDataType::Text => "TEXT",
            SqliteDataType::Float => "REAL",
            SqliteDataType::Blob => "BLOB",
            SqliteDataType::Int | SqliteDataType::Int64 => "INTEGER",
            SqliteDataType::Numeric => "NUMERIC",
            SqliteDataType::Bool => "BOOLEAN",
            SqliteDataType::Date => "DATE",
            SqliteDataType::Time => "TIME",
            SqliteDataType::Datetime => "DATETIME",
        }
    }

    /// Map a fundamental datatype code as returned by `sqlite3_column_type`.
    pub(crate) fn from_code(code: i32) -> Option<Self> {
        match code {
            SQLITE_INTEGER => Some(SqliteDataType::Int),
            SQLITE_FLOAT => Some(SqliteDataType::Float),
            SQLITE_BLOB => Some(SqliteDataType::Blob),
            SQLITE_NULL => Some(SqliteDataType::Null),
            SQLITE_TEXT => Some(SqliteDataType::Text),

            // https://sqlite.org/c3ref/c_blob.html
            _ => None,
        }
    }
}

// <https://www.sqlite.org/datatype3.html#affname>
impl FromStr for SqliteDataType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Ok(match lower.as_str() {
            "int4" => SqliteDataType::Int,
            "int8" => SqliteDataType::Int64,
            "boolean" | "bool" => SqliteDataType::Bool,

            "date" => SqliteDataType::Date,
            "time" => SqliteDataType::Time,
            "datetime" | "timestamp" => SqliteDataType::Datetime,

            _ if lower.contains("int") => SqliteDataType::Int64,

            _ if lower.contains("char") || lower.contains("clob") || lower.contains("text") => {
                SqliteDataType::Text
            }

            _ if lower.contains("blob") => SqliteDataType::Blob,

            _ if lower.contains("real") || lower.contains("floa") || lower.contains("doub") => {
                SqliteDataType::Float
            }

            // A column declared without a type has BLOB affinity.
            _ if lower.trim().is_empty() => SqliteDataType::Blob,

            _ => SqliteDataType::Numeric,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteDataType;

    #[test]
    fn declared_types_follow_affinity_rules() {
        let cases = [
            ("INT4", SqliteDataType::Int),
            ("INTEGER", SqliteDataType::Int64),
            ("UNSIGNED BIG INT", SqliteDataType::Int64),
            ("VARCHAR(255)", SqliteDataType::Text),
            ("NCHAR(55)", SqliteDataType::Text),
            ("CLOB", SqliteDataType::Text),
            ("BLOB", SqliteDataType::Blob),
            ("DOUBLE PRECISION", SqliteDataType::Float),
            ("DECIMAL(10,5)", SqliteDataType::Numeric),
            ("BOOL", SqliteDataType::Bool),
            ("TIMESTAMP", SqliteDataType::Datetime),
            ("date", SqliteDataType::Date),
            ("GEOMETRY", SqliteDataType::Numeric),
            ("", SqliteDataType::Blob),
        ];
        for (decl, expected) in cases {
            assert_eq!(Ok(expected), decl.parse(), "{decl}");
        }
    }

    #[test]
    fn fundamental_codes() {
        assert_eq!(
            SqliteDataType::from_code(libsqlite3_sys::SQLITE_TEXT),
            Some(SqliteDataType::Text)
        );
        assert!(SqliteDataType::from_code(9999).is_none());
    }
}

use std::sync::Arc;

use crate::sqlite::SqliteDataType;

/// Description of one result column, captured when a statement is compiled.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetaColumn {
    position: usize,
    name: Arc<str>,
    data_type: SqliteDataType,
    decl_type: Option<Arc<str>>,
}

impl MetaColumn {
    pub(crate) fn new(
        position: usize,
        name: impl Into<Arc<str>>,
        data_type: SqliteDataType,
        decl_type: Option<&str>,
    ) -> Self {
        Self {
            position,
            name: name.into(),
            data_type,
            decl_type: decl_type.map(Into::into),
        }
    }

    /// Zero-based position of the column in the result row.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type inferred for the column: its declared type, or `Null` for expressions.
    pub fn data_type(&self) -> SqliteDataType {
        self.data_type
    }

    /// The declared type exactly as written in the schema, if the column has one.
    pub fn decl_type(&self) -> Option<&str> {
        self.decl_type.as_deref()
    }
}

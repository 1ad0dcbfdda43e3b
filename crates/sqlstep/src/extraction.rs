//! Extraction targets: where a [`Statement`](crate::Statement) writes each result row.
//!
//! Like bindings, targets are borrowed from the caller for one
//! [`Statement::next`](crate::Statement::next) call. Each receives an [`Extractor`] over
//! the current row and its 0-based starting column.

use libsqlite3_sys::{SQLITE_BLOB, SQLITE_FLOAT, SQLITE_INTEGER, SQLITE_TEXT};

use crate::{
    Error, MetaColumn, Result, SqliteDataType, Value, decode::Decode,
    sqlite::statement::StatementHandle,
};

/// A destination for one or more consecutive columns of the current row.
pub trait Extraction {
    /// Number of result columns this target consumes. Always at least 1.
    fn columns_handled(&self) -> usize;

    /// Read this target's columns starting at `position` (0-based).
    fn extract(&mut self, extractor: &Extractor<'_>, position: usize) -> Result<()>;
}

/// Positional reader over the row the statement is currently positioned on.
pub struct Extractor<'h> {
    handle: &'h StatementHandle,
    columns: &'h [MetaColumn],
}

impl<'h> Extractor<'h> {
    pub(crate) fn new(handle: &'h StatementHandle, columns: &'h [MetaColumn]) -> Self {
        Self { handle, columns }
    }

    /// Number of columns in the current row.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Read column `position` as a [`Value`], tagged with the column's declared type.
    pub fn value(&self, position: usize) -> Result<Value> {
        let Some(column) = self.columns.get(position) else {
            return Err(Error::ColumnIndexOutOfBounds {
                index: position,
                len: self.columns.len(),
            });
        };

        // Only a type that came from the schema is attached; expressions carry none.
        let declared = match column.data_type() {
            SqliteDataType::Null => None,
            t => column.decl_type().map(|_| t),
        };

        Ok(match self.handle.column_type(position) {
            SQLITE_INTEGER => Value::Integer(self.handle.column_int64(position), declared),
            SQLITE_FLOAT => Value::Double(self.handle.column_double(position), declared),
            SQLITE_TEXT => Value::Text(self.handle.column_bytes(position), declared),
            SQLITE_BLOB => Value::Blob(self.handle.column_bytes(position), declared),
            _ => Value::Null(declared),
        })
    }

    /// Read and decode column `position`.
    pub fn get<T: Decode>(&self, position: usize) -> Result<T> {
        let value = self.value(position)?;
        T::decode(&value).map_err(|source| Error::ColumnDecode {
            index: position,
            source,
        })
    }
}

/// Writes a single column of the current row into a borrowed slot.
///
/// Each row overwrites the slot, so after iteration it holds the last row's value.
pub struct Extract<'a, T> {
    target: &'a mut T,
}

impl<'a, T: Decode> Extract<'a, T> {
    pub fn new(target: &'a mut T) -> Self {
        Self { target }
    }
}

impl<T: Decode> Extraction for Extract<'_, T> {
    fn columns_handled(&self) -> usize {
        1
    }

    fn extract(&mut self, extractor: &Extractor<'_>, position: usize) -> Result<()> {
        *self.target = extractor.get(position)?;
        Ok(())
    }
}

/// Appends one decoded column per row to a borrowed vector.
pub struct ExtractAll<'a, T> {
    target: &'a mut Vec<T>,
}

impl<'a, T: Decode> ExtractAll<'a, T> {
    pub fn new(target: &'a mut Vec<T>) -> Self {
        Self { target }
    }
}

impl<T: Decode> Extraction for ExtractAll<'_, T> {
    fn columns_handled(&self) -> usize {
        1
    }

    fn extract(&mut self, extractor: &Extractor<'_>, position: usize) -> Result<()> {
        self.target.push(extractor.get(position)?);
        Ok(())
    }
}

/// Appends `width` consecutive columns per row, undecoded, to a borrowed vector.
pub struct ExtractRow<'a> {
    target: &'a mut Vec<Vec<Value>>,
    width: usize,
}

impl<'a> ExtractRow<'a> {
    /// `width` must be at least 1.
    pub fn new(target: &'a mut Vec<Vec<Value>>, width: usize) -> Self {
        debug_assert!(width > 0, "a row extraction needs at least one column");
        Self { target, width }
    }
}

impl Extraction for ExtractRow<'_> {
    fn columns_handled(&self) -> usize {
        self.width
    }

    fn extract(&mut self, extractor: &Extractor<'_>, position: usize) -> Result<()> {
        let row = (position..position + self.width)
            .map(|i| extractor.value(i))
            .collect::<Result<Vec<_>>>()?;
        self.target.push(row);
        Ok(())
    }
}

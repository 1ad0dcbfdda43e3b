//! The statement lifecycle: compile, bind, step, extract, reset.

use std::sync::Arc;

use libsqlite3_sys::{SQLITE_MISUSE, SQLITE_SCHEMA};

use crate::{
    Connection, Error, MetaColumn, Result, SqliteDataType,
    binding::{Binder, Binding},
    extraction::{Extraction, Extractor},
    logger::QueryLogger,
};

mod compile;
mod cursor;
mod handle;

use cursor::{Cursor, StepStatus};
pub(crate) use handle::StatementHandle;

const ITERATOR_ERROR: &str = "iterator error: trying to access the next value";

/// A single SQL statement driven through its execution lifecycle.
///
/// A `Statement` owns at most one prepared handle, created by [`compile`](Self::compile)
/// and finalized by [`clear`](Self::clear) or on drop. Bindings and extraction targets
/// are never stored: they are lent to [`bind`](Self::bind) and [`next`](Self::next) for
/// the duration of one call.
///
/// Iteration is two-phase. [`has_next`](Self::has_next) steps SQLite at most once per
/// row and memoizes the answer; [`next`](Self::next) must then be called to consume the
/// row before the statement steps again.
pub struct Statement<'c> {
    conn: &'c Connection,
    sql: Arc<str>,
    handle: Option<StatementHandle>,
    columns: Vec<MetaColumn>,
    cursor: Cursor,
    logger: Option<QueryLogger>,
    rows_affected: u64,
}

impl<'c> Statement<'c> {
    pub(crate) fn new(conn: &'c Connection, sql: &str) -> Self {
        Self {
            conn,
            sql: sql.into(),
            handle: None,
            columns: Vec::new(),
            cursor: Cursor::default(),
            logger: None,
            rows_affected: 0,
        }
    }

    /// The SQL text this statement was created with.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// `true` once a prepared handle exists. Text that compiles to nothing leaves this
    /// `false` even after a successful [`compile`](Self::compile).
    pub fn is_compiled(&self) -> bool {
        self.handle.is_some()
    }

    /// Compile the statement text. Does nothing if a handle already exists.
    ///
    /// Leading comments and whitespace are skipped. Text with nothing executable in it
    /// compiles to a legal no-op statement that returns no rows.
    pub fn compile(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        let handle = compile::compile(self.conn.as_ptr(), &self.sql)?;

        self.clear();
        if let Some(handle) = &handle {
            self.columns = (0..handle.column_count())
                .map(|i| {
                    let decl = handle.column_decltype(i);
                    let data_type = decl
                        .as_deref()
                        .and_then(|d| d.parse().ok())
                        .or_else(|| SqliteDataType::from_code(handle.column_type(i)))
                        .unwrap_or(SqliteDataType::Null);
                    MetaColumn::new(i, handle.column_name(i), data_type, decl.as_deref())
                })
                .collect();
        }
        self.handle = handle;

        tracing::trace!(
            sql = %self.sql,
            columns = self.columns.len(),
            noop = self.handle.is_none(),
            "compiled statement"
        );
        Ok(())
    }

    /// Bind parameters for the next execution.
    ///
    /// The handle is reset first, so any previous execution is abandoned. Bindings are
    /// applied in order at 1-based slots; binding stops, without error, at the first
    /// entry whose [`Binding::can_bind`] is `false`.
    pub fn bind(&mut self, bindings: &mut [&mut dyn Binding]) -> Result<()> {
        self.cursor = Cursor::default();
        self.logger = None;

        let Some(handle) = self.handle.as_mut() else {
            return Ok(());
        };

        // The reset status only repeats the outcome of the previous step.
        let _ = handle.reset();
        handle.clear_bindings();

        let declared = handle.bind_parameter_count();
        match bindings.first() {
            None if declared > 0 => {
                return Err(Error::ParameterCountMismatch {
                    expected: declared,
                    actual: 0,
                });
            }
            None => {}
            Some(first) => {
                let width = first.columns_handled();
                if bindings.iter().any(|b| b.columns_handled() != width) {
                    tracing::warn!(
                        sql = %self.sql,
                        "bindings of differing widths; arity is checked against the first"
                    );
                }

                let supplied = bindings.len() * width;
                if supplied != declared {
                    return Err(Error::ParameterCountMismatch {
                        expected: declared,
                        actual: supplied,
                    });
                }
            }
        }

        let mut binder = Binder::new(handle);
        let mut position = 1;
        for binding in bindings.iter_mut() {
            if !binding.can_bind() {
                break;
            }
            let width = binding.columns_handled();
            binding.bind(&mut binder, position)?;
            position += width;
        }

        let settings = self.conn.log_settings();
        if settings.is_enabled() {
            self.logger = Some(QueryLogger::new(self.sql.clone(), settings.clone()));
        }

        Ok(())
    }

    /// Whether another round of bindings is ready.
    ///
    /// Only the first binding is consulted; bindings are expected to be staged together.
    pub fn can_bind(&self, bindings: &[&mut dyn Binding]) -> bool {
        self.handle.is_some() && bindings.first().is_some_and(|b| b.can_bind())
    }

    /// Whether a row is available, stepping the statement if it has not been stepped
    /// for the current position yet.
    pub fn has_next(&mut self) -> Result<bool> {
        if let Some(memo) = self.cursor.memoized() {
            return Ok(memo);
        }

        let Some(handle) = self.handle.as_mut() else {
            return Ok(self.cursor.record(StepStatus::Done));
        };

        let status = StepStatus::from_code(handle.step());
        let row = self.cursor.record(status);

        match status {
            StepStatus::Error(_) => {
                let err = handle.last_error();
                self.logger = None;
                Err(err.into())
            }
            StepStatus::Done => {
                self.rows_affected = handle.changes();
                if let Some(mut logger) = self.logger.take() {
                    logger.increase_rows_affected(self.rows_affected);
                }
                Ok(false)
            }
            _ => Ok(row),
        }
    }

    /// Consume the current row, writing its columns into `extractions` in order.
    ///
    /// Fails with [`Error::NoData`] once the statement is exhausted. Each row is
    /// delivered once: a second call without an intervening [`has_next`](Self::has_next)
    /// fails. If the result shape changed since [`compile`](Self::compile), fails with
    /// `SQLITE_SCHEMA` before any target is written; clear and compile again to pick up
    /// the new columns.
    pub fn next(&mut self, extractions: &mut [&mut dyn Extraction]) -> Result<()> {
        match self.cursor.status {
            StepStatus::Row => {}
            StepStatus::Done => return Err(Error::NoData),
            StepStatus::Error(code) => return Err(Error::from_status(code, ITERATOR_ERROR)),
            StepStatus::NotStarted => return Err(Error::from_status(SQLITE_MISUSE, ITERATOR_ERROR)),
        }

        let Some(handle) = self.handle.as_ref() else {
            return Err(Error::from_status(SQLITE_MISUSE, ITERATOR_ERROR));
        };
        // SQLite re-prepares after a schema change, which can widen `SELECT *`.
        let live = handle.column_count();
        if live != self.columns.len() {
            return Err(Error::from_status(
                SQLITE_SCHEMA,
                format!(
                    "column count changed since compile: compiled with {}, now {live}",
                    self.columns.len()
                ),
            ));
        }

        let extractor = Extractor::new(handle, &self.columns);
        let mut position = 0;
        for extraction in extractions.iter_mut() {
            extraction.extract(&extractor, position)?;
            position += extraction.columns_handled();
        }

        self.cursor.consume();
        if let Some(logger) = self.logger.as_mut() {
            logger.increment_rows_returned();
        }
        Ok(())
    }

    /// Finalize the handle and forget the column metadata. Safe to call repeatedly.
    pub fn clear(&mut self) {
        self.logger = None;
        self.columns.clear();
        self.handle = None;
        self.cursor = Cursor::default();
    }

    /// Number of columns each result row carries.
    pub fn columns_returned(&self) -> usize {
        self.columns.len()
    }

    /// Metadata for the result column at `position` (0-based).
    pub fn meta_column(&self, position: usize) -> Result<&MetaColumn> {
        self.columns
            .get(position)
            .ok_or(Error::ColumnIndexOutOfBounds {
                index: position,
                len: self.columns.len(),
            })
    }

    pub fn columns(&self) -> &[MetaColumn] {
        &self.columns
    }

    /// Number of parameter slots the compiled statement declares.
    pub fn parameter_count(&self) -> usize {
        self.handle
            .as_ref()
            .map_or(0, StatementHandle::bind_parameter_count)
    }

    /// Rows changed by the most recent execution that ran to completion, as reported by
    /// `sqlite3_changes64`.
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// Run the statement to completion once per round of bindings.
    ///
    /// Compiles if needed, rewinds every binding, then binds and drains rows until the
    /// bindings are exhausted. A statement without bindings runs exactly once. Returns
    /// the number of rows extracted.
    pub fn execute(
        &mut self,
        bindings: &mut [&mut dyn Binding],
        extractions: &mut [&mut dyn Extraction],
    ) -> Result<u64> {
        self.compile()?;
        for binding in bindings.iter_mut() {
            binding.reset();
        }

        if !bindings.is_empty() && !self.can_bind(bindings) {
            return Ok(0);
        }

        let mut rows = 0;
        loop {
            self.bind(bindings)?;
            while self.has_next()? {
                self.next(extractions)?;
                rows += 1;
            }
            if !self.can_bind(bindings) {
                break;
            }
        }
        Ok(rows)
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("compiled", &self.handle.is_some())
            .field("columns", &self.columns)
            .field("cursor", &self.cursor)
            .finish()
    }
}

//! Parameter bindings: the values a [`Statement`](crate::Statement) binds before it runs.
//!
//! A statement never owns its bindings. The caller assembles an ordered list of
//! [`Binding`] trait objects and lends it to [`Statement::bind`](crate::Statement::bind),
//! which checks the list against the statement's declared parameter count and then hands
//! each entry a [`Binder`] and its 1-based starting slot.

use libsqlite3_sys::SQLITE_RANGE;

use crate::{
    Error, Result, Value, encode::Encode, sqlite::SqliteError,
    sqlite::statement::StatementHandle,
};

/// A value, or group of values, that occupies consecutive parameter slots.
pub trait Binding {
    /// Number of parameter slots this binding fills. Always at least 1.
    fn columns_handled(&self) -> usize;

    /// Whether the binding can supply a value right now.
    ///
    /// Binding stops at the first entry that returns `false`; this is how batched
    /// bindings signal that they are exhausted.
    fn can_bind(&self) -> bool;

    /// Write this binding's values starting at parameter slot `position` (1-based).
    fn bind(&mut self, binder: &mut Binder<'_>, position: usize) -> Result<()>;

    /// Rewind the binding so it can supply its values again.
    fn reset(&mut self) {}
}

/// Positional writer over the parameters of a compiled statement.
pub struct Binder<'h> {
    handle: &'h mut StatementHandle,
}

impl<'h> Binder<'h> {
    pub(crate) fn new(handle: &'h mut StatementHandle) -> Self {
        Self { handle }
    }

    /// Number of parameter slots the statement declares.
    pub fn parameter_count(&self) -> usize {
        self.handle.bind_parameter_count()
    }

    pub fn bind_null(&mut self, position: usize) -> Result<()> {
        let rc = self.handle.bind_null(position);
        self.check(rc, position)
    }

    pub fn bind_int(&mut self, position: usize, v: i32) -> Result<()> {
        let rc = self.handle.bind_int(position, v);
        self.check(rc, position)
    }

    pub fn bind_int64(&mut self, position: usize, v: i64) -> Result<()> {
        let rc = self.handle.bind_int64(position, v);
        self.check(rc, position)
    }

    pub fn bind_double(&mut self, position: usize, v: f64) -> Result<()> {
        let rc = self.handle.bind_double(position, v);
        self.check(rc, position)
    }

    pub fn bind_text(&mut self, position: usize, v: &str) -> Result<()> {
        let rc = self.handle.bind_text(position, v);
        self.check(rc, position)
    }

    pub fn bind_blob(&mut self, position: usize, v: &[u8]) -> Result<()> {
        let rc = self.handle.bind_blob(position, v);
        self.check(rc, position)
    }

    /// Bind any [`Value`]. Text that is not valid UTF-8 is bound as a blob.
    pub fn bind_value(&mut self, position: usize, value: &Value) -> Result<()> {
        match value {
            Value::Null(_) => self.bind_null(position),
            Value::Integer(v, _) => self.bind_int64(position, *v),
            Value::Double(v, _) => self.bind_double(position, *v),
            Value::Text(v, _) => match std::str::from_utf8(v) {
                Ok(text) => self.bind_text(position, text),
                Err(_) => self.bind_blob(position, v),
            },
            Value::Blob(v, _) => self.bind_blob(position, v),
        }
    }

    /// `SQLITE_RANGE` means the slot does not exist, which is an arity problem.
    fn check(&self, rc: std::result::Result<(), SqliteError>, position: usize) -> Result<()> {
        match rc {
            Ok(()) => Ok(()),
            Err(e) if e.code & 0xff == SQLITE_RANGE => Err(Error::ParameterCountMismatch {
                expected: self.parameter_count(),
                actual: position,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// A single value bound once per execution.
///
/// After it has been bound, [`Binding::can_bind`] is `false` until [`Binding::reset`].
#[derive(Debug, Clone)]
pub struct Bind {
    value: Value,
    bound: bool,
}

impl Bind {
    pub fn new(value: impl Encode) -> Self {
        Self {
            value: value.encode(),
            bound: false,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Binding for Bind {
    fn columns_handled(&self) -> usize {
        1
    }

    fn can_bind(&self) -> bool {
        !self.bound
    }

    fn bind(&mut self, binder: &mut Binder<'_>, position: usize) -> Result<()> {
        binder.bind_value(position, &self.value)?;
        self.bound = true;
        Ok(())
    }

    fn reset(&mut self) {
        self.bound = false;
    }
}

/// One value per execution, taken in order from a batch.
///
/// Used to run a single statement once for every element, for example a bulk insert.
#[derive(Debug, Clone, Default)]
pub struct BindBatch {
    values: Vec<Value>,
    next: usize,
}

impl BindBatch {
    pub fn new<T, I>(values: I) -> Self
    where
        T: Encode,
        I: IntoIterator<Item = T>,
    {
        Self {
            values: values.into_iter().map(Encode::encode).collect(),
            next: 0,
        }
    }

    /// Values not bound yet.
    pub fn remaining(&self) -> usize {
        self.values.len() - self.next
    }
}

impl Binding for BindBatch {
    fn columns_handled(&self) -> usize {
        1
    }

    fn can_bind(&self) -> bool {
        self.next < self.values.len()
    }

    fn bind(&mut self, binder: &mut Binder<'_>, position: usize) -> Result<()> {
        if let Some(value) = self.values.get(self.next) {
            binder.bind_value(position, value)?;
            self.next += 1;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}

/// A composite value spread over consecutive parameter slots.
#[derive(Debug, Clone)]
pub struct BindTuple {
    values: Vec<Value>,
    bound: bool,
}

impl BindTuple {
    /// `values` must not be empty: a binding always fills at least one slot.
    pub fn new(values: Vec<Value>) -> Self {
        debug_assert!(!values.is_empty(), "a tuple binding needs at least one value");
        Self {
            values,
            bound: false,
        }
    }
}

impl Binding for BindTuple {
    fn columns_handled(&self) -> usize {
        self.values.len()
    }

    fn can_bind(&self) -> bool {
        !self.bound
    }

    fn bind(&mut self, binder: &mut Binder<'_>, position: usize) -> Result<()> {
        for (offset, value) in self.values.iter().enumerate() {
            binder.bind_value(position + offset, value)?;
        }
        self.bound = true;
        Ok(())
    }

    fn reset(&mut self) {
        self.bound = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_is_single_use_until_reset() {
        let mut b = Bind::new(7i32);
        assert!(b.can_bind());
        b.bound = true;
        assert!(!b.can_bind());
        b.reset();
        assert!(b.can_bind());
        assert_eq!(b.value(), &Value::Integer(7, None));
    }

    #[test]
    fn batch_tracks_remaining_values() {
        let mut batch = BindBatch::new(["a", "b"]);
        assert_eq!(batch.remaining(), 2);
        batch.next = 2;
        assert!(!batch.can_bind());
        batch.reset();
        assert!(batch.can_bind());
        assert!(!BindBatch::new(Vec::<i64>::new()).can_bind());
    }

    #[test]
    fn tuple_width_is_its_length() {
        let t = BindTuple::new(vec![1i64.encode(), "x".encode(), Option::<i32>::None.encode()]);
        assert_eq!(t.columns_handled(), 3);
    }
}

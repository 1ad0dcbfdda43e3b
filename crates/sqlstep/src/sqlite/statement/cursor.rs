use libsqlite3_sys::{SQLITE_DONE, SQLITE_OK, SQLITE_ROW};

/// Outcome of the most recent step at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum StepStatus {
    /// No row is pending: nothing has been stepped since the last bind, or the last
    /// row has been consumed.
    #[default]
    NotStarted,
    /// A row is available and has not been consumed yet.
    Row,
    /// The statement ran to completion.
    Done,
    /// The step failed with this status code.
    Error(i32),
}

impl StepStatus {
    pub(crate) fn from_code(code: i32) -> Self {
        match code {
            SQLITE_ROW => StepStatus::Row,
            SQLITE_DONE | SQLITE_OK => StepStatus::Done,
            other => StepStatus::Error(other),
        }
    }
}

/// Iteration state for a bound statement.
///
/// `step_invoked` is the single source of truth for whether SQLite has already been
/// stepped for the current position; `status` memoizes what that step returned.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Cursor {
    pub(crate) step_invoked: bool,
    pub(crate) status: StepStatus,
}

impl Cursor {
    /// Record a step that ran, returning whether it produced a row.
    pub(crate) fn record(&mut self, status: StepStatus) -> bool {
        self.step_invoked = true;
        self.status = status;
        status == StepStatus::Row
    }

    /// The memoized answer of the step already taken at this position.
    pub(crate) fn memoized(&self) -> Option<bool> {
        self.step_invoked.then_some(self.status == StepStatus::Row)
    }

    /// Mark the current row consumed so the next query steps again.
    pub(crate) fn consume(&mut self) {
        self.step_invoked = false;
        self.status = StepStatus::NotStarted;
    }
}

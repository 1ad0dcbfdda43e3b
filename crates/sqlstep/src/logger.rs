use std::{
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use log::LevelFilter;
use tracing::Level;

/// Target used for every statement execution event.
pub(crate) const QUERY_TARGET: &str = "sqlstep::query";

#[derive(Clone, Debug)]
#[non_exhaustive]
/// Logging configuration for statement executions.
pub struct LogSettings {
    /// Log level for statements.
    pub statements_level: LevelFilter,
    /// Log level for slow statements.
    pub slow_statements_level: LevelFilter,
    /// Threshold for slow statements.
    pub slow_statements_duration: Duration,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            statements_level: LevelFilter::Debug,
            slow_statements_level: LevelFilter::Warn,
            slow_statements_duration: Duration::from_secs(1),
        }
    }
}

impl LogSettings {
    /// Configure statement logging level.
    pub fn log_statements(&mut self, level: LevelFilter) {
        self.statements_level = level;
    }

    /// Configure slow statement logging level and threshold.
    pub fn log_slow_statements(&mut self, level: LevelFilter, duration: Duration) {
        self.slow_statements_level = level;
        self.slow_statements_duration = duration;
    }

    /// Returns `true` if any logging level is enabled.
    pub fn is_enabled(&self) -> bool {
        self.statements_level != LevelFilter::Off || self.slow_statements_level != LevelFilter::Off
    }
}

fn level_filter_to_levels(filter: LevelFilter) -> Option<(Level, log::Level)> {
    let tracing_level = match filter {
        LevelFilter::Error => Some(Level::ERROR),
        LevelFilter::Warn => Some(Level::WARN),
        LevelFilter::Info => Some(Level::INFO),
        LevelFilter::Debug => Some(Level::DEBUG),
        LevelFilter::Trace => Some(Level::TRACE),
        LevelFilter::Off => None,
    };

    tracing_level.zip(filter.to_level())
}

// `tracing::event!` needs the level as a constant, so dispatch on it here.
macro_rules! query_event {
    ($level:expr, $($fields:tt)*) => {
        match $level {
            Level::ERROR => tracing::event!(target: QUERY_TARGET, Level::ERROR, $($fields)*),
            Level::WARN => tracing::event!(target: QUERY_TARGET, Level::WARN, $($fields)*),
            Level::INFO => tracing::event!(target: QUERY_TARGET, Level::INFO, $($fields)*),
            Level::DEBUG => tracing::event!(target: QUERY_TARGET, Level::DEBUG, $($fields)*),
            Level::TRACE => tracing::event!(target: QUERY_TARGET, Level::TRACE, $($fields)*),
        }
    };
}

fn tracing_enabled_for(level: Level) -> bool {
    match level {
        Level::ERROR => tracing::enabled!(target: QUERY_TARGET, Level::ERROR),
        Level::WARN => tracing::enabled!(target: QUERY_TARGET, Level::WARN),
        Level::INFO => tracing::enabled!(target: QUERY_TARGET, Level::INFO),
        Level::DEBUG => tracing::enabled!(target: QUERY_TARGET, Level::DEBUG),
        Level::TRACE => tracing::enabled!(target: QUERY_TARGET, Level::TRACE),
    }
}

/// Measures one execution of a statement and logs it when dropped.
pub struct QueryLogger {
    /// SQL being executed.
    sql: Arc<str>,
    /// Count of rows returned.
    rows_returned: u64,
    /// Count of rows affected.
    rows_affected: u64,
    /// Start time for the execution.
    start: Instant,
    /// Logging settings in effect.
    settings: LogSettings,
}

impl QueryLogger {
    /// Start measuring an execution of `sql`.
    pub fn new(sql: Arc<str>, settings: LogSettings) -> Self {
        Self {
            sql,
            rows_returned: 0,
            rows_affected: 0,
            start: Instant::now(),
            settings,
        }
    }

    pub fn increment_rows_returned(&mut self) {
        self.rows_returned += 1;
    }

    pub fn increase_rows_affected(&mut self, n: u64) {
        self.rows_affected += n;
    }

    /// Emit a log event for the completed execution.
    fn finish(&self) {
        let elapsed = self.start.elapsed();
        let lvl = if elapsed >= self.settings.slow_statements_duration {
            self.settings.slow_statements_level
        } else {
            self.settings.statements_level
        };

        let Some((tracing_level, log_level)) = level_filter_to_levels(lvl) else {
            return;
        };

        // The level may have been enabled from either the log or the tracing side.
        if !log::log_enabled!(target: QUERY_TARGET, log_level)
            && !tracing_enabled_for(tracing_level)
        {
            return;
        }

        let (summary, sql) = self.build_log_payload();
        let rows_affected = self.rows_affected;
        let rows_returned = self.rows_returned;

        query_event!(
            tracing_level,
            summary = summary.as_str(),
            db.statement = sql.as_str(),
            rows_affected,
            rows_returned,
            ?elapsed,
        );
    }

    /// Build the summary line and, for long statements, the formatted SQL.
    fn build_log_payload(&self) -> (String, String) {
        let mut summary = parse_query_summary(&self.sql);
        if summary == *self.sql {
            return (summary, String::new());
        }

        summary.push_str(" …");
        let formatted = sqlformat::format(
            &self.sql,
            &sqlformat::QueryParams::None,
            &sqlformat::FormatOptions::default(),
        );
        (summary, format!("\n\n{formatted}\n"))
    }
}

impl Drop for QueryLogger {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Produce a short summary of a SQL statement for logging.
fn parse_query_summary(sql: &str) -> String {
    sql.split_whitespace().take(4).collect::<Vec<&str>>().join(" ")
}

use chrono::{DateTime, NaiveDate, Utc};

/// A port that provides the current instant and the current local date.
///
/// # Purpose
/// Photo timestamps (`createdAt`) and export dates are taken from this port
/// so that:
///
/// - album logic does **not** depend on system time
/// - tests can be deterministic and time-independent
///
/// # Typical Implementations
/// - `SystemClock`: uses the OS clock with a configured timezone
/// - fixed clocks in tests
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Returns today's date as a [`NaiveDate`] in the implementation's
    /// timezone.
    fn today(&self) -> NaiveDate;
}

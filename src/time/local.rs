//! Local time utilities based on `chrono` and `chrono-tz`.
//!
//! # Provided Functions
//! - [`parse_timezone`]: Parses an IANA timezone name.
//! - [`today_in`]: The calendar date of an instant in a timezone.
//! - [`format_local_date`]: `dd/mm/yyyy` rendering used on exported documents.
//! - [`from_epoch_millis`] / [`to_epoch_millis`]: the persisted `createdAt` form.
//!
//! # Timezone Format
//! Timezone names must follow the **IANA format**, e.g. `"America/Sao_Paulo"`.
//! Invalid names are reported as errors.

use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Parses an IANA timezone name.
///
/// ## Example
/// ```
/// use keepsake::time::local::parse_timezone;
/// assert!(parse_timezone("America/Sao_Paulo").is_ok());
/// assert!(parse_timezone("Invalid/Timezone").is_err());
/// ```
pub fn parse_timezone(tz_name: &str) -> Result<Tz> {
    Tz::from_str(tz_name.trim()).map_err(|_| anyhow!("Invalid timezone name: {}", tz_name))
}

/// Returns the calendar date of `at` in `tz`.
pub fn today_in(at: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// Formats the local date of `at` as `dd/mm/yyyy`.
///
/// ## Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use keepsake::time::local::{format_local_date, parse_timezone};
///
/// let tz = parse_timezone("America/Sao_Paulo").unwrap();
/// let at = Utc.with_ymd_and_hms(2025, 3, 1, 1, 0, 0).unwrap();
/// assert_eq!(format_local_date(at, &tz), "28/02/2025");
/// ```
pub fn format_local_date(at: DateTime<Utc>, tz: &Tz) -> String {
    at.with_timezone(tz).format("%d/%m/%Y").to_string()
}

/// Milliseconds since the Unix epoch.
pub fn to_epoch_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Inverse of [`to_epoch_millis`]. Out-of-range values map to the epoch.
pub fn from_epoch_millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

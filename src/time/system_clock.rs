use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::time::clock::Clock;
use crate::time::local::{parse_timezone, today_in};

/// A [`Clock`] implementation backed by the system clock.
///
/// `SystemClock` provides the current instant from the operating system and
/// derives "today" in a configured IANA timezone.
///
/// The timezone is parsed at construction time, so an invalid name is
/// reported once, by the composition root, as a configuration error.
#[derive(Clone, Debug)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Creates a new [`SystemClock`] with the given IANA timezone name.
    ///
    /// # Errors
    /// Fails if `tz_name` is not a known IANA timezone.
    pub fn new(tz_name: &str) -> Result<Self> {
        Ok(Self {
            tz: parse_timezone(tz_name)?,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        today_in(Utc::now(), &self.tz)
    }
}

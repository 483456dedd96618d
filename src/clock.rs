use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum InputError {
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    Date(String),
    #[error("invalid time '{0}' (expected HH:MM)")]
    Time(String),
    #[error("expected 'YYYY-MM-DD HH:MM', got '{0}'")]
    Shape(String),
    #[error("{0} does not exist in the local time zone")]
    NonexistentLocal(NaiveDateTime),
}

/// Simulated time driven by the date/time entry, the offset slider and the
/// play timer. `base` is the instant the slider offset is measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SimulationClock {
    pub(crate) current: DateTime<Utc>,
    pub(crate) base: DateTime<Utc>,
    pub(crate) playing: bool,
}

impl SimulationClock {
    pub(crate) fn new(at: DateTime<Utc>) -> Self {
        Self {
            current: at,
            base: at,
            playing: false,
        }
    }

    /// Jump to an absolute instant; the slider origin follows.
    pub(crate) fn set(&mut self, at: DateTime<Utc>) {
        self.current = at;
        self.base = at;
    }

    /// An offset that leaves chrono's range keeps the current time.
    pub(crate) fn set_offset_hours(&mut self, hours: i64) {
        if let Some(at) = Duration::try_hours(hours).and_then(|d| self.base.checked_add_signed(d)) {
            self.current = at;
        }
    }

    /// Stops at the end of chrono's range instead of overflowing.
    pub(crate) fn advanced(self, step: Duration) -> Self {
        Self {
            current: self.current.checked_add_signed(step).unwrap_or(self.current),
            ..self
        }
    }
}

/// Parse the picker pair (`YYYY-MM-DD`, `HH:MM`) as wall-clock time in `tz`.
pub(crate) fn parse_picker<Tz: TimeZone>(
    date: &str,
    time: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, InputError> {
    let d = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| InputError::Date(date.trim().to_string()))?;
    let t = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| InputError::Time(time.trim().to_string()))?;
    let naive = d.and_time(t);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(InputError::NonexistentLocal(naive))
}

/// Parse a single `YYYY-MM-DD HH:MM` entry line.
pub(crate) fn parse_entry<Tz: TimeZone>(line: &str, tz: &Tz) -> Result<DateTime<Utc>, InputError> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(date), Some(time), None) => parse_picker(date, time, tz),
        _ => Err(InputError::Shape(line.trim().to_string())),
    }
}

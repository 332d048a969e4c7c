//! Civil-time computation in the fixed reminder timezone.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Timezone all reminder dates and times are interpreted in.
pub const CIVIL_TZ: Tz = chrono_tz::America::Chicago;

/// Civil hour during which the daily flag reset may run.
pub const RESET_HOUR: u32 = 2;

/// The reset runs only while the civil minute is below this value.
pub const RESET_WINDOW_MINUTES: u32 = 5;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// Current UTC instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// An instant together with its civil date and minute-truncated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilNow {
    /// The UTC instant the invocation started at.
    pub instant: DateTime<Utc>,
    /// Civil calendar date.
    pub today: NaiveDate,
    /// Civil time of day with seconds dropped.
    pub time: NaiveTime,
}

impl CivilNow {
    /// Project `instant` into [`CIVIL_TZ`].
    #[must_use]
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        let local = instant.with_timezone(&CIVIL_TZ);
        let time = NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or_default();
        Self {
            instant,
            today: local.date_naive(),
            time,
        }
    }

    /// `today` as `YYYY-MM-DD`.
    #[must_use]
    pub fn today_str(&self) -> String {
        self.today.format("%Y-%m-%d").to_string()
    }

    /// Civil time as `HH:MM:00`.
    #[must_use]
    pub fn time_str(&self) -> String {
        self.time.format("%H:%M:00").to_string()
    }

    /// Civil date and time joined by a space.
    #[must_use]
    pub fn central_time(&self) -> String {
        format!("{} {}", self.today_str(), self.time_str())
    }

    /// UTC instant in RFC 3339 with millisecond precision and a `Z` suffix.
    #[must_use]
    pub fn checked_at(&self) -> String {
        self.instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Whether this minute falls inside the daily reset window.
    ///
    /// Assumes the trigger fires at least every `RESET_WINDOW_MINUTES`
    /// minutes; a coarser cadence can skip the window entirely.
    #[must_use]
    pub fn in_reset_window(&self) -> bool {
        self.time.hour() == RESET_HOUR && self.time.minute() < RESET_WINDOW_MINUTES
    }
}

/// UTC instant for a civil wall-clock reading in [`CIVIL_TZ`].
///
/// Returns `None` for local times skipped or repeated by a DST transition.
#[must_use]
pub fn civil_instant(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    CIVIL_TZ
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

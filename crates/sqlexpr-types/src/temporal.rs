//! Date/time values and calendar arithmetic
//!
//! Each temporal kind is normalized to milliseconds since its own zero-point:
//! the Unix epoch for DATE, DATETIME and TIMESTAMP, midnight for TIME and
//! January 1st for YEAR. Month arithmetic works on calendar fields with
//! carry/borrow and clamps the day to the length of the target month.

use crate::error::ConversionWarning;
use crate::kind::ScalarKind;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Supported calendar years for DATE and DATETIME
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Supported range of the YEAR kind
pub const MIN_YEAR_KIND: i32 = 1901;
pub const MAX_YEAR_KIND: i32 = 2155;

/// TIMESTAMP range in epoch seconds: 1970-01-01T00:00:00Z to 2038-01-19T03:14:07Z
pub const MIN_TIMESTAMP: i64 = 0;
pub const MAX_TIMESTAMP: i64 = i32::MAX as i64;

/// Days from 0001-01-01 (day 1) to 1970-01-01
const EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Gregorian leap year rule
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`, `None` for a month outside 1..=12
pub const fn days_in_month(year: i32, month: u8) -> Option<u8> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        _ => None,
    }
}

fn parse_fields<const N: usize>(text: &str, sep: char, what: &str) -> Result<[i64; N], ConversionWarning> {
    let mut out = [0i64; N];
    let mut parts = text.split(sep);
    for slot in out.iter_mut() {
        let part = parts
            .next()
            .ok_or_else(|| ConversionWarning::invalid_component(what, text))?;
        *slot = part
            .trim()
            .parse()
            .map_err(|_| ConversionWarning::invalid_component(what, text))?;
    }
    if parts.next().is_some() {
        return Err(ConversionWarning::invalid_component(what, text));
    }
    Ok(out)
}

// ============================================================================
// DATE
// ============================================================================

/// A calendar date
///
/// Values read from rows are not validated on construction; invalid
/// components surface as warnings when the date takes part in arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SqlDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl SqlDate {
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Check the components against the calendar
    pub fn validate(&self) -> Result<NaiveDate, ConversionWarning> {
        let dim = days_in_month(self.year, self.month)
            .ok_or_else(|| ConversionWarning::invalid_component("month", self))?;
        if self.day == 0 || self.day > dim {
            return Err(ConversionWarning::invalid_component("day", self));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(ConversionWarning::out_of_range(ScalarKind::Date, self));
        }
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))
            .ok_or_else(|| ConversionWarning::out_of_range(ScalarKind::Date, self))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month() as u8, date.day() as u8)
    }

    /// Parse `YYYY-MM-DD`
    pub fn parse(text: &str) -> Result<Self, ConversionWarning> {
        let [y, m, d] = parse_fields::<3>(text.trim(), '-', "date")?;
        let date = Self::new(
            i32::try_from(y).map_err(|_| ConversionWarning::out_of_range(ScalarKind::Date, text))?,
            u8::try_from(m).map_err(|_| ConversionWarning::invalid_component("month", text))?,
            u8::try_from(d).map_err(|_| ConversionWarning::invalid_component("day", text))?,
        );
        date.validate()?;
        Ok(date)
    }

    /// Add a signed number of months, clamping the day to the target month
    pub fn add_months(&self, months: i64) -> Result<Self, ConversionWarning> {
        self.validate()?;
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1;
        let total = total
            .checked_add(months)
            .ok_or_else(|| ConversionWarning::out_of_range(ScalarKind::Date, self))?;
        let year = total.div_euclid(12);
        let month = (total.rem_euclid(12) + 1) as u8;
        let year = i32::try_from(year)
            .ok()
            .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
            .ok_or_else(|| ConversionWarning::out_of_range(ScalarKind::Date, format!("{} + {} months", self, months)))?;
        let dim = days_in_month(year, month).unwrap_or(28);
        Ok(Self::new(year, month, self.day.min(dim)))
    }

    /// Days since 1970-01-01
    pub fn to_epoch_days(&self) -> Result<i64, ConversionWarning> {
        let date = self.validate()?;
        Ok(i64::from(date.num_days_from_ce()) - EPOCH_DAYS_FROM_CE)
    }

    pub fn from_epoch_days(days: i64) -> Result<Self, ConversionWarning> {
        days.checked_add(EPOCH_DAYS_FROM_CE)
            .and_then(|d| i32::try_from(d).ok())
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(Self::from_naive)
            .filter(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year))
            .ok_or_else(|| ConversionWarning::out_of_range(ScalarKind::Date, format!("{} days", days)))
    }

    pub fn to_epoch_millis(&self) -> Result<i64, ConversionWarning> {
        Ok(self.to_epoch_days()? * MILLIS_PER_DAY)
    }

    /// Whole days of `ms`; the time-of-day part is dropped
    pub fn from_epoch_millis(ms: i64) -> Result<Self, ConversionWarning> {
        Self::from_epoch_days(ms.div_euclid(MILLIS_PER_DAY))
    }
}

impl fmt::Display for SqlDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// ============================================================================
// TIME
// ============================================================================

/// A time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SqlTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl SqlTime {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self { hour, minute, second }
    }

    pub const MIDNIGHT: SqlTime = SqlTime::new(0, 0, 0);

    pub fn validate(&self) -> Result<(), ConversionWarning> {
        if self.hour > 23 {
            return Err(ConversionWarning::invalid_component("hour", self));
        }
        if self.minute > 59 {
            return Err(ConversionWarning::invalid_component("minute", self));
        }
        if self.second > 59 {
            return Err(ConversionWarning::invalid_component("second", self));
        }
        Ok(())
    }

    /// Parse `HH:MM:SS`
    pub fn parse(text: &str) -> Result<Self, ConversionWarning> {
        let [h, m, s] = parse_fields::<3>(text.trim(), ':', "time")?;
        let time = Self::new(
            u8::try_from(h).map_err(|_| ConversionWarning::invalid_component("hour", text))?,
            u8::try_from(m).map_err(|_| ConversionWarning::invalid_component("minute", text))?,
            u8::try_from(s).map_err(|_| ConversionWarning::invalid_component("second", text))?,
        );
        time.validate()?;
        Ok(time)
    }

    /// Milliseconds since midnight
    pub fn to_millis(&self) -> Result<i64, ConversionWarning> {
        self.validate()?;
        Ok(i64::from(self.hour) * MILLIS_PER_HOUR
            + i64::from(self.minute) * MILLIS_PER_MINUTE
            + i64::from(self.second) * MILLIS_PER_SECOND)
    }

    /// Time of day of `ms`, wrapping around midnight
    pub fn from_millis(ms: i64) -> Self {
        let ms = ms.rem_euclid(MILLIS_PER_DAY);
        Self::new(
            (ms / MILLIS_PER_HOUR) as u8,
            ((ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE) as u8,
            ((ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND) as u8,
        )
    }
}

impl fmt::Display for SqlTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

// ============================================================================
// DATETIME
// ============================================================================

/// A date and time of day without zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SqlDateTime {
    pub date: SqlDate,
    pub time: SqlTime,
}

impl SqlDateTime {
    pub const fn new(date: SqlDate, time: SqlTime) -> Self {
        Self { date, time }
    }

    /// Parse `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or a bare date
    pub fn parse(text: &str) -> Result<Self, ConversionWarning> {
        let text = text.trim();
        match text.split_once([' ', 'T']) {
            Some((date, time)) => Ok(Self::new(SqlDate::parse(date)?, SqlTime::parse(time)?)),
            None => Ok(Self::new(SqlDate::parse(text)?, SqlTime::MIDNIGHT)),
        }
    }

    pub fn to_epoch_millis(&self) -> Result<i64, ConversionWarning> {
        Ok(self.date.to_epoch_millis()? + self.time.to_millis()?)
    }

    pub fn from_epoch_millis(ms: i64) -> Result<Self, ConversionWarning> {
        Ok(Self::new(SqlDate::from_epoch_millis(ms)?, SqlTime::from_millis(ms)))
    }

    pub fn add_months(&self, months: i64) -> Result<Self, ConversionWarning> {
        self.time.validate()?;
        Ok(Self::new(self.date.add_months(months)?, self.time))
    }
}

impl fmt::Display for SqlDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

// ============================================================================
// TIMESTAMP and YEAR
// ============================================================================

/// Range-check epoch seconds for the TIMESTAMP kind
pub fn check_timestamp(secs: i64) -> Result<i64, ConversionWarning> {
    if (MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&secs) {
        Ok(secs)
    } else {
        Err(ConversionWarning::out_of_range(ScalarKind::Timestamp, secs))
    }
}

/// Epoch seconds of a timestamp from epoch milliseconds, truncated toward the past
pub fn timestamp_from_millis(ms: i64) -> Result<i64, ConversionWarning> {
    check_timestamp(ms.div_euclid(MILLIS_PER_SECOND))
}

/// UTC calendar fields of a timestamp
pub fn timestamp_to_datetime(secs: i64) -> Result<SqlDateTime, ConversionWarning> {
    let ms = secs
        .checked_mul(MILLIS_PER_SECOND)
        .ok_or_else(|| ConversionWarning::out_of_range(ScalarKind::Timestamp, secs))?;
    SqlDateTime::from_epoch_millis(ms)
}

pub fn check_year(year: i64) -> Result<i32, ConversionWarning> {
    i32::try_from(year)
        .ok()
        .filter(|y| (MIN_YEAR_KIND..=MAX_YEAR_KIND).contains(y))
        .ok_or_else(|| ConversionWarning::out_of_range(ScalarKind::Year, year))
}

/// Milliseconds from the epoch to January 1st of `year`
pub fn year_to_epoch_millis(year: i32) -> Result<i64, ConversionWarning> {
    SqlDate::new(year, 1, 1).to_epoch_millis()
}

pub fn year_from_epoch_millis(ms: i64) -> Result<i32, ConversionWarning> {
    check_year(i64::from(SqlDate::from_epoch_millis(ms)?.year))
}

// ============================================================================
// Interval decomposition
// ============================================================================

/// A millisecond interval split into calendar-free parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntervalParts {
    pub negative: bool,
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub millis: u16,
}

impl IntervalParts {
    pub fn from_millis(ms: i64) -> Self {
        let abs = ms.unsigned_abs();
        let day = MILLIS_PER_DAY as u64;
        let hour = MILLIS_PER_HOUR as u64;
        let minute = MILLIS_PER_MINUTE as u64;
        let second = MILLIS_PER_SECOND as u64;
        Self {
            negative: ms < 0,
            days: abs / day,
            hours: ((abs % day) / hour) as u8,
            minutes: ((abs % hour) / minute) as u8,
            seconds: ((abs % minute) / second) as u8,
            millis: (abs % second) as u16,
        }
    }

    /// Recombine into milliseconds; `None` on overflow
    pub fn to_millis(&self) -> Option<i64> {
        let magnitude = i64::try_from(self.days)
            .ok()?
            .checked_mul(MILLIS_PER_DAY)?
            .checked_add(i64::from(self.hours) * MILLIS_PER_HOUR)?
            .checked_add(i64::from(self.minutes) * MILLIS_PER_MINUTE)?
            .checked_add(i64::from(self.seconds) * MILLIS_PER_SECOND)?
            .checked_add(i64::from(self.millis))?;
        Some(if self.negative { -magnitude } else { magnitude })
    }
}

impl fmt::Display for IntervalParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(
            f,
            "{} {:02}:{:02}:{:02}.{:03}",
            self.days, self.hours, self.minutes, self.seconds, self.millis
        )
    }
}

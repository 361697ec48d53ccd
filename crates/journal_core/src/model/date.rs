//! Validated calendar date keys and month arithmetic.
//!
//! # Responsibility
//! - Guard the ISO `YYYY-MM-DD` shape used to index day entries.
//! - Provide the month helpers the calendar and table read-models need.
//!
//! # Invariants
//! - A `DateKey` always denotes a real calendar day.
//! - Date keys order chronologically, so entry maps iterate in day order.

use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static DATE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date key regex"));

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar day identifier for one journal entry.
///
/// Serialized as the plain ISO string so persisted entry maps and backup
/// documents keep the `"YYYY-MM-DD"` keys the export format promises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

/// Rejected date key input, with the offending value retained for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDateKey(pub String);

impl Display for InvalidDateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date key `{}`; expected YYYY-MM-DD", self.0)
    }
}

impl Error for InvalidDateKey {}

impl DateKey {
    /// Parses a date key, requiring both the zero-padded ISO shape and a
    /// real calendar day (so `2026-02-30` and `2026-1-1` are rejected).
    pub fn parse(value: &str) -> Result<Self, InvalidDateKey> {
        if !DATE_KEY_RE.is_match(value) {
            return Err(InvalidDateKey(value.to_string()));
        }
        NaiveDate::parse_from_str(value, DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| InvalidDateKey(value.to_string()))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The key `days` away from this one, negative values going backwards.
    /// Saturates at the supported calendar range.
    pub fn offset_days(&self, days: i64) -> Self {
        self.0
            .checked_add_signed(Duration::days(days))
            .map(Self)
            .unwrap_or(*self)
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl TryFrom<String> for DateKey {
    type Error = InvalidDateKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> Self {
        value.to_string()
    }
}

/// One calendar month, the unit of the calendar and table read-models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    /// `month` is 1-based; returns `None` outside the calendar range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(key: &DateKey) -> Self {
        Self {
            // Day 1 exists in every month of a valid date.
            first: key.date().with_day(1).unwrap_or(key.date()),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> DateKey {
        DateKey(self.first)
    }

    pub fn day_count(&self) -> u32 {
        (self.next().first - self.first).num_days() as u32
    }

    /// The key for a 1-based day number, `None` past the end of the month.
    pub fn day(&self, day: u32) -> Option<DateKey> {
        if day == 0 || day > self.day_count() {
            return None;
        }
        self.first.with_day(day).map(DateKey)
    }

    pub fn days(&self) -> impl Iterator<Item = DateKey> + '_ {
        (0..self.day_count()).map(|offset| DateKey(self.first + Duration::days(i64::from(offset))))
    }

    /// Saturates at the calendar range rather than failing.
    pub fn prev(&self) -> Self {
        let (year, month) = match self.number() {
            1 => (self.year() - 1, 12),
            other => (self.year(), other - 1),
        };
        Self::new(year, month).unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        let (year, month) = match self.number() {
            12 => (self.year() + 1, 1),
            other => (self.year(), other + 1),
        };
        Self::new(year, month).unwrap_or(*self)
    }

    /// Blank cells before day 1 in a Sunday-first calendar grid.
    pub fn leading_weekday_gap(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }
}

#[cfg(test)]
mod tests {
    use super::{DateKey, Month};

    #[test]
    fn parse_accepts_real_iso_days() {
        let key = DateKey::parse("2026-01-31").unwrap();
        assert_eq!(key.to_string(), "2026-01-31");
    }

    #[test]
    fn parse_rejects_bad_shape_and_bad_calendar_days() {
        assert!(DateKey::parse("2026-1-1").is_err());
        assert!(DateKey::parse("2026-02-30").is_err());
        assert!(DateKey::parse("not-a-date").is_err());
        assert!(DateKey::parse("2026-01-01T00:00:00").is_err());
    }

    #[test]
    fn offset_days_crosses_month_boundaries() {
        let key = DateKey::parse("2026-01-31").unwrap();
        assert_eq!(key.offset_days(1).to_string(), "2026-02-01");
        assert_eq!(key.offset_days(-31).to_string(), "2025-12-31");
    }

    #[test]
    fn month_day_count_handles_leap_years() {
        assert_eq!(Month::new(2026, 2).unwrap().day_count(), 28);
        assert_eq!(Month::new(2028, 2).unwrap().day_count(), 29);
        assert_eq!(Month::new(2026, 1).unwrap().day_count(), 31);
    }

    #[test]
    fn month_navigation_wraps_years() {
        let january = Month::new(2026, 1).unwrap();
        assert_eq!(january.prev(), Month::new(2025, 12).unwrap());
        assert_eq!(january.next(), Month::new(2026, 2).unwrap());
    }

    #[test]
    fn leading_weekday_gap_is_sunday_first() {
        // 2026-01-01 is a Thursday.
        assert_eq!(Month::new(2026, 1).unwrap().leading_weekday_gap(), 4);
        // 2026-02-01 is a Sunday.
        assert_eq!(Month::new(2026, 2).unwrap().leading_weekday_gap(), 0);
    }

    #[test]
    fn serde_round_trips_through_the_iso_string() {
        let key = DateKey::parse("2026-03-09").unwrap();
        let raw = serde_json::to_string(&key).unwrap();
        assert_eq!(raw, "\"2026-03-09\"");
        let back: DateKey = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn serde_rejects_malformed_keys() {
        assert!(serde_json::from_str::<DateKey>("\"2026-13-01\"").is_err());
    }
}

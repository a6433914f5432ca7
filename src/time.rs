//! Calendar and wall-clock primitives.
//!
//! Chrono types are wrapped in newtypes so they can carry hand-written
//! CBOR impls, and "what day is it" is behind the [`Clock`] trait so
//! date-boundary behavior stays deterministic in tests.

use crate::error::BookingError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use std::fmt;

/// Wall-clock instant, persisted as nanoseconds since the epoch.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
    /// Midnight UTC at the start of the given day.
    pub fn start_of(day: CalendarDay) -> Self {
        Self(day.to_naive().and_time(NaiveTime::MIN).and_utc())
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

/// A calendar day with no time-of-day component. All booking-date
/// comparisons are date-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn new_with(year: i32, month: u32, day: u32) -> Self {
        NaiveDate::from_ymd_opt(year, month, day)
            .expect("invalid year/month/day literal")
            .into()
    }
    /// Parse a `YYYY-MM-DD` label as supplied by callers.
    pub fn parse(s: &str) -> Result<Self, BookingError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(CalendarDay)
            .map_err(|_| BookingError::Validation(format!("invalid date {s:?}, expected YYYY-MM-DD")))
    }
    pub fn is_weekend(&self) -> bool {
        matches!(self.0.weekday(), Weekday::Sat | Weekday::Sun)
    }
    pub fn to_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(value: NaiveDate) -> Self {
        CalendarDay(value)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl<C> minicbor::Encode<C> for CalendarDay {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.i32(self.0.num_days_from_ce())?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for CalendarDay {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let days = d.i32()?;

        NaiveDate::from_num_days_from_ce_opt(days)
            .map(CalendarDay)
            .ok_or(minicbor::decode::Error::message(
                "day count out of calendar range",
            ))
    }
}

/// Injected source of "now". The engine never reads ambient system time
/// directly.
pub trait Clock: Send + Sync {
    fn today(&self) -> CalendarDay;
    fn now(&self) -> TimeStamp<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDay {
        Utc::now().date_naive().into()
    }
    fn now(&self) -> TimeStamp<Utc> {
        TimeStamp::new()
    }
}

/// Test clock pinned to a single day.
pub struct FixedClock(pub CalendarDay);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDay {
        self.0
    }
    fn now(&self) -> TimeStamp<Utc> {
        TimeStamp::start_of(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_cbor_roundtrip() {
        let original = TimeStamp::new();

        let encoded = minicbor::to_vec(&original).unwrap();
        let decoded: TimeStamp<Utc> = minicbor::decode(&encoded).unwrap();

        assert_eq!(original, decoded);
    }

    #[test]
    fn calendar_day_cbor_roundtrip() {
        let original = CalendarDay::new_with(2026, 1, 12);

        let encoded = minicbor::to_vec(original).unwrap();
        let decoded: CalendarDay = minicbor::decode(&encoded).unwrap();

        assert_eq!(original, decoded);
    }

    #[test]
    fn parse_and_display_agree() {
        let day = CalendarDay::parse("2026-01-12").unwrap();
        assert_eq!(day, CalendarDay::new_with(2026, 1, 12));
        assert_eq!(day.to_string(), "2026-01-12");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(CalendarDay::parse("12/01/2026").is_err());
        assert!(CalendarDay::parse("2026-13-40").is_err());
        assert!(CalendarDay::parse("").is_err());
    }

    #[test]
    fn weekend_detection() {
        // 2026-01-10 is a Saturday, 2026-01-11 a Sunday, 2026-01-12 a Monday
        assert!(CalendarDay::new_with(2026, 1, 10).is_weekend());
        assert!(CalendarDay::new_with(2026, 1, 11).is_weekend());
        assert!(!CalendarDay::new_with(2026, 1, 12).is_weekend());
    }

    #[test]
    fn fixed_clock_pins_today() {
        let day = CalendarDay::new_with(2026, 1, 12);
        let clock = FixedClock(day);

        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().to_datetime_utc().date_naive(), day.to_naive());
    }
}

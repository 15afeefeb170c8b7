//! The term window and the due-date constructor.

use std::fmt;

use jiff::{
    Timestamp,
    civil::{self, Date, Time},
    tz::TimeZone,
};
use serde::Deserialize;

use crate::model::CENTRAL;

use super::CalendarError;

/// A month and day without a year, written `MM-DD`.
///
/// Calendars are written this way so a term's dates resolve against the
/// configured term year rather than whatever year the run happens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct MonthDay {
    pub month: i8,
    pub day: i8,
}

impl MonthDay {
    /// Parses `MM-DD`. Only the shape is checked here; whether the day
    /// exists in the month depends on the year and is checked by [`Term::date`].
    pub fn parse(s: &str) -> Result<Self, CalendarError> {
        let bad = || CalendarError::InvalidMonthDay(s.to_string());
        let (month, day) = s.trim().split_once('-').ok_or_else(bad)?;
        let month: i8 = month.parse().map_err(|_| bad())?;
        let day: i8 = day.parse().map_err(|_| bad())?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(bad());
        }
        Ok(Self { month, day })
    }
}

impl TryFrom<String> for MonthDay {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// A wall-clock due time, written `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct DueTime(pub Time);

impl DueTime {
    pub fn parse(s: &str) -> Result<Self, CalendarError> {
        let bad = || CalendarError::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(bad)?;
        let hour: i8 = hour.parse().map_err(|_| bad())?;
        let minute: i8 = minute.parse().map_err(|_| bad())?;
        let time = Time::new(hour, minute, 0, 0).map_err(|_| bad())?;
        Ok(Self(time))
    }
}

impl Default for DueTime {
    /// 23:59:00, the standing deadline for every course.
    fn default() -> Self {
        Self(civil::time(23, 59, 0, 0))
    }
}

impl TryFrom<String> for DueTime {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

/// The term as written in a calendar file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TermSpec {
    pub name: String,
    pub year: i16,
    pub start: MonthDay,
    pub end: MonthDay,
}

/// A resolved term: concrete dates in Central Time.
#[derive(Debug, Clone)]
pub struct Term {
    pub name: String,
    pub year: i16,
    pub start: Date,
    pub end: Date,
    tz: TimeZone,
}

impl Term {
    /// Resolves a term spec, rejecting windows that end before they start.
    pub fn resolve(spec: &TermSpec) -> Result<Self, CalendarError> {
        let tz = TimeZone::get(CENTRAL)?;
        let start = resolve_date(spec.year, spec.start)?;
        let end = resolve_date(spec.year, spec.end)?;
        if end < start {
            return Err(CalendarError::InvalidTerm(format!(
                "{} ends ({end}) before it starts ({start})",
                spec.name
            )));
        }
        Ok(Self {
            name: spec.name.clone(),
            year: spec.year,
            start,
            end,
            tz,
        })
    }

    /// The term-year date for `md`. Fails on days the month doesn't have.
    pub fn date(&self, md: MonthDay) -> Result<Date, CalendarError> {
        resolve_date(self.year, md)
    }

    /// The due-date constructor: `md` in the term year at `time` Central Time.
    pub fn due(&self, md: MonthDay, time: DueTime) -> Result<Timestamp, CalendarError> {
        let date = self.date(md)?;
        self.at(date, time)
    }

    /// `date` at `time` in the term's time zone.
    pub fn at(&self, date: Date, time: DueTime) -> Result<Timestamp, CalendarError> {
        let zoned = date.to_datetime(time.0).to_zoned(self.tz.clone())?;
        Ok(zoned.timestamp())
    }

    /// Inclusive window check.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Fails with [`CalendarError::OutOfTerm`] unless `date` is inside the window.
    pub fn require(&self, date: Date, what: impl Into<String>) -> Result<(), CalendarError> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(CalendarError::OutOfTerm {
                what: what.into(),
                date,
                term: self.name.clone(),
            })
        }
    }
}

fn resolve_date(year: i16, md: MonthDay) -> Result<Date, CalendarError> {
    Date::new(year, md.month, md.day).map_err(|_| CalendarError::InvalidDate {
        year,
        month: md.month,
        day: md.day,
    })
}

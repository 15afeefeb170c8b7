//! Recurrence descriptors and one-off deadlines.

use jiff::civil::{Date, Weekday};
use serde::Deserialize;

use crate::model::{Assignment, AssignmentKind, Course, Platform};

use super::{CalendarError, DueTime, MonthDay, Term};

/// Day of the week as written in calendar files (`"monday"`, `"tuesday"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    fn weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Monday,
            Self::Tuesday => Weekday::Tuesday,
            Self::Wednesday => Weekday::Wednesday,
            Self::Thursday => Weekday::Thursday,
            Self::Friday => Weekday::Friday,
            Self::Saturday => Weekday::Saturday,
            Self::Sunday => Weekday::Sunday,
        }
    }
}

fn one() -> u32 {
    1
}

/// A course's cadence, written as data.
///
/// Starting at `first`, every `every`-th week (counted from `first`) yields
/// one occurrence per listed weekday, up to `until` or the end of the term.
/// Dates in `skip` are left out and don't advance the `{n}` counter.
///
/// A biweekly cadence has no phase of its own; `first` is the anchor that
/// decides which weeks are "on".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RecurrenceRule {
    pub course: Course,
    pub kind: AssignmentKind,
    pub platform: Platform,
    /// Title template; `{n}` becomes the occurrence number.
    pub title: String,
    pub first: MonthDay,
    pub weekdays: Vec<DayOfWeek>,
    #[serde(default = "one")]
    pub every: u32,
    #[serde(default)]
    pub until: Option<MonthDay>,
    #[serde(default)]
    pub skip: Vec<MonthDay>,
    #[serde(default)]
    pub due_time: DueTime,
    #[serde(default = "one")]
    pub start_number: u32,
    /// Submission page shared by every occurrence.
    #[serde(default)]
    pub url: Option<String>,
}

impl RecurrenceRule {
    /// Every date this rule lands on, in order.
    pub fn occurrences(&self, term: &Term) -> Result<Vec<Date>, CalendarError> {
        if self.every == 0 {
            return Err(self.invalid("`every` must be at least 1"));
        }
        if self.weekdays.is_empty() {
            return Err(self.invalid("no weekdays listed"));
        }

        let first = term.date(self.first)?;
        let until = match self.until {
            Some(md) => term.date(md)?,
            None => term.end,
        };
        term.require(first, format!("{} `{}` first", self.course, self.title))?;
        term.require(until, format!("{} `{}` until", self.course, self.title))?;
        if until < first {
            return Err(self.invalid(&format!("until ({until}) is before first ({first})")));
        }

        let skip = self
            .skip
            .iter()
            .map(|md| term.date(*md))
            .collect::<Result<Vec<_>, _>>()?;
        let weekdays: Vec<Weekday> = self.weekdays.iter().map(|d| d.weekday()).collect();

        let mut dates = Vec::new();
        let mut date = first;
        let mut offset: u32 = 0;
        loop {
            let week = offset / 7;
            if week % self.every == 0 && weekdays.contains(&date.weekday()) && !skip.contains(&date)
            {
                dates.push(date);
            }
            if date >= until {
                break;
            }
            date = date.tomorrow()?;
            offset += 1;
        }
        Ok(dates)
    }

    /// The rule's occurrences as numbered assignments.
    pub fn assignments(&self, term: &Term) -> Result<Vec<Assignment>, CalendarError> {
        let mut out = Vec::new();
        for (n, date) in (self.start_number..).zip(self.occurrences(term)?) {
            let title = self.title.replace("{n}", &n.to_string());
            let due_at = term.at(date, self.due_time)?;
            out.push(
                Assignment::new(self.course, title, self.kind, self.platform, due_at)
                    .with_url(self.url.clone()),
            );
        }
        Ok(out)
    }

    fn invalid(&self, reason: &str) -> CalendarError {
        CalendarError::InvalidRule {
            course: self.course,
            title: self.title.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A single deadline outside any cadence: an exam, a project, a moved due date.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OneOff {
    pub course: Course,
    pub kind: AssignmentKind,
    pub platform: Platform,
    pub title: String,
    pub date: MonthDay,
    #[serde(default)]
    pub due_time: DueTime,
    #[serde(default)]
    pub url: Option<String>,
}

impl OneOff {
    pub fn assignment(&self, term: &Term) -> Result<Assignment, CalendarError> {
        let date = term.date(self.date)?;
        term.require(date, format!("{} `{}`", self.course, self.title))?;
        let due_at = term.due(self.date, self.due_time)?;
        Ok(Assignment::new(
            self.course,
            self.title.clone(),
            self.kind,
            self.platform,
            due_at,
        )
        .with_url(self.url.clone()))
    }
}

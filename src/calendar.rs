//! The assignment generator.
//!
//! A calendar is a TOML document: one `[term]` window, any number of
//! `[[rule]]` recurrence descriptors, and `[[one-off]]` deadlines.
//! Generation is a pure function of the calendar. "Today" is never an input,
//! so the same calendar yields the same list on every run.
//!
//! The Spring 2025 calendar is compiled in; `--calendar` points at another.

mod rule;
mod term;

use std::{collections::HashSet, fs, io, path::Path};

use jiff::civil::Date;
use serde::Deserialize;
use tracing::debug;

use crate::model::{Assignment, Course};

pub use rule::{OneOff, RecurrenceRule};
pub use term::{DueTime, MonthDay, Term, TermSpec};

const SPRING_2025: &str = include_str!("calendar/spring-2025.toml");

/// Configuration defects in a calendar. All of them abort the run.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("invalid month-day {0:?} (expected MM-DD)")]
    InvalidMonthDay(String),

    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i16, month: i8, day: i8 },

    #[error("invalid due time {0:?} (expected HH:MM)")]
    InvalidTime(String),

    #[error("invalid term: {0}")]
    InvalidTerm(String),

    #[error("invalid rule for {course} `{title}`: {reason}")]
    InvalidRule {
        course: Course,
        title: String,
        reason: String,
    },

    #[error("{what} falls on {date}, outside {term}")]
    OutOfTerm {
        what: String,
        date: Date,
        term: String,
    },

    #[error("duplicate assignment id {0:?}")]
    DuplicateId(String),

    #[error("date arithmetic failed: {0}")]
    Time(#[from] jiff::Error),

    #[error("failed to parse calendar: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read {path}: {source}")]
    Io { path: String, source: io::Error },
}

/// A term calendar as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Calendar {
    pub term: TermSpec,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RecurrenceRule>,
    #[serde(default, rename = "one-off")]
    pub one_offs: Vec<OneOff>,
}

impl Calendar {
    /// The compiled-in Spring 2025 calendar.
    pub fn builtin() -> Result<Self, CalendarError> {
        Self::parse(SPRING_2025)
    }

    pub fn parse(toml_text: &str) -> Result<Self, CalendarError> {
        Ok(toml::from_str(toml_text)?)
    }

    pub fn load(path: &Path) -> Result<Self, CalendarError> {
        let text = fs::read_to_string(path).map_err(|source| CalendarError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Every assignment in the term, ordered by due time then id.
    pub fn generate(&self) -> Result<Vec<Assignment>, CalendarError> {
        let term = Term::resolve(&self.term)?;

        let mut assignments = Vec::new();
        for rule in &self.rules {
            let generated = rule.assignments(&term)?;
            debug!(course = %rule.course, title = %rule.title, count = generated.len(), "expanded rule");
            assignments.extend(generated);
        }
        for one_off in &self.one_offs {
            assignments.push(one_off.assignment(&term)?);
        }

        let mut seen = HashSet::new();
        for a in &assignments {
            if !seen.insert(a.id.as_str()) {
                return Err(CalendarError::DuplicateId(a.id.clone()));
            }
        }

        assignments.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.id.cmp(&b.id)));
        Ok(assignments)
    }
}

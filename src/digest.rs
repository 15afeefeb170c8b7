//! The digest: what gets reported for one run.
//!
//! Built from the reconciler's `to_report` list and the current moment in
//! Central Time. The Monday flag and the "due today" subset are computed here
//! and never persisted.

mod render;

use jiff::{Timestamp, Zoned, civil::Weekday};

use crate::model::Task;

const HOUR: i64 = 60 * 60;
const DAY: i64 = 24 * HOUR;

/// Incomplete tasks plus the per-run decoration the formatter needs.
#[derive(Debug, Clone)]
pub struct Digest {
    /// When the digest was built, in Central Time.
    pub now: Zoned,
    /// Incomplete tasks, due-date ascending.
    pub tasks: Vec<Task>,
    pub is_monday: bool,
    /// On Mondays, the reminder-course tasks due today. Empty otherwise.
    pub due_today: Vec<Task>,
}

impl Digest {
    pub fn build(to_report: Vec<Task>, now: Zoned) -> Self {
        let is_monday = now.weekday() == Weekday::Monday;
        let today = now.date();
        let due_today = if is_monday {
            to_report
                .iter()
                .filter(|t| t.course.has_monday_reminder() && t.due_date(now.time_zone()) == today)
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        Self {
            now,
            tasks: to_report,
            is_monday,
            due_today,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks whose deadline has passed.
    pub fn overdue(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.seconds_left(t) < 0)
            .collect()
    }

    /// Tasks due within the next seven days.
    pub fn this_week(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| (0..=7 * DAY).contains(&self.seconds_left(t)))
            .collect()
    }

    /// Tasks due more than seven days out.
    pub fn later(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.seconds_left(t) > 7 * DAY)
            .collect()
    }

    /// How many tasks close within the next 24 hours.
    pub fn due_within_day(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| (0..DAY).contains(&self.seconds_left(t)))
            .count()
    }

    fn seconds_left(&self, task: &Task) -> i64 {
        task.due_at.duration_since(self.now.timestamp()).as_secs()
    }
}

/// How close a deadline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    /// Less than a day left; whole hours remaining.
    Hours(i64),
    Tomorrow,
    Days(i64),
}

impl Urgency {
    pub fn between(due: Timestamp, now: Timestamp) -> Self {
        let secs = due.duration_since(now).as_secs();
        if secs < 0 {
            Self::Overdue
        } else if secs < DAY {
            Self::Hours(secs / HOUR)
        } else if secs < 2 * DAY {
            Self::Tomorrow
        } else {
            Self::Days(secs / DAY)
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Overdue => "overdue".to_string(),
            Self::Hours(h) => format!("{h}h left"),
            Self::Tomorrow => "tomorrow".to_string(),
            Self::Days(d) => format!("{d} days"),
        }
    }
}

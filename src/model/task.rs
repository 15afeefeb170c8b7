//! Tasks: persisted assignments with a completion flag.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};

use super::{Assignment, AssignmentKind, Course, Platform, due_at};

/// One row of the persisted store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub course: Course,
    #[serde(default)]
    pub kind: AssignmentKind,
    pub platform: Platform,
    #[serde(with = "due_at")]
    pub due_at: Timestamp,
    /// Submission page, linked from the digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub completed: bool,
}

impl Task {
    pub fn from_assignment(assignment: &Assignment, completed: bool) -> Self {
        Self {
            id: assignment.id.clone(),
            title: assignment.title.clone(),
            course: assignment.course,
            kind: assignment.kind,
            platform: assignment.platform,
            due_at: assignment.due_at,
            url: assignment.url.clone(),
            completed,
        }
    }

    /// The civil date this task is due on in `tz`.
    pub fn due_date(&self, tz: &TimeZone) -> Date {
        self.due_at.to_zoned(tz.clone()).date()
    }
}

//! Assignments: one generated deadline.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{AssignmentKind, Course, Platform, due_at};

/// A deadline produced by the calendar for this run.
///
/// Never persisted on its own. Reconciliation turns it into a [`Task`](super::Task).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub course: Course,
    pub kind: AssignmentKind,
    pub platform: Platform,
    #[serde(with = "due_at")]
    pub due_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Assignment {
    /// Builds an assignment, deriving its id from course and title.
    pub fn new(
        course: Course,
        title: impl Into<String>,
        kind: AssignmentKind,
        platform: Platform,
        due_at: Timestamp,
    ) -> Self {
        let title = title.into();
        Self {
            id: task_id(course, &title),
            title,
            course,
            kind,
            platform,
            due_at,
            url: None,
        }
    }

    /// Attaches a submission link.
    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }
}

/// Stable id for a (course, title) pair.
///
/// Lowercases both parts and collapses every run of characters outside
/// `[a-z0-9]` into one underscore: `("CS 128", "MP 3")` becomes `cs_128__mp_3`.
pub fn task_id(course: Course, title: &str) -> String {
    format!("{}__{}", slug(course.name()), slug(title))
}

fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_sep = false;
    for c in s.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}

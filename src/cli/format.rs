//! Output formatting for CLI display.

use jiff::tz::TimeZone;

use crate::model::Task;
use crate::reconcile::ReconcileStats;

/// One task per line: completion mark, due time, course, title, id.
pub(super) fn format_task(task: &Task, tz: &TimeZone) -> String {
    let mark = if task.completed { "x" } else { " " };
    let due = task.due_at.to_zoned(tz.clone()).strftime("%a %b %d %H:%M");
    format!(
        "[{mark}] {due}  {:<8}  {}  ({})",
        task.course.name(),
        task.title,
        task.id
    )
}

pub(super) fn format_stats(stats: &ReconcileStats) -> String {
    format!(
        "{} new, {} carried, {} completed, {} dropped",
        stats.added, stats.carried, stats.completed, stats.dropped
    )
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::model::{Assignment, AssignmentKind, CENTRAL, Course, Platform};

    fn task(completed: bool) -> Task {
        let due: Timestamp = "2025-02-11T05:59:00Z".parse().unwrap();
        Task::from_assignment(
            &Assignment::new(
                Course::Cs128,
                "MP 2",
                AssignmentKind::MachineProblem,
                Platform::PrairieLearn,
                due,
            ),
            completed,
        )
    }

    #[test]
    fn format_incomplete_task() {
        let tz = TimeZone::get(CENTRAL).unwrap();
        assert_eq!(
            format_task(&task(false), &tz),
            "[ ] Mon Feb 10 23:59  CS 128    MP 2  (cs_128__mp_2)"
        );
    }

    #[test]
    fn format_completed_task() {
        let tz = TimeZone::get(CENTRAL).unwrap();
        assert!(format_task(&task(true), &tz).starts_with("[x] "));
    }

    #[test]
    fn format_reconcile_stats() {
        let stats = ReconcileStats {
            added: 2,
            carried: 40,
            completed: 11,
            dropped: 1,
        };
        assert_eq!(
            format_stats(&stats),
            "2 new, 40 carried, 11 completed, 1 dropped"
        );
    }
}

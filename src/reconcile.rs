//! Task reconciliation: merge a fresh assignment list into the stored tasks.
//!
//! Pure: no I/O, no clock. The store is passed in and the new store is returned.
//!
//! Policy:
//! - A task's `completed` flag is carried forward by id. Reconciliation alone
//!   never clears it.
//! - Metadata (title, due time, platform, kind) always comes from the generator.
//! - Ids the generator no longer produces are dropped.
//!
//! The store is the only source of completion. The dashboard's check-offs
//! live in its browser and never flow back here, so a task finished only on
//! the dashboard keeps appearing in the digest until `ddl complete <id>`
//! marks it in the store.

use std::collections::HashMap;

use crate::model::{Assignment, Task};

/// The outcome of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The new store contents, ordered by due time then id.
    pub updated: Vec<Task>,
    /// The incomplete subset of `updated`, same order.
    pub to_report: Vec<Task>,
    pub stats: ReconcileStats,
}

/// Counts for the run log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Generated ids not seen before.
    pub added: usize,
    /// Generated ids found in the previous store.
    pub carried: usize,
    /// Tasks in `updated` marked complete.
    pub completed: usize,
    /// Previous ids the generator no longer produces.
    pub dropped: usize,
}

/// Merges `generated` against `previous`.
pub fn reconcile(generated: &[Assignment], previous: &[Task]) -> Reconciliation {
    let mut known: HashMap<&str, bool> = HashMap::with_capacity(previous.len());
    for task in previous {
        known.entry(task.id.as_str()).or_insert(task.completed);
    }

    let mut stats = ReconcileStats::default();
    let mut updated: Vec<Task> = generated
        .iter()
        .map(|a| {
            let completed = match known.get(a.id.as_str()) {
                Some(&completed) => {
                    stats.carried += 1;
                    completed
                }
                None => {
                    stats.added += 1;
                    false
                }
            };
            Task::from_assignment(a, completed)
        })
        .collect();
    updated.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.id.cmp(&b.id)));

    stats.dropped = known.len().saturating_sub(stats.carried);
    stats.completed = updated.iter().filter(|t| t.completed).count();

    let to_report = updated.iter().filter(|t| !t.completed).cloned().collect();

    Reconciliation {
        updated,
        to_report,
        stats,
    }
}

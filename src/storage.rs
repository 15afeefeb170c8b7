//! The persisted task store.
//!
//! One JSON file holding an array of tasks, due-date ascending:
//!
//! ```text
//! [
//!   { "id": "cs_173__hw_1", "title": "HW 1", "course": "CS 173",
//!     "kind": "homework", "platform": "PrairieLearn",
//!     "due_at": "2025-01-27T23:59:00-06:00", "completed": false },
//!   ...
//! ]
//! ```
//!
//! The file is read once at the start of a run and fully rewritten at the end.
//! Writes go to a sibling temp file that is renamed into place, so a crash
//! mid-write leaves the previous store intact.

use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::model::Task;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no task matching '{0}'")]
    TaskNotFound(String),

    #[error("'{reference}' is ambiguous: matches {}", .candidates.join(", "))]
    AmbiguousTask {
        reference: String,
        candidates: Vec<String>,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// File-backed task store.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all tasks. A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<Task>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&json).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Loads all tasks, treating an unreadable or corrupt store as empty.
    ///
    /// Losing completion history is recoverable (re-check items on the
    /// dashboard); failing the whole run is not.
    pub fn load_or_empty(&self) -> Vec<Task> {
        match self.load() {
            Ok(tasks) => {
                debug!(path = %self.path.display(), count = tasks.len(), "loaded store");
                tasks
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store unreadable, starting fresh");
                Vec::new()
            }
        }
    }

    /// Replaces the store with `tasks`.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut json = serde_json::to_string_pretty(tasks).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        json.push('\n');

        let tmp_path = self.tmp_path();
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(e));
        }

        debug!(path = %self.path.display(), count = tasks.len(), "saved store");
        Ok(())
    }

    /// Sets the completion flag of one stored task, returning the updated task.
    ///
    /// `reference` is a full id or an unambiguous id prefix.
    pub fn set_completed(&self, reference: &str, completed: bool) -> Result<Task> {
        let mut tasks = self.load()?;
        let index = resolve(&tasks, reference)?;
        tasks[index].completed = completed;
        let task = tasks[index].clone();
        self.save(&tasks)?;
        Ok(task)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Resolve a task reference (full id or unambiguous prefix) to an index.
fn resolve(tasks: &[Task], reference: &str) -> Result<usize> {
    if let Some(i) = tasks.iter().position(|t| t.id == reference) {
        return Ok(i);
    }

    let matches: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.id.starts_with(reference))
        .map(|(i, _)| i)
        .collect();

    match matches.as_slice() {
        [] => Err(StorageError::TaskNotFound(reference.to_string())),
        [i] => Ok(*i),
        many => Err(StorageError::AmbiguousTask {
            reference: reference.to_string(),
            candidates: many.iter().map(|&i| tasks[i].id.clone()).collect(),
        }),
    }
}

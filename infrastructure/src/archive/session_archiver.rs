//! Date-partitioned task archive.
//!
//! Each completed task is written as one JSON document under
//! `<root>/YYYY-MM-DD/task-<id>.json`, carrying the task, the resolved
//! panel, and its results. Archival is best-effort: every failure is
//! logged and swallowed so a full disk never fails a run.

use std::path::{Path, PathBuf};

use panel_domain::{Criterion, Persona, Task, TaskResult};
use serde::Serialize;
use tracing::warn;

/// Archive document layout, one per task.
#[derive(Serialize)]
struct ArchiveDocument<'a> {
    archived_at: String,
    task: &'a Task,
    personas: &'a [Persona],
    criteria: &'a [Criterion],
    results: &'a [TaskResult],
}

/// Writes task snapshots into a date-partitioned directory tree.
pub struct SessionArchiver {
    root: PathBuf,
}

impl SessionArchiver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Archives one task with its resolved panel and results.
    ///
    /// Returns the written path, or `None` when any step failed (the
    /// failure is logged at warn level).
    pub fn archive_task(
        &self,
        task: &Task,
        personas: &[Persona],
        criteria: &[Criterion],
        results: &[TaskResult],
    ) -> Option<PathBuf> {
        let day = chrono::Local::now().format("%Y-%m-%d").to_string();
        let dir = self.root.join(day);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("Could not create archive directory {}: {}", dir.display(), e);
            return None;
        }

        let document = ArchiveDocument {
            archived_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            task,
            personas,
            criteria,
            results,
        };
        let json = match serde_json::to_string_pretty(&document) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize archive for task {}: {}", task.id, e);
                return None;
            }
        };

        let path = dir.join(format!("task-{}.json", task.id));
        if let Err(e) = std::fs::write(&path, json) {
            warn!("Could not write archive {}: {}", path.display(), e);
            return None;
        }
        Some(path)
    }
}

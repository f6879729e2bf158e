//! Progress notification port
//!
//! Defines the interface for reporting generation progress. Implementations
//! live in the presentation layer (progress bar, JSON event stream, ...).
//! Absence of a sink is legal; callbacks are synchronous and must be cheap.

use panel_domain::{TaskId, TaskStatus};
use serde::Serialize;

/// Snapshot emitted once per finished persona generation unit.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaProgress {
    pub task_id: TaskId,
    pub task_title: String,
    pub persona_name: String,
    /// 1-based position of this persona within its task
    pub persona_index: usize,
    pub persona_total: usize,
    /// Units finished across the orchestrator's lifetime, incremented
    /// exactly once per unit
    pub global_done: usize,
    /// Planning denominator fixed at orchestrator construction, not
    /// re-derived as tasks are added
    pub global_total: usize,
    pub queue_depth: usize,
}

/// Emitted when a task reaches a terminal status.
#[derive(Debug, Clone, Serialize)]
pub struct TaskProgress {
    pub task_id: TaskId,
    pub task_title: String,
    pub status: TaskStatus,
}

/// Callback sink for orchestrator progress.
///
/// Persona events arrive in completion order, not submission order, since
/// units race under bounded parallelism.
pub trait ProgressNotifier: Send + Sync {
    /// Called after each persona generation unit finishes
    fn on_persona_done(&self, event: &PersonaProgress);

    /// Called when a task completes or fails
    fn on_task_done(&self, event: &TaskProgress);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_persona_done(&self, _event: &PersonaProgress) {}
    fn on_task_done(&self, _event: &TaskProgress) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_progress_serializes_flat() {
        let event = PersonaProgress {
            task_id: TaskId::new(3),
            task_title: "Spring event".to_string(),
            persona_name: "Casual A".to_string(),
            persona_index: 1,
            persona_total: 3,
            global_done: 4,
            global_total: 9,
            queue_depth: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["task_id"], 3);
        assert_eq!(json["persona_index"], 1);
        assert_eq!(json["global_total"], 9);
        assert_eq!(json["queue_depth"], 2);
    }

    #[test]
    fn task_progress_carries_terminal_status() {
        let event = TaskProgress {
            task_id: TaskId::new(1),
            task_title: "Spring event".to_string(),
            status: TaskStatus::Completed,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"], "completed");
    }
}

//! Progress reporting for panel runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use panel_application::ports::progress::{PersonaProgress, ProgressNotifier, TaskProgress};
use panel_domain::TaskStatus;

/// Reports run progress with a single bar over the global unit total.
///
/// Persona events carry the orchestrator's `global_done` counter, so the
/// bar is positioned from the event instead of incremented locally.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(global_total: usize) -> Self {
        let bar = ProgressBar::new(global_total as u64);
        bar.set_style(Self::bar_style());
        bar.set_prefix("Panel");
        bar.set_message("starting...");
        Self { bar }
    }

    /// Finishes the bar once the queue has drained.
    pub fn finish(&self) {
        self.bar
            .finish_with_message(format!("{}", "complete!".green()));
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_persona_done(&self, event: &PersonaProgress) {
        self.bar.set_message(format!(
            "{} ({}/{} in '{}')",
            event.persona_name,
            event.persona_index,
            event.persona_total,
            truncate_title(&event.task_title),
        ));
        self.bar.set_position(event.global_done as u64);
    }

    fn on_task_done(&self, event: &TaskProgress) {
        let mark = if event.status == TaskStatus::Completed {
            format!("{}", "v".green())
        } else {
            format!("{}", "x".red())
        };
        self.bar.println(format!(
            "{} task {}: {}",
            mark, event.task_id, event.task_title
        ));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_persona_done(&self, event: &PersonaProgress) {
        println!(
            "  [{}/{}] {} ({}/{} in '{}')",
            event.global_done,
            event.global_total,
            event.persona_name,
            event.persona_index,
            event.persona_total,
            truncate_title(&event.task_title),
        );
    }

    fn on_task_done(&self, event: &TaskProgress) {
        if event.status == TaskStatus::Completed {
            println!("{} task {}: {}", "v".green(), event.task_id, event.task_title);
        } else {
            println!(
                "{} task {}: {} (failed)",
                "x".red(),
                event.task_id,
                event.task_title
            );
        }
    }
}

fn truncate_title(title: &str) -> String {
    panel_domain::util::truncate_str(title, 32).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_domain::TaskId;

    fn persona_event(done: usize) -> PersonaProgress {
        PersonaProgress {
            task_id: TaskId::new(1),
            task_title: "Spring event proposal".to_string(),
            persona_name: "Casual A".to_string(),
            persona_index: 1,
            persona_total: 3,
            global_done: done,
            global_total: 6,
            queue_depth: 0,
        }
    }

    #[test]
    fn bar_tracks_the_global_counter() {
        let reporter = ProgressReporter::new(6);
        reporter.on_persona_done(&persona_event(2));
        assert_eq!(reporter.bar.position(), 2);
        reporter.on_persona_done(&persona_event(5));
        assert_eq!(reporter.bar.position(), 5);
        reporter.finish();
    }

    #[test]
    fn task_events_do_not_panic_either_notifier() {
        let event = TaskProgress {
            task_id: TaskId::new(3),
            task_title: "Gacha rerate".to_string(),
            status: TaskStatus::Failed,
        };
        ProgressReporter::new(1).on_task_done(&event);
        SimpleProgress.on_task_done(&event);
        SimpleProgress.on_persona_done(&persona_event(1));
    }
}

//! Console output formatting for panel run results

use colored::Colorize;
use panel_application::ValidationReport;
use panel_domain::util::truncate_str;
use panel_domain::{Distribution, PanelSummary, Task, TaskResult, TaskStatus};
use serde::Serialize;
use std::collections::HashMap;

/// Everything a run prints once the queue has drained.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub tasks: Vec<TaskReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

/// One task with its persisted results and aggregated panels.
#[derive(Debug, Serialize)]
pub struct TaskReport {
    pub task: Task,
    pub results: Vec<TaskResult>,
    pub panels: Vec<PanelSummary>,
}

impl TaskReport {
    /// Orders the aggregated panels by criterion label so output is stable
    /// across runs.
    pub fn new(
        task: Task,
        results: Vec<TaskResult>,
        panels: HashMap<String, PanelSummary>,
    ) -> Self {
        let mut panels: Vec<PanelSummary> = panels.into_values().collect();
        panels.sort_by(|a, b| a.criterion.cmp(&b.criterion));
        Self {
            task,
            results,
            panels,
        }
    }
}

/// Formats run reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete run report
    pub fn format(report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Persona Panel Results"));
        output.push('\n');

        for task_report in &report.tasks {
            output.push_str(&Self::format_task(task_report));
        }

        if let Some(validation) = &report.validation {
            output.push_str(&Self::format_validation(validation));
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &RunReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_task(report: &TaskReport) -> String {
        let task = &report.task;
        let mut output = String::new();

        let banner = format!("── {} (task {}) ──", task.title, task.id);
        let banner = match task.status {
            TaskStatus::Completed => banner.yellow().bold(),
            TaskStatus::Failed => banner.red().bold(),
            _ => banner.dimmed(),
        };
        output.push_str(&format!("\n{}\n", banner));

        if let Some(text) = &task.stimulus_text {
            output.push_str(&format!(
                "{} {}\n",
                "Stimulus:".cyan().bold(),
                truncate_str(text, 160)
            ));
        }
        if let Some(name) = &task.image_name {
            output.push_str(&format!("{} {}\n", "Image:".cyan().bold(), name));
        }
        if let Some(error) = &task.error {
            let label = if task.status == TaskStatus::Failed {
                "Error:".red().bold()
            } else {
                "Note:".yellow().bold()
            };
            output.push_str(&format!("{} {}\n", label, error));
        }

        for result in &report.results {
            output.push_str(&format!(
                "  * {} {} {}\n",
                format!("{}/5", result.rating).bold(),
                Self::distribution_cells(&result.distribution),
                truncate_str(&result.summary, 160)
            ));
        }

        if !report.panels.is_empty() {
            output.push_str(&format!("\n{}\n", "Panels:".cyan().bold()));
            for panel in &report.panels {
                output.push_str(&format!(
                    "  * {}: mean {:.2} across {} results {}\n",
                    panel.criterion,
                    panel.mean_rating,
                    panel.sample_size,
                    Self::distribution_cells(&panel.distribution)
                ));
            }
        }

        output
    }

    fn format_validation(report: &ValidationReport) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header("Benchmark Validation"));

        if report.matches.is_empty() {
            output.push_str("No benchmark matched a completed task.\n");
            return output;
        }

        for matched in &report.matches {
            let scope = match &matched.session_label {
                Some(session) => format!("{} [{}]", matched.title, session),
                None => matched.title.clone(),
            };
            output.push_str(&format!(
                "  * {} / {}: similarity {:.3} (human {:.2}, panel {:.2}, n={})\n",
                scope.bold(),
                matched.criterion,
                matched.ks_similarity,
                matched.human_mean,
                matched.synthetic_mean,
                matched.sample_size
            ));
        }

        output.push_str(&format!(
            "\n{} {:.1}% of a {:.3} noise ceiling\n",
            "Attainment:".green().bold(),
            report.estimate.attainment * 100.0,
            report.estimate.ceiling
        ));

        output
    }

    fn distribution_cells(distribution: &Distribution) -> String {
        let cells: Vec<String> = distribution
            .values()
            .iter()
            .map(|v| format!("{:.2}", v))
            .collect();
        format!("[{}]", cells.join(" "))
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_application::BenchmarkMatch;
    use panel_domain::{AttainmentEstimate, BenchmarkId, CriterionId, PersonaId, TaskId};

    fn sample_task() -> Task {
        let mut task = Task::new(
            TaskId::new(1),
            "Spring event proposal",
            vec![PersonaId::new(1)],
            vec![CriterionId::new(1)],
        )
        .unwrap()
        .with_stimulus_text("Limited spring gacha with a step-up banner.");
        task.complete(Some("persona 1: responder fell back".to_string()));
        task
    }

    fn sample_result() -> TaskResult {
        TaskResult::new(
            TaskId::new(1),
            PersonaId::new(1),
            CriterionId::new(1),
            "Casual A (24/Female) evaluated Retention intent. Looks fun enough to log in for.",
            Distribution::try_new([0.05, 0.10, 0.15, 0.40, 0.30]).unwrap(),
        )
    }

    fn sample_panel(criterion: &str) -> PanelSummary {
        PanelSummary {
            criterion: criterion.to_string(),
            distribution: Distribution::try_new([0.05, 0.10, 0.15, 0.40, 0.30]).unwrap(),
            mean_rating: 3.80,
            sample_size: 3,
        }
    }

    fn sample_report(validation: Option<ValidationReport>) -> RunReport {
        let mut panels = HashMap::new();
        panels.insert(
            "Retention intent".to_string(),
            sample_panel("Retention intent"),
        );
        panels.insert("Appeal".to_string(), sample_panel("Appeal"));
        RunReport {
            tasks: vec![TaskReport::new(
                sample_task(),
                vec![sample_result()],
                panels,
            )],
            validation,
        }
    }

    #[test]
    fn panels_are_sorted_by_criterion() {
        colored::control::set_override(false);
        let report = sample_report(None);
        let labels: Vec<&str> = report.tasks[0]
            .panels
            .iter()
            .map(|p| p.criterion.as_str())
            .collect();
        assert_eq!(labels, vec!["Appeal", "Retention intent"]);
    }

    #[test]
    fn format_covers_task_results_and_panels() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&sample_report(None));
        assert!(text.contains("Persona Panel Results"));
        assert!(text.contains("── Spring event proposal (task 1) ──"));
        assert!(text.contains("Stimulus: Limited spring gacha"));
        assert!(text.contains("Note: persona 1: responder fell back"));
        assert!(text.contains("4/5 [0.05 0.10 0.15 0.40 0.30]"));
        assert!(text.contains("Retention intent: mean 3.80 across 3 results"));
    }

    #[test]
    fn failed_tasks_show_the_error_label() {
        colored::control::set_override(false);
        let mut task = sample_task();
        task.fail("all personas failed");
        let report = RunReport {
            tasks: vec![TaskReport::new(task, Vec::new(), HashMap::new())],
            validation: None,
        };
        let text = ConsoleFormatter::format(&report);
        assert!(text.contains("Error: all personas failed"));
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn validation_section_lists_matches_and_attainment() {
        colored::control::set_override(false);
        let validation = ValidationReport {
            matches: vec![BenchmarkMatch {
                benchmark_id: BenchmarkId::new(1),
                task_id: TaskId::new(1),
                title: "Spring event proposal".to_string(),
                session_label: Some("2026-spring".to_string()),
                criterion: "Retention intent".to_string(),
                ks_similarity: 0.932,
                human_mean: 3.40,
                synthetic_mean: 3.62,
                sample_size: 3,
            }],
            estimate: AttainmentEstimate {
                attainment: 0.873,
                ceiling: 0.921,
            },
        };
        let text = ConsoleFormatter::format(&sample_report(Some(validation)));
        assert!(text.contains("Benchmark Validation"));
        assert!(text.contains("Spring event proposal [2026-spring] / Retention intent"));
        assert!(text.contains("similarity 0.932 (human 3.40, panel 3.62, n=3)"));
        assert!(text.contains("Attainment: 87.3% of a 0.921 noise ceiling"));
    }

    #[test]
    fn json_output_parses_and_skips_absent_validation() {
        let json = ConsoleFormatter::format_json(&sample_report(None));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["tasks"][0]["task"]["title"],
            "Spring event proposal"
        );
        assert_eq!(value["tasks"][0]["results"][0]["rating"], 4);
        assert!(value.get("validation").is_none());
    }
}

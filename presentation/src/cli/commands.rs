//! CLI command definitions

use clap::Parser;
use panel_domain::TaskMethod;
use std::path::PathBuf;

/// CLI arguments for persona-panel
#[derive(Parser, Debug)]
#[command(name = "persona-panel")]
#[command(author, version, about = "Synthetic survey panel - personas rate liveops proposals")]
#[command(long_about = r#"
Persona Panel runs a liveops proposal past a panel of simulated players.

Each persona produces one free-text opinion, which is scored against every
criterion's five Likert anchors into a rating distribution. Completed runs
can be validated against human benchmark distributions.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./panel.toml        Project-level config
3. ~/.config/persona-panel/config.toml   Global config

Example:
  persona-panel "Double drop rates on weekends"
  persona-panel --method codex --seed 7 "Add a battle pass tier"
  persona-panel --runs 5 --benchmarks human.json "New login bonus ladder"
"#)]
pub struct Cli {
    /// Stimulus text the panel evaluates (a demo stimulus is used when
    /// omitted)
    pub stimulus: Option<String>,

    /// Task title (defaults to a truncated stimulus)
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Evaluation guidance appended to the stimulus
    #[arg(long, value_name = "TEXT")]
    pub guidance: Option<String>,

    /// Session label used for benchmark matching
    #[arg(long, value_name = "LABEL")]
    pub session: Option<String>,

    /// Scoring method: uniform, tfidf, embed, or codex
    #[arg(short, long, value_name = "METHOD")]
    pub method: Option<TaskMethod>,

    /// Deterministic run seed
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Submit the task this many times (results accumulate)
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub runs: u32,

    /// Monte-Carlo repetitions for benchmark validation
    #[arg(long, value_name = "N")]
    pub trials: Option<u32>,

    /// JSON file of human benchmarks to validate against
    #[arg(long, value_name = "PATH")]
    pub benchmarks: Option<PathBuf>,

    /// Orchestrator worker count override
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Persona concurrency override
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress bars
    #[arg(short, long)]
    pub quiet: bool,

    /// Emit the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}

//! CLI entrypoint for persona-panel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use panel_application::{
    CreateTaskInput, CreateTaskUseCase, LocalSynthesizer, OpinionResponder, PanelRepository,
    ProcessTaskUseCase, ProgressNotifier, TaskOrchestrator, ValidateBenchmarksInput,
    ValidateBenchmarksUseCase,
};
use panel_domain::util::truncate_str;
use panel_domain::{
    Criterion, CriterionId, DistributionScorer, OpsContext, TaskStatus, TemplateId,
    aggregate_panels,
};
use panel_infrastructure::{
    CodexResponder, ConfigLoader, FileConfig, HashEncoder, InMemoryPanelRepository,
    SessionArchiver, load_benchmarks, seed_demo_panel,
};
use panel_presentation::{
    Cli, ConsoleFormatter, ProgressReporter, RunReport, SimpleProgress, TaskReport,
};
use std::collections::HashMap;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO_STIMULUS: &str = "Limited spring festival: a 14-day login bonus ladder, a step-up \
     gacha with a guaranteed featured SSR at step five, and an event-only shop tab.";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting persona-panel");

    // Load configuration, then layer CLI overrides on top
    let config = if cli.no_config {
        FileConfig::default()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;

    let mut params = config.orchestrator_params();
    if let Some(workers) = cli.workers {
        params = params.with_workers(workers);
    }
    if let Some(limit) = cli.concurrency {
        params = params.with_persona_concurrency(limit);
    }

    // === Dependency Injection ===
    let repository = Arc::new(InMemoryPanelRepository::new());
    let seeded = seed_demo_panel(repository.as_ref())
        .await
        .context("Failed to seed the demo panel")?;

    let external: Arc<dyn OpinionResponder> = Arc::new(CodexResponder::new(config.codex_config()));
    let synthesizer: Arc<dyn OpinionResponder> = Arc::new(LocalSynthesizer);
    let scorer = Arc::new(DistributionScorer::new(Arc::new(HashEncoder::default())));

    if let Some(path) = &cli.benchmarks {
        let benchmarks = load_benchmarks(path).context("Failed to load benchmarks")?;
        for benchmark in &benchmarks {
            repository.save_benchmark(benchmark).await?;
        }
        info!(
            "Loaded {} benchmarks from {}",
            benchmarks.len(),
            path.display()
        );
    }

    // The task runs against the full stored panel
    let persona_ids = repository
        .personas()
        .await?
        .iter()
        .map(|p| p.id)
        .collect::<Vec<_>>();
    let criterion_ids = repository
        .criteria()
        .await?
        .iter()
        .map(|c| c.id)
        .collect::<Vec<_>>();

    let demo = cli.stimulus.is_none();
    let stimulus = cli
        .stimulus
        .clone()
        .unwrap_or_else(|| DEMO_STIMULUS.to_string());
    let title = cli
        .title
        .clone()
        .unwrap_or_else(|| truncate_str(&stimulus, 48).to_string());
    let method = cli.method.unwrap_or(config.scoring.method);

    let mut input = CreateTaskInput::new(title, persona_ids, criterion_ids)
        .with_stimulus_text(stimulus)
        .with_method(method);
    if demo {
        // The demo proposal carries the ops context a real submission
        // would arrive with
        input = input
            .with_guidance(
                "Judge the play experience and the sustainability of the live operation, \
                 not just the promotional appeal.",
            )
            .with_operation_context(
                OpsContext::default()
                    .with_game_title("Sample LiveOps")
                    .with_genre("RPG")
                    .with_target_metric("Retention & ARPPU")
                    .with_liveops_cadence("Weekly")
                    .with_monetization("Gacha + BP"),
            );
        if seeded {
            input = input.with_template(TemplateId::new(1));
        }
    }
    if let Some(guidance) = cli.guidance.clone() {
        input = input.with_guidance(guidance);
    }
    if let Some(label) = cli.session.clone() {
        input = input.with_session_label(label);
    }
    if let Some(seed) = cli.seed {
        input = input.with_run_seed(seed);
    }

    let task = CreateTaskUseCase::new(Arc::clone(&repository))
        .execute(input)
        .await
        .context("Failed to create the task")?;

    let runs = cli.runs.max(1) as usize;
    let planned_units = task.persona_count() * runs;

    let mut reporter = None;
    let progress: Arc<dyn ProgressNotifier> = if !cli.quiet && std::io::stderr().is_terminal() {
        let bar = Arc::new(ProgressReporter::new(planned_units));
        reporter = Some(Arc::clone(&bar));
        bar
    } else {
        Arc::new(SimpleProgress)
    };

    let process = Arc::new(ProcessTaskUseCase::new(
        Arc::clone(&repository),
        Arc::clone(&external),
        Arc::clone(&synthesizer),
        Arc::clone(&scorer),
        params.clone(),
    ));
    let orchestrator = TaskOrchestrator::start(
        Arc::clone(&repository),
        process,
        Arc::clone(&progress),
        &params,
        planned_units,
    );

    for _ in 0..runs {
        orchestrator.submit(task.id).await?;
    }
    orchestrator.drain().await;
    if let Some(bar) = &reporter {
        bar.finish();
    }

    if config.archive.enabled {
        let archiver = SessionArchiver::new(config.archive.root.clone());
        for task in repository.tasks().await? {
            if task.status != TaskStatus::Completed {
                continue;
            }
            let personas = repository.personas_by_ids(&task.persona_ids).await?;
            let criteria = repository.criteria_by_ids(&task.criterion_ids).await?;
            let results = repository.results_for_task(task.id).await?;
            if let Some(path) = archiver.archive_task(&task, &personas, &criteria, &results) {
                info!("Archived task {} to {}", task.id, path.display());
            }
        }
    }

    let validation = if cli.benchmarks.is_some() {
        let mut input = ValidateBenchmarksInput::default()
            .with_trials(cli.trials.unwrap_or(config.evaluation.trials));
        if let Some(seed) = cli.seed {
            input = input.with_seed(seed);
        }
        let report = ValidateBenchmarksUseCase::new(Arc::clone(&repository))
            .execute(input)
            .await?;
        Some(report)
    } else {
        None
    };

    let criteria: HashMap<CriterionId, Criterion> = repository
        .criteria()
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let mut tasks = Vec::new();
    for task in repository.tasks().await? {
        let results = repository.results_for_task(task.id).await?;
        let panels = aggregate_panels(&results, &criteria);
        tasks.push(TaskReport::new(task, results, panels));
    }
    let report = RunReport { tasks, validation };

    if cli.json {
        println!("{}", ConsoleFormatter::format_json(&report));
    } else {
        println!("{}", ConsoleFormatter::format(&report));
    }

    Ok(())
}

//! Process Task use case
//!
//! Runs one task end to end: persona generation fan-out under bounded
//! parallelism, distribution scoring, batch result persistence, and the
//! terminal status transition. Workers in the orchestrator call this once
//! per dequeued task.

use crate::config::OrchestratorParams;
use crate::ports::progress::{PersonaProgress, ProgressNotifier, TaskProgress};
use crate::ports::repository::{PanelRepository, RepositoryError};
use crate::ports::responder::{ImageAttachment, OpinionRequest, OpinionResponder, ResponderError};
use panel_domain::{DistributionScorer, StimulusParts, TaskId, TaskResult, TaskStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Shared counters behind the orchestrator's progress events.
///
/// `global_total` is fixed when the orchestrator is built; `global_done`
/// and `queue_depth` move as units finish and tasks enter or leave the
/// queue.
#[derive(Debug)]
pub struct ProgressCounters {
    global_done: AtomicUsize,
    global_total: usize,
    queue_depth: AtomicUsize,
}

impl ProgressCounters {
    pub fn new(global_total: usize) -> Self {
        Self {
            global_done: AtomicUsize::new(0),
            global_total,
            queue_depth: AtomicUsize::new(0),
        }
    }

    /// Marks one persona generation unit finished and returns the new
    /// completed count.
    fn unit_done(&self) -> usize {
        self.global_done.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn global_done(&self) -> usize {
        self.global_done.load(Ordering::SeqCst)
    }

    pub fn global_total(&self) -> usize {
        self.global_total
    }

    pub fn increment_queue(&self) {
        self.queue_depth.fetch_add(1, Ordering::SeqCst);
    }

    pub fn decrement_queue(&self) {
        self.queue_depth.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn queue_depth(&self) -> usize {
        self.queue_depth.load(Ordering::SeqCst)
    }
}

/// Use case for processing a single task.
///
/// Holds both responders: the primary for the task's method and the local
/// synthesizer as fallback when the external one fails mid-run.
pub struct ProcessTaskUseCase<R: PanelRepository + 'static> {
    repository: Arc<R>,
    external: Arc<dyn OpinionResponder>,
    synthesizer: Arc<dyn OpinionResponder>,
    scorer: Arc<DistributionScorer>,
    params: OrchestratorParams,
}

impl<R: PanelRepository + 'static> ProcessTaskUseCase<R> {
    pub fn new(
        repository: Arc<R>,
        external: Arc<dyn OpinionResponder>,
        synthesizer: Arc<dyn OpinionResponder>,
        scorer: Arc<DistributionScorer>,
        params: OrchestratorParams,
    ) -> Self {
        Self {
            repository,
            external,
            synthesizer,
            scorer,
            params,
        }
    }

    /// Runs the task and returns its terminal status.
    ///
    /// A responder failure without fallback fails the task (status saved,
    /// `Ok(Failed)` returned); an `Err` here means the repository itself
    /// broke and the caller decides what to do with the task.
    pub async fn execute(
        &self,
        task_id: TaskId,
        counters: &ProgressCounters,
        progress: &dyn ProgressNotifier,
    ) -> Result<TaskStatus, RepositoryError> {
        let mut task = self.repository.task(task_id).await?;
        task.begin_processing();
        self.repository.save_task(&task).await?;

        let personas = self.repository.personas_by_ids(&task.persona_ids).await?;
        let criteria = self.repository.criteria_by_ids(&task.criterion_ids).await?;
        let template = match task.prompt_template_id {
            Some(id) => Some(self.repository.prompt_template(id).await?),
            None => None,
        };

        let stimulus = StimulusParts::from_task(&task, template.as_ref()).render();
        let lens = criteria
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let image = match (&task.image_name, &task.image_data) {
            (Some(name), Some(data)) => Some(ImageAttachment {
                name: name.clone(),
                data_b64: data.clone(),
            }),
            _ => None,
        };

        info!(
            "Processing task {}: {} personas x {} criteria ({})",
            task.id,
            personas.len(),
            criteria.len(),
            task.method
        );

        let semaphore = Arc::new(Semaphore::new(self.params.persona_concurrency));
        let mut join_set = JoinSet::new();

        for (index, persona) in personas.iter().enumerate() {
            let request = OpinionRequest {
                persona: persona.clone(),
                lens: lens.clone(),
                stimulus: stimulus.clone(),
                guidance: task.guidance.clone(),
                template_text: template.as_ref().map(|t| t.content.clone()),
                ops_context: task.operation_context.clone(),
                run_seed: task.run_seed,
                image: image.clone(),
            };
            let primary = if task.method.uses_external_responder() {
                Arc::clone(&self.external)
            } else {
                Arc::clone(&self.synthesizer)
            };
            let fallback = if task.method.uses_external_responder() && self.params.fallback_enabled
            {
                Some(Arc::clone(&self.synthesizer))
            } else {
                None
            };
            let semaphore = Arc::clone(&semaphore);

            join_set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        let err = ResponderError::Failed("persona slot closed".to_string());
                        return (index, Err(err));
                    }
                };
                let outcome = generate_opinion(primary, fallback, &request).await;
                (index, outcome)
            });
        }

        // Opinions land in submission order; progress events fire in
        // completion order.
        let mut opinions: Vec<Option<String>> = vec![None; personas.len()];
        let mut warnings: Vec<String> = Vec::new();
        let mut first_error: Option<String> = None;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    match outcome {
                        Ok((opinion, warning)) => {
                            opinions[index] = Some(opinion);
                            if let Some(warning) = warning {
                                warnings.push(warning);
                            }
                        }
                        Err(e) => {
                            warn!("Persona generation failed for task {}: {}", task.id, e);
                            if first_error.is_none() {
                                first_error = Some(e.to_string());
                            }
                        }
                    }
                    let done = counters.unit_done();
                    let persona = &personas[index];
                    progress.on_persona_done(&PersonaProgress {
                        task_id: task.id,
                        task_title: task.title.clone(),
                        persona_name: persona.name.clone(),
                        persona_index: index + 1,
                        persona_total: personas.len(),
                        global_done: done,
                        global_total: counters.global_total(),
                        queue_depth: counters.queue_depth(),
                    });
                }
                Err(e) => {
                    warn!("Persona unit join error for task {}: {}", task.id, e);
                    if first_error.is_none() {
                        first_error = Some(format!("persona unit join error: {e}"));
                    }
                }
            }
        }

        if let Some(error) = first_error {
            task.fail(error);
            self.repository.save_task(&task).await?;
            progress.on_task_done(&TaskProgress {
                task_id: task.id,
                task_title: task.title.clone(),
                status: task.status,
            });
            return Ok(TaskStatus::Failed);
        }

        let method = task.method.scoring_method();
        let mut results = Vec::with_capacity(personas.len() * criteria.len());
        for (persona, opinion) in personas.iter().zip(&opinions) {
            let Some(opinion) = opinion else { continue };
            for criterion in &criteria {
                let distribution = self.scorer.score(opinion, &criterion.anchors, method);
                let summary = format!(
                    "{} ({}) evaluated {}. {}",
                    persona.name,
                    persona.demographic(),
                    criterion.label,
                    opinion
                );
                results.push(TaskResult::new(
                    task.id,
                    persona.id,
                    criterion.id,
                    summary,
                    distribution,
                ));
            }
        }
        self.repository.save_results(&results).await?;

        let warning_note = if warnings.is_empty() {
            None
        } else {
            Some(warnings.join("; "))
        };
        task.complete(warning_note);
        self.repository.save_task(&task).await?;

        info!(
            "Task {} completed with {} results ({} fallbacks)",
            task.id,
            results.len(),
            warnings.len()
        );

        progress.on_task_done(&TaskProgress {
            task_id: task.id,
            task_title: task.title.clone(),
            status: task.status,
        });

        Ok(TaskStatus::Completed)
    }
}

/// Runs one persona through the primary responder, falling back to the
/// local synthesizer when one is supplied.
///
/// Returns the opinion plus an optional fallback warning for the task
/// record.
async fn generate_opinion(
    primary: Arc<dyn OpinionResponder>,
    fallback: Option<Arc<dyn OpinionResponder>>,
    request: &OpinionRequest,
) -> Result<(String, Option<String>), ResponderError> {
    match primary.respond(request).await {
        Ok(opinion) => Ok((opinion, None)),
        Err(e) => {
            let Some(fallback) = fallback else {
                return Err(e);
            };
            warn!(
                "Responder {} failed for persona {}: {}; falling back to {}",
                primary.name(),
                request.persona.name,
                e,
                fallback.name()
            );
            let opinion = fallback.respond(request).await?;
            let warning = format!(
                "{}: {} failed ({}), used {}",
                request.persona.name,
                primary.name(),
                e,
                fallback.name()
            );
            Ok((opinion, Some(warning)))
        }
    }
}

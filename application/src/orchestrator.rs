//! Task orchestrator
//!
//! A fixed-size pool of workers pulls task ids from one shared FIFO queue
//! and runs each through `ProcessTaskUseCase`. The worker count bounds how
//! many tasks are in flight at once; fan-out within a task is bounded
//! separately by the per-task persona semaphore.

use crate::config::OrchestratorParams;
use crate::ports::progress::ProgressNotifier;
use crate::ports::repository::{PanelRepository, RepositoryError};
use crate::use_cases::process_task::{ProcessTaskUseCase, ProgressCounters};
use panel_domain::TaskId;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors surfaced by the orchestrator's public surface
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Orchestrator is shutting down")]
    ShuttingDown,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Owns the queue, the worker pool, and the progress counters.
///
/// Enqueueing is at-least-once: a submitted id sits in the queue until a
/// worker picks it up, and re-submitting a terminal task resets it to
/// `pending` for a fresh run whose results accumulate alongside earlier
/// ones.
pub struct TaskOrchestrator<R: PanelRepository + 'static> {
    repository: Arc<R>,
    sender: mpsc::UnboundedSender<TaskId>,
    counters: Arc<ProgressCounters>,
    shutdown: CancellationToken,
    workers: JoinSet<()>,
}

impl<R: PanelRepository + 'static> TaskOrchestrator<R> {
    /// Spawns the worker pool.
    ///
    /// `planned_units` is the progress denominator: the sum of persona
    /// counts across the tasks this run intends to process. It stays
    /// fixed even if more tasks are submitted later.
    pub fn start(
        repository: Arc<R>,
        process: Arc<ProcessTaskUseCase<R>>,
        progress: Arc<dyn ProgressNotifier>,
        params: &OrchestratorParams,
        planned_units: usize,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver = Arc::new(Mutex::new(receiver));
        let counters = Arc::new(ProgressCounters::new(planned_units));
        let shutdown = CancellationToken::new();
        let mut workers = JoinSet::new();

        for worker_id in 0..params.workers {
            workers.spawn(worker_loop(
                worker_id,
                Arc::clone(&receiver),
                Arc::clone(&repository),
                Arc::clone(&process),
                Arc::clone(&counters),
                Arc::clone(&progress),
                shutdown.clone(),
            ));
        }

        info!(
            "Orchestrator started: {} workers, {} planned units",
            params.workers, planned_units
        );

        Self {
            repository,
            sender,
            counters,
            shutdown,
            workers,
        }
    }

    /// Enqueues a task without waiting for it to run.
    ///
    /// A task in a terminal state is reset to `pending` (error cleared)
    /// before enqueueing; results of earlier runs are left in place.
    pub async fn submit(&self, task_id: TaskId) -> Result<(), OrchestratorError> {
        let mut task = self.repository.task(task_id).await?;
        if task.status.is_terminal() {
            task.reset_for_run();
            self.repository.save_task(&task).await?;
        }

        self.counters.increment_queue();
        if self.sender.send(task_id).is_err() {
            self.counters.decrement_queue();
            return Err(OrchestratorError::ShuttingDown);
        }
        debug!(
            "Task {} queued (depth {})",
            task_id,
            self.counters.queue_depth()
        );
        Ok(())
    }

    /// Shared progress counters, for callers that want to read the queue
    /// depth or completed-unit count directly.
    pub fn counters(&self) -> Arc<ProgressCounters> {
        Arc::clone(&self.counters)
    }

    /// Closes the queue and waits for every already-submitted task to
    /// finish.
    pub async fn drain(self) {
        let TaskOrchestrator {
            sender,
            mut workers,
            ..
        } = self;
        drop(sender);
        while workers.join_next().await.is_some() {}
        debug!("Orchestrator drained");
    }

    /// Stops queue consumption and waits only for in-flight tasks.
    ///
    /// Tasks still sitting in the queue are left in their current state;
    /// an external call already in progress is not interrupted.
    pub async fn shutdown(self) {
        let TaskOrchestrator {
            sender,
            mut workers,
            shutdown,
            ..
        } = self;
        shutdown.cancel();
        drop(sender);
        while workers.join_next().await.is_some() {}
        info!("Orchestrator shut down");
    }
}

/// One worker: pull an id, process it, repeat until the queue closes or
/// shutdown is signalled.
///
/// Repository errors escaping the use case are contained here: the task is
/// marked failed when it can still be loaded, and the worker moves on.
async fn worker_loop<R: PanelRepository + 'static>(
    worker_id: usize,
    queue: Arc<Mutex<mpsc::UnboundedReceiver<TaskId>>>,
    repository: Arc<R>,
    process: Arc<ProcessTaskUseCase<R>>,
    counters: Arc<ProgressCounters>,
    progress: Arc<dyn ProgressNotifier>,
    shutdown: CancellationToken,
) {
    loop {
        let next = {
            let mut receiver = queue.lock().await;
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => None,
                task_id = receiver.recv() => task_id,
            }
        };
        let Some(task_id) = next else { break };
        counters.decrement_queue();
        debug!("Worker {} picked up task {}", worker_id, task_id);

        if let Err(e) = process.execute(task_id, &counters, progress.as_ref()).await {
            warn!(
                "Worker {} hit a repository error on task {}: {}",
                worker_id, task_id, e
            );
            mark_failed(repository.as_ref(), task_id, &e).await;
        }
    }
    debug!("Worker {} stopped", worker_id);
}

/// Best-effort terminal transition after a repository error.
async fn mark_failed<R: PanelRepository>(
    repository: &R,
    task_id: TaskId,
    error: &RepositoryError,
) {
    match repository.task(task_id).await {
        Ok(mut task) => {
            task.fail(error.to_string());
            if let Err(e) = repository.save_task(&task).await {
                warn!("Could not persist failure for task {}: {}", task_id, e);
            }
        }
        Err(e) => {
            warn!("Task {} unrecoverable after failure: {}", task_id, e);
        }
    }
}

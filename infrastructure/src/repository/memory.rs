//! In-memory panel repository.
//!
//! Process-lifetime store backing a single CLI run. Entities live in
//! id-ordered maps behind read/write locks; results and benchmarks are
//! append-only rows. Writes from concurrent workers interleave freely
//! since no lock is held across an await point.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use panel_application::ports::repository::{PanelRepository, RepositoryError};
use panel_domain::{
    Criterion, CriterionId, HumanBenchmark, Persona, PersonaId, PromptTemplate, Task, TaskId,
    TaskResult, TemplateId,
};

/// [`PanelRepository`] over plain in-process maps.
#[derive(Default)]
pub struct InMemoryPanelRepository {
    task_seq: AtomicU64,
    tasks: RwLock<BTreeMap<TaskId, Task>>,
    personas: RwLock<BTreeMap<PersonaId, Persona>>,
    criteria: RwLock<BTreeMap<CriterionId, Criterion>>,
    templates: RwLock<BTreeMap<TemplateId, PromptTemplate>>,
    results: RwLock<Vec<TaskResult>>,
    benchmarks: RwLock<Vec<HumanBenchmark>>,
}

impl InMemoryPanelRepository {
    pub fn new() -> Self {
        Self {
            task_seq: AtomicU64::new(1),
            ..Self::default()
        }
    }
}

fn read<'a, T>(
    lock: &'a RwLock<T>,
    what: &str,
) -> Result<std::sync::RwLockReadGuard<'a, T>, RepositoryError> {
    lock.read()
        .map_err(|_| RepositoryError::Storage(format!("{what} lock poisoned")))
}

fn write<'a, T>(
    lock: &'a RwLock<T>,
    what: &str,
) -> Result<std::sync::RwLockWriteGuard<'a, T>, RepositoryError> {
    lock.write()
        .map_err(|_| RepositoryError::Storage(format!("{what} lock poisoned")))
}

#[async_trait]
impl PanelRepository for InMemoryPanelRepository {
    async fn next_task_id(&self) -> Result<TaskId, RepositoryError> {
        Ok(TaskId::new(self.task_seq.fetch_add(1, Ordering::SeqCst)))
    }

    async fn task(&self, id: TaskId) -> Result<Task, RepositoryError> {
        read(&self.tasks, "tasks")?
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::TaskNotFound(id))
    }

    async fn save_task(&self, task: &Task) -> Result<(), RepositoryError> {
        // Keeps the sequence ahead of externally assigned ids.
        self.task_seq
            .fetch_max(task.id.value() + 1, Ordering::SeqCst);
        write(&self.tasks, "tasks")?.insert(task.id, task.clone());
        Ok(())
    }

    async fn tasks(&self) -> Result<Vec<Task>, RepositoryError> {
        Ok(read(&self.tasks, "tasks")?.values().cloned().collect())
    }

    async fn personas(&self) -> Result<Vec<Persona>, RepositoryError> {
        Ok(read(&self.personas, "personas")?
            .values()
            .cloned()
            .collect())
    }

    async fn personas_by_ids(&self, ids: &[PersonaId]) -> Result<Vec<Persona>, RepositoryError> {
        let personas = read(&self.personas, "personas")?;
        ids.iter()
            .map(|id| {
                personas
                    .get(id)
                    .cloned()
                    .ok_or(RepositoryError::PersonaNotFound(*id))
            })
            .collect()
    }

    async fn save_persona(&self, persona: &Persona) -> Result<(), RepositoryError> {
        write(&self.personas, "personas")?.insert(persona.id, persona.clone());
        Ok(())
    }

    async fn criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        Ok(read(&self.criteria, "criteria")?
            .values()
            .cloned()
            .collect())
    }

    async fn criteria_by_ids(&self, ids: &[CriterionId]) -> Result<Vec<Criterion>, RepositoryError> {
        let criteria = read(&self.criteria, "criteria")?;
        ids.iter()
            .map(|id| {
                criteria
                    .get(id)
                    .cloned()
                    .ok_or(RepositoryError::CriterionNotFound(*id))
            })
            .collect()
    }

    async fn save_criterion(&self, criterion: &Criterion) -> Result<(), RepositoryError> {
        write(&self.criteria, "criteria")?.insert(criterion.id, criterion.clone());
        Ok(())
    }

    async fn prompt_template(&self, id: TemplateId) -> Result<PromptTemplate, RepositoryError> {
        read(&self.templates, "templates")?
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::TemplateNotFound(id))
    }

    async fn save_template(&self, template: &PromptTemplate) -> Result<(), RepositoryError> {
        write(&self.templates, "templates")?.insert(template.id, template.clone());
        Ok(())
    }

    async fn save_results(&self, results: &[TaskResult]) -> Result<(), RepositoryError> {
        write(&self.results, "results")?.extend_from_slice(results);
        Ok(())
    }

    async fn results_for_task(&self, id: TaskId) -> Result<Vec<TaskResult>, RepositoryError> {
        Ok(read(&self.results, "results")?
            .iter()
            .filter(|r| r.task_id == id)
            .cloned()
            .collect())
    }

    async fn benchmarks(&self) -> Result<Vec<HumanBenchmark>, RepositoryError> {
        Ok(read(&self.benchmarks, "benchmarks")?.clone())
    }

    async fn save_benchmark(&self, benchmark: &HumanBenchmark) -> Result<(), RepositoryError> {
        write(&self.benchmarks, "benchmarks")?.push(benchmark.clone());
        Ok(())
    }
}

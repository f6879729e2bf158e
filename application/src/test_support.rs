//! Shared test doubles for use case and orchestrator tests.

use crate::ports::repository::{PanelRepository, RepositoryError};
use async_trait::async_trait;
use panel_domain::{
    Criterion, CriterionId, DistributionScorer, HumanBenchmark, Persona, PersonaId, PromptTemplate,
    SentenceEncoder, Task, TaskId, TaskResult, TemplateId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory repository double backing the scheduling and validation
/// tests.
pub(crate) struct StubRepository {
    next_task_id: AtomicU64,
    tasks: Mutex<HashMap<TaskId, Task>>,
    personas: Mutex<HashMap<PersonaId, Persona>>,
    criteria: Mutex<HashMap<CriterionId, Criterion>>,
    templates: Mutex<HashMap<TemplateId, PromptTemplate>>,
    results: Mutex<Vec<TaskResult>>,
    benchmarks: Mutex<Vec<HumanBenchmark>>,
}

impl StubRepository {
    pub(crate) fn new() -> Self {
        Self {
            next_task_id: AtomicU64::new(1),
            tasks: Mutex::new(HashMap::new()),
            personas: Mutex::new(HashMap::new()),
            criteria: Mutex::new(HashMap::new()),
            templates: Mutex::new(HashMap::new()),
            results: Mutex::new(Vec::new()),
            benchmarks: Mutex::new(Vec::new()),
        }
    }

    /// Two personas and one criterion, the smallest interesting panel.
    pub(crate) fn with_small_panel() -> Self {
        let repo = Self::new();
        repo.insert_persona(Persona::new(PersonaId::new(1), "Casual A", 19, "Female"));
        repo.insert_persona(Persona::new(PersonaId::new(2), "Core B", 32, "Male"));
        repo.insert_criterion(Criterion::new(
            CriterionId::new(1),
            "Retention intent",
            "Would you keep playing?",
            None,
        ));
        repo
    }

    pub(crate) fn insert_task(&self, task: Task) {
        self.tasks.lock().unwrap().insert(task.id, task);
    }

    pub(crate) fn insert_persona(&self, persona: Persona) {
        self.personas.lock().unwrap().insert(persona.id, persona);
    }

    pub(crate) fn insert_criterion(&self, criterion: Criterion) {
        self.criteria.lock().unwrap().insert(criterion.id, criterion);
    }

    pub(crate) fn insert_template(&self, template: PromptTemplate) {
        self.templates.lock().unwrap().insert(template.id, template);
    }

    pub(crate) fn insert_benchmark(&self, benchmark: HumanBenchmark) {
        self.benchmarks.lock().unwrap().push(benchmark);
    }

    pub(crate) fn insert_result(&self, result: TaskResult) {
        self.results.lock().unwrap().push(result);
    }

    pub(crate) fn stored_task(&self, id: TaskId) -> Task {
        self.tasks.lock().unwrap().get(&id).cloned().unwrap()
    }

    pub(crate) fn stored_results(&self) -> Vec<TaskResult> {
        self.results.lock().unwrap().clone()
    }
}

#[async_trait]
impl PanelRepository for StubRepository {
    async fn next_task_id(&self) -> Result<TaskId, RepositoryError> {
        Ok(TaskId::new(self.next_task_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn task(&self, id: TaskId) -> Result<Task, RepositoryError> {
        self.tasks
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::TaskNotFound(id))
    }

    async fn save_task(&self, task: &Task) -> Result<(), RepositoryError> {
        self.tasks.lock().unwrap().insert(task.id, task.clone());
        Ok(())
    }

    async fn tasks(&self) -> Result<Vec<Task>, RepositoryError> {
        let mut tasks: Vec<Task> = self.tasks.lock().unwrap().values().cloned().collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn personas(&self) -> Result<Vec<Persona>, RepositoryError> {
        let mut personas: Vec<Persona> =
            self.personas.lock().unwrap().values().cloned().collect();
        personas.sort_by_key(|p| p.id);
        Ok(personas)
    }

    async fn personas_by_ids(&self, ids: &[PersonaId]) -> Result<Vec<Persona>, RepositoryError> {
        let personas = self.personas.lock().unwrap();
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
        self.insert_persona(persona.clone());
        Ok(())
    }

    async fn criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        let mut criteria: Vec<Criterion> =
            self.criteria.lock().unwrap().values().cloned().collect();
        criteria.sort_by_key(|c| c.id);
        Ok(criteria)
    }

    async fn criteria_by_ids(&self, ids: &[CriterionId]) -> Result<Vec<Criterion>, RepositoryError> {
        let criteria = self.criteria.lock().unwrap();
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
        self.insert_criterion(criterion.clone());
        Ok(())
    }

    async fn prompt_template(&self, id: TemplateId) -> Result<PromptTemplate, RepositoryError> {
        self.templates
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::TemplateNotFound(id))
    }

    async fn save_template(&self, template: &PromptTemplate) -> Result<(), RepositoryError> {
        self.insert_template(template.clone());
        Ok(())
    }

    async fn save_results(&self, results: &[TaskResult]) -> Result<(), RepositoryError> {
        self.results.lock().unwrap().extend_from_slice(results);
        Ok(())
    }

    async fn results_for_task(&self, id: TaskId) -> Result<Vec<TaskResult>, RepositoryError> {
        Ok(self
            .results
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.task_id == id)
            .cloned()
            .collect())
    }

    async fn benchmarks(&self) -> Result<Vec<HumanBenchmark>, RepositoryError> {
        Ok(self.benchmarks.lock().unwrap().clone())
    }

    async fn save_benchmark(&self, benchmark: &HumanBenchmark) -> Result<(), RepositoryError> {
        self.insert_benchmark(benchmark.clone());
        Ok(())
    }
}

/// Encoder double; offline scoring methods never reach it.
pub(crate) struct NullEncoder;

impl SentenceEncoder for NullEncoder {
    fn encode(&self, _texts: &[String]) -> Vec<Vec<f64>> {
        Vec::new()
    }
}

pub(crate) fn scorer() -> Arc<DistributionScorer> {
    Arc::new(DistributionScorer::new(Arc::new(NullEncoder)))
}

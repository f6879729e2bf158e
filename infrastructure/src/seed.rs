//! Demo panel bootstrap.
//!
//! Installs a small liveops panel (three personas, two criteria, one
//! prompt template) into an empty repository so the CLI works out of the
//! box. A store that already holds personas is left untouched.

use panel_application::ports::repository::{PanelRepository, RepositoryError};
use panel_domain::prompt::synthesis::SPEND_STANCES;
use panel_domain::{AnchorSet, Criterion, CriterionId, Persona, PersonaId, PromptTemplate, TemplateId};
use tracing::info;

/// Seeds the demo panel when the repository holds no personas.
///
/// Returns whether anything was installed.
pub async fn seed_demo_panel<R: PanelRepository>(repository: &R) -> Result<bool, RepositoryError> {
    if !repository.personas().await?.is_empty() {
        return Ok(false);
    }

    let personas = [
        Persona::new(PersonaId::new(1), "Casual A", 19, "Female")
            .with_notes("Plays daily, never spends"),
        Persona::new(PersonaId::new(2), "Core B", 32, "Male")
            .with_notes("Spends $100-200 per month"),
        Persona::new(PersonaId::new(3), "Returnee C", 28, "Female")
            .with_notes("Comes back for seasonal events"),
    ];
    for persona in &personas {
        repository.save_persona(persona).await?;
    }

    let retention = Criterion::new(
        CriterionId::new(1),
        "Retention intent",
        "Would you keep playing after this change?",
        None,
    );
    let spend = Criterion::new(
        CriterionId::new(2),
        "Spend intent",
        "Would you spend money on this?",
        Some(AnchorSet::from_slices(SPEND_STANCES)),
    );
    repository.save_criterion(&retention).await?;
    repository.save_criterion(&spend).await?;

    let template = PromptTemplate::new(
        TemplateId::new(1),
        "LiveOps baseline",
        "Answer candidly in one or two sentences, as your persona would in a player survey.",
    )
    .with_description("Default framing for liveops proposal reviews");
    repository.save_template(&template).await?;

    info!(
        "Seeded demo panel: {} personas, 2 criteria, 1 template",
        personas.len()
    );
    Ok(true)
}

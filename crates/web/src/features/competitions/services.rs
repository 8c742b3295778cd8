use sqlx::PgPool;
use storage::{
    dto::competition::{CreateCompetitionRequest, UpdateCompetitionRequest},
    error::Result,
    models::Competition,
    repository::competition::CompetitionRepository,
};
use uuid::Uuid;

use crate::live::{Change, ChangeBus};

/// List all competitions
pub async fn list_competitions(pool: &PgPool) -> Result<Vec<Competition>> {
    let repo = CompetitionRepository::new(pool);
    repo.list().await
}

/// Get competition by ID
pub async fn get_competition(pool: &PgPool, competition_id: Uuid) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    repo.find_by_id(competition_id).await
}

/// Create a new competition
pub async fn create_competition(
    pool: &PgPool,
    changes: &ChangeBus,
    request: &CreateCompetitionRequest,
) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    let competition = repo.create(request).await?;

    tracing::info!(competition_id = %competition.competition_id, "Created competition {}", competition.name);
    changes.publish(Change::Competition(competition.competition_id));

    Ok(competition)
}

/// Update a competition
pub async fn update_competition(
    pool: &PgPool,
    changes: &ChangeBus,
    competition_id: Uuid,
    request: &UpdateCompetitionRequest,
) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    let competition = repo.update(competition_id, request).await?;

    changes.publish(Change::Competition(competition_id));

    Ok(competition)
}

/// Delete a competition
pub async fn delete_competition(
    pool: &PgPool,
    changes: &ChangeBus,
    competition_id: Uuid,
) -> Result<()> {
    let repo = CompetitionRepository::new(pool);
    repo.delete(competition_id).await?;

    tracing::info!(%competition_id, "Deleted competition");
    changes.publish(Change::Competition(competition_id));

    Ok(())
}

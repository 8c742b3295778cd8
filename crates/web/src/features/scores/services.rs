use sqlx::PgPool;
use storage::{
    dto::score::{ScoreFilter, ScoreRequest, StationScoresParams},
    error::StorageError,
    models::Score,
    repository::{CompetitionRepository, ScoreRepository, ShooterRepository},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::live::{Change, ChangeBus};

pub async fn list_scores(pool: &PgPool, filter: &ScoreFilter) -> WebResult<Vec<Score>> {
    Ok(ScoreRepository::new(pool).list(filter).await?)
}

pub async fn list_station_scores(
    pool: &PgPool,
    params: &StationScoresParams,
) -> WebResult<Vec<Score>> {
    Ok(ScoreRepository::new(pool).list_for_station(params).await?)
}

pub async fn get_score(pool: &PgPool, score_id: Uuid) -> WebResult<Score> {
    Ok(ScoreRepository::new(pool).find_by_id(score_id).await?)
}

/// New registrations must point at a competition and shooter that exist.
async fn ensure_references(pool: &PgPool, request: &ScoreRequest) -> WebResult<()> {
    match CompetitionRepository::new(pool)
        .find_by_id(request.competition_id)
        .await
    {
        Err(StorageError::NotFound) => {
            return Err(WebError::BadRequest(format!(
                "Competition {} does not exist",
                request.competition_id
            )));
        }
        other => {
            other?;
        }
    }

    match ShooterRepository::new(pool).find_by_id(request.shooter_id).await {
        Err(StorageError::NotFound) => Err(WebError::BadRequest(format!(
            "Shooter {} does not exist",
            request.shooter_id
        ))),
        other => other.map(|_| ()).map_err(WebError::from),
    }
}

pub async fn create_score(
    pool: &PgPool,
    changes: &ChangeBus,
    request: &ScoreRequest,
    created_by: Option<&str>,
) -> WebResult<Score> {
    ensure_references(pool, request).await?;

    let score = ScoreRepository::new(pool)
        .create(request, created_by)
        .await?;
    changes.publish(Change::Scores(score.competition_id));

    Ok(score)
}

/// Replace a record. Both the old and the new competition are republished.
pub async fn update_score(
    pool: &PgPool,
    changes: &ChangeBus,
    score_id: Uuid,
    request: &ScoreRequest,
) -> WebResult<Score> {
    let repo = ScoreRepository::new(pool);
    let previous = repo.find_by_id(score_id).await?;

    ensure_references(pool, request).await?;
    let score = repo.update(score_id, request).await?;

    tracing::info!(%score_id, "Corrected score");
    changes.publish(Change::Scores(score.competition_id));
    if previous.competition_id != score.competition_id {
        changes.publish(Change::Scores(previous.competition_id));
    }

    Ok(score)
}

pub async fn delete_score(pool: &PgPool, changes: &ChangeBus, score_id: Uuid) -> WebResult<()> {
    let removed = ScoreRepository::new(pool).delete(score_id).await?;

    tracing::info!(%score_id, "Deleted score");
    changes.publish(Change::Scores(removed.competition_id));

    Ok(())
}

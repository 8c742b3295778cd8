use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::results::{CompetitionResults, CupStandings};
use crate::error::{Result, StorageError};
use crate::repository::league::LeagueRepository;

use super::{cup, ranking};

/// Ranks one competition against a fresh snapshot of the league.
pub async fn competition_results(pool: &PgPool, competition_id: Uuid) -> Result<CompetitionResults> {
    let league = LeagueRepository::new(pool).snapshot().await?;
    let competition = league
        .competition(competition_id)
        .ok_or(StorageError::NotFound)?;

    Ok(ranking::rank_competition(
        competition,
        &league.shooters,
        &league.scores,
    ))
}

/// Computes the season cup standings against a fresh snapshot of the league.
pub async fn cup_standings(pool: &PgPool) -> Result<CupStandings> {
    let league = LeagueRepository::new(pool).snapshot().await?;

    Ok(cup::cup_standings(
        &league.competitions,
        &league.shooters,
        &league.scores,
    ))
}

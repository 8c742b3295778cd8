use sqlx::PgPool;

use crate::dto::score::ScoreFilter;
use crate::error::Result;
use crate::models::League;

use super::competition::CompetitionRepository;
use super::score::ScoreRepository;
use super::shooter::ShooterRepository;

/// Loads everything the ranking engine needs in one go.
pub struct LeagueRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeagueRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn snapshot(&self) -> Result<League> {
        let competitions = CompetitionRepository::new(self.pool).list().await?;
        let shooters = ShooterRepository::new(self.pool).list().await?;
        let scores = ScoreRepository::new(self.pool)
            .list(&ScoreFilter::default())
            .await?;

        tracing::debug!(
            competitions = competitions.len(),
            shooters = shooters.len(),
            scores = scores.len(),
            "Loaded league snapshot"
        );

        Ok(League {
            competitions,
            shooters,
            scores,
        })
    }
}

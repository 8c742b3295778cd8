use chrono::NaiveDateTime;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::score::{ScoreFilter, ScoreRequest, StationScoresParams};
use crate::error::{Result, StorageError};
use crate::models::{Score, ScoreDetail, Shot, Station};

const SCORE_COLUMNS: &str = "score_id, competition_id, shooter_id, station, shots, total, femettor, \
                             created_at, created_by, updated_at";

#[derive(FromRow)]
struct ScoreRow {
    score_id: Uuid,
    competition_id: Uuid,
    shooter_id: Uuid,
    station: i16,
    shots: Option<Json<Vec<Shot>>>,
    total: i32,
    femettor: i32,
    created_at: NaiveDateTime,
    created_by: Option<String>,
    updated_at: Option<NaiveDateTime>,
}

impl TryFrom<ScoreRow> for Score {
    type Error = StorageError;

    fn try_from(row: ScoreRow) -> Result<Self> {
        let station = Station::try_from(row.station)
            .map_err(|e| StorageError::InvalidData(format!("score {}: {}", row.score_id, e)))?;

        Ok(Score {
            score_id: row.score_id,
            competition_id: row.competition_id,
            shooter_id: row.shooter_id,
            station,
            detail: ScoreDetail::from_parts(
                row.shots.map(|Json(shots)| shots),
                row.total,
                row.femettor,
            ),
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
        })
    }
}

pub struct ScoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List score records matching every filter that is set, in registration order
    pub async fn list(&self, filter: &ScoreFilter) -> Result<Vec<Score>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {SCORE_COLUMNS} FROM scores WHERE TRUE"));

        if let Some(competition_id) = filter.competition_id {
            query.push(" AND competition_id = ").push_bind(competition_id);
        }
        if let Some(shooter_id) = filter.shooter_id {
            query.push(" AND shooter_id = ").push_bind(shooter_id);
        }
        if let Some(station) = filter.station {
            query.push(" AND station = ").push_bind(i16::from(station));
        }
        query.push(" ORDER BY created_at, score_id");

        let rows = query
            .build_query_as::<ScoreRow>()
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Score::try_from).collect()
    }

    /// Every record of one shooter on one station of a competition
    pub async fn list_for_station(&self, params: &StationScoresParams) -> Result<Vec<Score>> {
        self.list(&ScoreFilter {
            competition_id: Some(params.competition_id),
            shooter_id: Some(params.shooter_id),
            station: Some(params.station),
        })
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Score> {
        let row = sqlx::query_as::<_, ScoreRow>(&format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE score_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }

    /// Register a series. The stored counters are always derived from the shots.
    pub async fn create(&self, req: &ScoreRequest, created_by: Option<&str>) -> Result<Score> {
        let result = req.result();

        let row = sqlx::query_as::<_, ScoreRow>(&format!(
            r#"
            INSERT INTO scores (competition_id, shooter_id, station, shots, total, femettor, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(req.competition_id)
        .bind(req.shooter_id)
        .bind(i16::from(req.station))
        .bind(Json(&req.shots))
        .bind(result.total)
        .bind(result.femettor)
        .bind(created_by)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(
            score_id = %row.score_id,
            station = row.station,
            total = row.total,
            "Registered score"
        );

        row.try_into()
    }

    /// Replace a record's content, keeping its id and creation metadata
    pub async fn update(&self, id: Uuid, req: &ScoreRequest) -> Result<Score> {
        let result = req.result();

        let row = sqlx::query_as::<_, ScoreRow>(&format!(
            r#"
            UPDATE scores
            SET
                competition_id = $2,
                shooter_id = $3,
                station = $4,
                shots = $5,
                total = $6,
                femettor = $7,
                updated_at = NOW()
            WHERE score_id = $1
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.competition_id)
        .bind(req.shooter_id)
        .bind(i16::from(req.station))
        .bind(Json(&req.shots))
        .bind(result.total)
        .bind(result.femettor)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }

    /// Delete a record and return it, so callers know which results changed
    pub async fn delete(&self, id: Uuid) -> Result<Score> {
        let row = sqlx::query_as::<_, ScoreRow>(&format!(
            "DELETE FROM scores WHERE score_id = $1 RETURNING {SCORE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }
}

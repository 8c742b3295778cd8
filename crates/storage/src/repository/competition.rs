use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::competition::{CreateCompetitionRequest, UpdateCompetitionRequest};
use crate::error::{Result, StorageError};
use crate::models::{Competition, Station};

const COMPETITION_COLUMNS: &str = "competition_id, name, date, skiljemal, created_at";

#[derive(FromRow)]
struct CompetitionRow {
    competition_id: Uuid,
    name: String,
    date: NaiveDate,
    skiljemal: Vec<i16>,
    created_at: NaiveDateTime,
}

impl TryFrom<CompetitionRow> for Competition {
    type Error = StorageError;

    fn try_from(row: CompetitionRow) -> Result<Self> {
        let skiljemal = row
            .skiljemal
            .into_iter()
            .map(Station::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                StorageError::InvalidData(format!("competition {}: {}", row.competition_id, e))
            })?;

        Ok(Competition {
            competition_id: row.competition_id,
            name: row.name,
            date: row.date,
            skiljemal,
            created_at: row.created_at,
        })
    }
}

fn stations_to_db(stations: &[Station]) -> Vec<i16> {
    stations.iter().map(|&s| i16::from(s)).collect()
}

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    /// Create a new CompetitionRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all competitions in season order
    pub async fn list(&self) -> Result<Vec<Competition>> {
        let rows = sqlx::query_as::<_, CompetitionRow>(&format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions ORDER BY date, name, created_at"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Competition::try_from).collect()
    }

    /// Get a competition by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Competition> {
        let row = sqlx::query_as::<_, CompetitionRow>(&format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions WHERE competition_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }

    /// Create a new competition
    pub async fn create(&self, req: &CreateCompetitionRequest) -> Result<Competition> {
        let row = sqlx::query_as::<_, CompetitionRow>(&format!(
            r#"
            INSERT INTO competitions (name, date, skiljemal)
            VALUES ($1, $2, $3)
            RETURNING {COMPETITION_COLUMNS}
            "#
        ))
        .bind(req.name.trim())
        .bind(req.date)
        .bind(stations_to_db(&req.skiljemal))
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Update the given fields of an existing competition
    pub async fn update(&self, id: Uuid, req: &UpdateCompetitionRequest) -> Result<Competition> {
        let row = sqlx::query_as::<_, CompetitionRow>(&format!(
            r#"
            UPDATE competitions
            SET
                name = COALESCE($2, name),
                date = COALESCE($3, date),
                skiljemal = COALESCE($4, skiljemal)
            WHERE competition_id = $1
            RETURNING {COMPETITION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.name.as_deref().map(str::trim))
        .bind(req.date)
        .bind(req.skiljemal.as_deref().map(stations_to_db))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }

    /// Delete a competition by ID. Its scores are kept and drop out of aggregation.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM competitions WHERE competition_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

use chrono::{NaiveDate, NaiveDateTime, Utc};
use sqlx::{PgPool, types::Json};
use storage::models::{Klass, ScoreDetail, Station};
use tracing::info;

use super::models::*;
use crate::{ImportSummary, ImporterError, Result};

type Tx<'t> = sqlx::Transaction<'t, sqlx::Postgres>;

fn transformation_error(message: String) -> ImporterError {
    ImporterError::TransformationError(message)
}

fn station(value: &LooseNumber) -> Result<i16> {
    value
        .as_i64()
        .and_then(|n| u8::try_from(n).ok())
        .and_then(|n| Station::new(n).ok())
        .map(i16::from)
        .ok_or_else(|| transformation_error(format!("Invalid station {:?}", value)))
}

/// Writes a validated export. Every row keeps an id derived from its legacy
/// document id, so importing the same export twice updates rows in place.
pub struct LegacyTransformer<'a> {
    pool: &'a PgPool,
}

impl<'a> LegacyTransformer<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn import_to_database(&self, export: &LegacyExport) -> Result<ImportSummary> {
        let mut tx = self.pool.begin().await?;

        for competition in &export.competitions {
            self.upsert_competition(competition, &mut tx).await?;
        }
        info!("Imported {} competitions", export.competitions.len());

        let mut highest_start_number = 0;
        for shooter in &export.shooters {
            let start_number = self.upsert_shooter(shooter, &mut tx).await?;
            highest_start_number = highest_start_number.max(start_number);
        }
        info!("Imported {} shooters", export.shooters.len());

        for score in &export.scores {
            self.upsert_score(score, &mut tx).await?;
        }
        info!("Imported {} scores", export.scores.len());

        let counter = export
            .shooter_counter()
            .unwrap_or(0)
            .max(highest_start_number);
        self.raise_start_number_counter(counter, &mut tx).await?;

        tx.commit().await?;

        Ok(ImportSummary {
            competitions: export.competitions.len(),
            shooters: export.shooters.len(),
            scores: export.scores.len(),
        })
    }

    async fn upsert_competition(&self, competition: &LegacyCompetition, tx: &mut Tx<'_>) -> Result<()> {
        let date = NaiveDate::parse_from_str(&competition.date, "%Y-%m-%d").map_err(|e| {
            transformation_error(format!("Competition '{}': invalid date: {}", competition.id, e))
        })?;
        let skiljemal = competition
            .skiljemal
            .iter()
            .map(station)
            .collect::<Result<Vec<i16>>>()?;

        sqlx::query(
            r#"
            INSERT INTO competitions (competition_id, name, date, skiljemal)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (competition_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                date = EXCLUDED.date,
                skiljemal = EXCLUDED.skiljemal
            "#,
        )
        .bind(legacy_uuid("competitions", &competition.id))
        .bind(competition.name.trim())
        .bind(date)
        .bind(skiljemal)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn upsert_shooter(&self, shooter: &LegacyShooter, tx: &mut Tx<'_>) -> Result<i32> {
        let klass = match shooter.klass.as_deref() {
            Some(label) => label
                .parse::<Klass>()
                .map_err(|e| transformation_error(format!("Shooter '{}': {}", shooter.id, e)))?,
            None => Klass::Oppen,
        };
        let start_number = shooter
            .start_number
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| {
                transformation_error(format!("Shooter '{}': invalid start number", shooter.id))
            })?;

        sqlx::query(
            r#"
            INSERT INTO shooters (shooter_id, name, club, klass, start_number)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (shooter_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                club = EXCLUDED.club,
                klass = EXCLUDED.klass,
                start_number = EXCLUDED.start_number
            "#,
        )
        .bind(legacy_uuid("shooters", &shooter.id))
        .bind(shooter.name.trim())
        .bind(shooter.club.trim())
        .bind(klass.as_str())
        .bind(start_number)
        .execute(&mut **tx)
        .await?;

        Ok(start_number)
    }

    async fn upsert_score(&self, score: &LegacyScore, tx: &mut Tx<'_>) -> Result<()> {
        let detail = score.to_detail()?;
        let result = detail.normalize();
        let shots = match &detail {
            ScoreDetail::Detailed { shots } => Some(Json(shots)),
            ScoreDetail::Legacy { .. } => None,
        };
        let created_at: NaiveDateTime = score
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(|| Utc::now().naive_utc());
        let updated_at = score.updated_at.as_deref().and_then(parse_timestamp);

        sqlx::query(
            r#"
            INSERT INTO scores (score_id, competition_id, shooter_id, station, shots, total, femettor, created_at, created_by, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (score_id)
            DO UPDATE SET
                competition_id = EXCLUDED.competition_id,
                shooter_id = EXCLUDED.shooter_id,
                station = EXCLUDED.station,
                shots = EXCLUDED.shots,
                total = EXCLUDED.total,
                femettor = EXCLUDED.femettor,
                created_at = EXCLUDED.created_at,
                created_by = EXCLUDED.created_by,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(legacy_uuid("scores", &score.id))
        .bind(legacy_uuid("competitions", &score.competition_id))
        .bind(legacy_uuid("shooters", &score.shooter_id))
        .bind(station(&score.station)?)
        .bind(shots)
        .bind(result.total)
        .bind(result.femettor)
        .bind(created_at)
        .bind(score.created_by.as_deref())
        .bind(updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// The counter never moves backwards, so new shooters never reuse a number.
    async fn raise_start_number_counter(&self, at_least: i32, tx: &mut Tx<'_>) -> Result<()> {
        let current: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO counters (name, current_number)
            VALUES ('shooter', $1)
            ON CONFLICT (name)
            DO UPDATE SET current_number = GREATEST(counters.current_number, EXCLUDED.current_number)
            RETURNING current_number
            "#,
        )
        .bind(at_least)
        .fetch_one(&mut **tx)
        .await?;

        info!("Start number counter at {}", current);
        Ok(())
    }
}


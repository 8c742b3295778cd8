use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::shooter::{CreateShooterRequest, SEARCH_LIMIT, UpdateShooterRequest};
use crate::error::{Result, StorageError};
use crate::models::{Klass, Shooter};

const SHOOTER_COLUMNS: &str = "shooter_id, name, club, klass, start_number, created_at";

/// Row in `counters` holding the last assigned start number.
const START_NUMBER_COUNTER: &str = "shooter";

#[derive(FromRow)]
struct ShooterRow {
    shooter_id: Uuid,
    name: String,
    club: String,
    klass: String,
    start_number: i32,
    created_at: NaiveDateTime,
}

impl TryFrom<ShooterRow> for Shooter {
    type Error = StorageError;

    fn try_from(row: ShooterRow) -> Result<Self> {
        let klass = row.klass.parse::<Klass>().map_err(|e| {
            StorageError::InvalidData(format!("shooter {}: {}", row.shooter_id, e))
        })?;

        Ok(Shooter {
            shooter_id: row.shooter_id,
            name: row.name,
            club: row.club,
            klass,
            start_number: row.start_number,
            created_at: row.created_at,
        })
    }
}

/// Escapes `LIKE` wildcards so user input only matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub struct ShooterRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShooterRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all shooters by start number
    pub async fn list(&self) -> Result<Vec<Shooter>> {
        let rows = sqlx::query_as::<_, ShooterRow>(&format!(
            "SELECT {SHOOTER_COLUMNS} FROM shooters ORDER BY start_number"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Shooter::try_from).collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Shooter> {
        let row = sqlx::query_as::<_, ShooterRow>(&format!(
            "SELECT {SHOOTER_COLUMNS} FROM shooters WHERE shooter_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }

    /// Quick lookup on name, club or start number, used when registering scores
    pub async fn search(&self, query: &str) -> Result<Vec<Shooter>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ShooterRow>(&format!(
            r#"
            SELECT {SHOOTER_COLUMNS}
            FROM shooters
            WHERE name ILIKE $1
               OR club ILIKE $1
               OR start_number::text LIKE $1
            ORDER BY start_number
            LIMIT $2
            "#
        ))
        .bind(like_pattern(query))
        .bind(SEARCH_LIMIT)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Shooter::try_from).collect()
    }

    /// Register a shooter, assigning the next start number.
    ///
    /// The counter increment and the insert share one transaction; the row lock
    /// taken by the `UPDATE` serializes concurrent registrations.
    pub async fn create(&self, req: &CreateShooterRequest) -> Result<Shooter> {
        let mut tx = self.pool.begin().await?;

        let start_number: i32 = sqlx::query_scalar(
            r#"
            UPDATE counters
            SET current_number = current_number + 1
            WHERE name = $1
            RETURNING current_number
            "#,
        )
        .bind(START_NUMBER_COUNTER)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            StorageError::ConstraintViolation("Start number counter does not exist".to_string())
        })?;

        let row = sqlx::query_as::<_, ShooterRow>(&format!(
            r#"
            INSERT INTO shooters (name, club, klass, start_number)
            VALUES ($1, $2, $3, $4)
            RETURNING {SHOOTER_COLUMNS}
            "#
        ))
        .bind(req.name.trim())
        .bind(req.club.trim())
        .bind(req.klass.as_str())
        .bind(start_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.code().as_deref() == Some("23505") {
                    return StorageError::ConstraintViolation(format!(
                        "Start number {} is already taken",
                        start_number
                    ));
                }
            }
            StorageError::from(e)
        })?;

        tx.commit().await?;

        tracing::info!(start_number, "Registered shooter {}", row.name);

        row.try_into()
    }

    /// Update name, club or class. Start number and id never change.
    pub async fn update(&self, id: Uuid, req: &UpdateShooterRequest) -> Result<Shooter> {
        let row = sqlx::query_as::<_, ShooterRow>(&format!(
            r#"
            UPDATE shooters
            SET
                name = COALESCE($2, name),
                club = COALESCE($3, club),
                klass = COALESCE($4, klass)
            WHERE shooter_id = $1
            RETURNING {SHOOTER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.name.as_deref().map(str::trim))
        .bind(req.club.as_deref().map(str::trim))
        .bind(req.klass.map(|k| k.as_str()))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        row.try_into()
    }

    /// Delete a shooter by ID. Their scores are kept and drop out of aggregation.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM shooters WHERE shooter_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_query() {
        assert_eq!(like_pattern("berg"), "%berg%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("10%_a\\b"), "%10\\%\\_a\\\\b%");
    }
}

use sqlx::PgPool;
use storage::{
    dto::{export::ExportDocument, results::CompetitionResults},
    error::Result,
    services::{export, standings},
};
use uuid::Uuid;

pub async fn competition_results(pool: &PgPool, competition_id: Uuid) -> Result<CompetitionResults> {
    standings::competition_results(pool, competition_id).await
}

pub async fn competition_export(pool: &PgPool, competition_id: Uuid) -> Result<ExportDocument> {
    let results = standings::competition_results(pool, competition_id).await?;
    Ok(export::competition_document(&results))
}

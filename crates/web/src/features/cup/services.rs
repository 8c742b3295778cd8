use sqlx::PgPool;
use storage::{
    dto::{export::ExportDocument, results::CupStandings},
    error::Result,
    services::{export, standings},
};

pub async fn cup_standings(pool: &PgPool) -> Result<CupStandings> {
    standings::cup_standings(pool).await
}

pub async fn cup_export(pool: &PgPool) -> Result<ExportDocument> {
    let standings = standings::cup_standings(pool).await?;
    Ok(export::cup_document(&standings))
}

use crate::Result;
use sqlx::PgPool;

pub struct ImportContext {
    pub pool: PgPool,
}

/// Counts of the rows written by one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub competitions: usize,
    pub shooters: usize,
    pub scores: usize,
}

#[async_trait::async_trait]
pub trait LeagueImporter: Send + Sync {
    /// Validate the export found at `source` without touching the database.
    async fn validate(&self, source: &str) -> Result<()>;

    async fn import(&self, source: &str, context: &ImportContext) -> Result<ImportSummary>;
}

//! Import of the legacy document-store export.

pub mod models;
pub mod transformer;
pub mod validator;

use std::path::Path;

use async_trait::async_trait;

use crate::{ImportContext, ImportSummary, LeagueImporter, Result};

use models::LegacyExport;
use transformer::LegacyTransformer;
use validator::{LegacyValidator, ValidationReport};

/// Reads a legacy JSON export from a file path.
pub struct LegacyImporter;

impl LegacyImporter {
    pub async fn load(path: impl AsRef<Path>) -> Result<LegacyExport> {
        let path = path.as_ref();
        tracing::info!("Loading legacy export from: {}", path.display());

        let content = tokio::fs::read_to_string(path).await?;
        let export: LegacyExport = serde_json::from_str(&content)?;

        tracing::info!(
            competitions = export.competitions.len(),
            shooters = export.shooters.len(),
            scores = export.scores.len(),
            "Loaded legacy export"
        );
        Ok(export)
    }

    async fn load_validated(path: &str) -> Result<(LegacyExport, ValidationReport)> {
        let export = Self::load(path).await?;
        let report = LegacyValidator::validate(&export)?;
        report.log_warnings();
        Ok((export, report))
    }
}

#[async_trait]
impl LeagueImporter for LegacyImporter {
    async fn validate(&self, source: &str) -> Result<()> {
        let (_, report) = Self::load_validated(source).await?;
        tracing::info!("Validation successful, {} warning(s)", report.warnings.len());
        Ok(())
    }

    async fn import(&self, source: &str, context: &ImportContext) -> Result<ImportSummary> {
        let (export, _) = Self::load_validated(source).await?;

        LegacyTransformer::new(&context.pool)
            .import_to_database(&export)
            .await
    }
}

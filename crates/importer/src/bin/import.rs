use clap::Parser;
use importer::{ImportContext, LeagueImporter, LegacyImporter};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cup-import")]
#[command(about = "Loads a legacy league export into the cup results database", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON export with competitions, shooters, scores and counters
    file: PathBuf,

    #[arg(long)]
    validate_only: bool,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("import={},importer={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let source = cli.file.to_string_lossy().into_owned();
    let importer = LegacyImporter;

    if cli.validate_only {
        importer.validate(&source).await?;
        return Ok(());
    }

    let database_url = cli
        .database_url
        .ok_or("DATABASE_URL is required unless --validate-only is given")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    storage::Database::from_pool(pool.clone())
        .run_migrations()
        .await?;

    let context = ImportContext { pool };
    let summary = importer.import(&source, &context).await?;

    tracing::info!(
        "✓ Imported {} competitions, {} shooters and {} scores",
        summary.competitions,
        summary.shooters,
        summary.scores
    );

    Ok(())
}

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod live;
mod middleware;
mod state;

use config::Config;
use error::WebError;
use features::{competitions, cup, health, results, scores, shooters};
use live::{ChangeBus, DbFeedSource, FeedRegistry};
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        competitions::handlers::list_competitions,
        competitions::handlers::get_competition,
        competitions::handlers::create_competition,
        competitions::handlers::update_competition,
        competitions::handlers::delete_competition,
        results::handlers::get_competition_results,
        results::handlers::export_competition_results,
        shooters::handlers::list_shooters,
        shooters::handlers::search_shooters,
        shooters::handlers::get_shooter,
        shooters::handlers::create_shooter,
        shooters::handlers::update_shooter,
        shooters::handlers::delete_shooter,
        scores::handlers::list_scores,
        scores::handlers::list_station_scores,
        scores::handlers::get_score,
        scores::handlers::create_score,
        scores::handlers::update_score,
        scores::handlers::delete_score,
        cup::handlers::get_cup,
        cup::handlers::export_cup,
        features::live::handlers::competition_results_stream,
        features::live::handlers::cup_stream,
        health::handlers::health,
    ),
    components(
        schemas(
            storage::dto::competition::CreateCompetitionRequest,
            storage::dto::competition::UpdateCompetitionRequest,
            storage::dto::competition::CompetitionResponse,
            storage::dto::shooter::CreateShooterRequest,
            storage::dto::shooter::UpdateShooterRequest,
            storage::dto::shooter::ShooterResponse,
            storage::dto::score::ScoreRequest,
            storage::dto::score::ScoreResponse,
            storage::dto::score::StationScoresResponse,
            storage::dto::results::CompetitionResults,
            storage::dto::results::ClassResults,
            storage::dto::results::RankedShooter,
            storage::dto::results::StationScore,
            storage::dto::results::CupStandings,
            storage::dto::results::CupClassStandings,
            storage::dto::results::CupCompetition,
            storage::dto::results::CupEntry,
            storage::dto::export::ExportDocument,
            storage::dto::export::ExportSection,
            storage::models::Klass,
            storage::models::Station,
            storage::models::Shot,
            health::handlers::HealthResponse,
        )
    ),
    tags(
        (name = "competitions", description = "Competition registry"),
        (name = "shooters", description = "Shooter registry"),
        (name = "scores", description = "Score registration"),
        (name = "results", description = "Ranked competition results"),
        (name = "cup", description = "Season cup standings"),
        (name = "live", description = "Server-sent result feeds"),
        (name = "health", description = "Service health"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

async fn not_found() -> WebError {
    WebError::NotFound
}

fn api_routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .nest(
            "/competitions",
            competitions::routes::routes(api_keys.clone()).merge(results::routes::routes()),
        )
        .nest("/shooters", shooters::routes::routes(api_keys.clone()))
        .nest("/scores", scores::routes::routes(api_keys))
        .nest("/cup", cup::routes::routes())
        .nest("/live", features::live::routes::routes())
        .nest("/health", health::routes::routes())
}

fn app(state: AppState, api_keys: ApiKeys) -> Router {
    Router::new()
        .nest("/api", api_routes(api_keys))
        .fallback(not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting cup results API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("No API_KEYS configured, all write endpoints will reject requests");
    } else {
        tracing::info!("Loaded {} API key(s)", api_keys.len());
    }

    let changes = ChangeBus::new(config.feed_channel_capacity);
    let feeds = FeedRegistry::new(Arc::new(DbFeedSource::new(db.clone())), changes.clone());
    let state = AppState { db, changes, feeds };

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app(state, api_keys))
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_app() -> Router {
        // lazy pool: nothing below reaches the database
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/cup_test")
            .unwrap();
        let db = Database::from_pool(pool);
        let changes = ChangeBus::new(8);
        let feeds = FeedRegistry::new(Arc::new(DbFeedSource::new(db.clone())), changes.clone());

        app(
            AppState { db, changes, feeds },
            ApiKeys::from_comma_separated("anna:secret"),
        )
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        test_app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_writes_require_api_key() {
        let id = uuid::Uuid::new_v4();

        assert_eq!(status_of("POST", "/api/competitions").await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of("PUT", &format!("/api/competitions/{}", id)).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of("POST", "/api/shooters").await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of("DELETE", &format!("/api/shooters/{}", id)).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of("POST", "/api/scores").await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of("PUT", &format!("/api/scores/{}", id)).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        assert_eq!(status_of("GET", "/api/nothing-here").await, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_openapi_lists_every_area() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/competitions",
            "/api/competitions/{competition_id}/results",
            "/api/competitions/{competition_id}/results/export",
            "/api/shooters/search",
            "/api/scores/station",
            "/api/cup",
            "/api/cup/export",
            "/api/live/cup",
            "/api/health",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }
}

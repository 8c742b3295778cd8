use axum::{
    Json,
    extract::{Path, State},
};
use storage::{
    Database,
    dto::{export::ExportDocument, results::CompetitionResults},
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/results",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Ranked results per class", body = CompetitionResults),
        (status = 404, description = "Competition not found")
    ),
    tag = "results"
)]
pub async fn get_competition_results(
    State(db): State<Database>,
    Path(competition_id): Path<Uuid>,
) -> Result<Json<CompetitionResults>, WebError> {
    let results = services::competition_results(db.pool(), competition_id).await?;
    Ok(Json(results))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/results/export",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Printable result list, one table per class", body = ExportDocument),
        (status = 404, description = "Competition not found")
    ),
    tag = "results"
)]
pub async fn export_competition_results(
    State(db): State<Database>,
    Path(competition_id): Path<Uuid>,
) -> Result<Json<ExportDocument>, WebError> {
    let document = services::competition_export(db.pool(), competition_id).await?;
    Ok(Json(document))
}

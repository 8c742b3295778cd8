use axum::{Json, extract::State};
use storage::{
    Database,
    dto::{export::ExportDocument, results::CupStandings},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/cup",
    responses(
        (status = 200, description = "Season cup standings per class", body = CupStandings)
    ),
    tag = "cup"
)]
pub async fn get_cup(State(db): State<Database>) -> Result<Json<CupStandings>, WebError> {
    let standings = services::cup_standings(db.pool()).await?;
    Ok(Json(standings))
}

#[utoipa::path(
    get,
    path = "/api/cup/export",
    responses(
        (status = 200, description = "Printable cup standings, one table per ranked class", body = ExportDocument)
    ),
    tag = "cup"
)]
pub async fn export_cup(State(db): State<Database>) -> Result<Json<ExportDocument>, WebError> {
    let document = services::cup_export(db.pool()).await?;
    Ok(Json(document))
}

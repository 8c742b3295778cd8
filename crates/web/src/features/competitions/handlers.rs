use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::competition::{CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::live::ChangeBus;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions",
    responses(
        (status = 200, description = "All competitions ordered by date", body = Vec<CompetitionResponse>)
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(db): State<Database>,
) -> Result<Json<Vec<CompetitionResponse>>, WebError> {
    let competitions = services::list_competitions(db.pool()).await?;

    let response: Vec<CompetitionResponse> = competitions
        .into_iter()
        .map(CompetitionResponse::from)
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Competition found", body = CompetitionResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(db): State<Database>,
    Path(competition_id): Path<Uuid>,
) -> Result<Json<CompetitionResponse>, WebError> {
    let competition = services::get_competition(db.pool(), competition_id).await?;

    Ok(Json(CompetitionResponse::from(competition)))
}

#[utoipa::path(
    post,
    path = "/api/competitions",
    request_body = CreateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Competition created successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "competitions"
)]
pub async fn create_competition(
    State(db): State<Database>,
    State(changes): State<ChangeBus>,
    Json(req): Json<CreateCompetitionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let competition = services::create_competition(db.pool(), &changes, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompetitionResponse::from(competition)),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/competitions/{competition_id}",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = UpdateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Competition updated successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn update_competition(
    State(db): State<Database>,
    State(changes): State<ChangeBus>,
    Path(competition_id): Path<Uuid>,
    Json(update_req): Json<UpdateCompetitionRequest>,
) -> Result<Json<CompetitionResponse>, WebError> {
    update_req.validate()?;

    let updated =
        services::update_competition(db.pool(), &changes, competition_id, &update_req).await?;

    Ok(Json(CompetitionResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/competitions/{competition_id}",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Competition deleted; its scores no longer count"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn delete_competition(
    State(db): State<Database>,
    State(changes): State<ChangeBus>,
    Path(competition_id): Path<Uuid>,
) -> Result<StatusCode, WebError> {
    services::delete_competition(db.pool(), &changes, competition_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::shooter::{
        CreateShooterRequest, ShooterResponse, ShooterSearchParams, UpdateShooterRequest,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::live::ChangeBus;

use super::services;

fn to_responses(shooters: Vec<storage::models::Shooter>) -> Vec<ShooterResponse> {
    shooters.into_iter().map(ShooterResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/shooters",
    responses(
        (status = 200, description = "All shooters ordered by start number", body = Vec<ShooterResponse>)
    ),
    tag = "shooters"
)]
pub async fn list_shooters(
    State(db): State<Database>,
) -> Result<Json<Vec<ShooterResponse>>, WebError> {
    let shooters = services::list_shooters(db.pool()).await?;
    Ok(Json(to_responses(shooters)))
}

#[utoipa::path(
    get,
    path = "/api/shooters/search",
    params(ShooterSearchParams),
    responses(
        (status = 200, description = "Up to 10 shooters matching name, club or start number", body = Vec<ShooterResponse>)
    ),
    tag = "shooters"
)]
pub async fn search_shooters(
    State(db): State<Database>,
    Query(params): Query<ShooterSearchParams>,
) -> Result<Json<Vec<ShooterResponse>>, WebError> {
    let shooters = services::search_shooters(db.pool(), &params.q).await?;
    Ok(Json(to_responses(shooters)))
}

#[utoipa::path(
    get,
    path = "/api/shooters/{shooter_id}",
    params(
        ("shooter_id" = Uuid, Path, description = "Shooter ID")
    ),
    responses(
        (status = 200, description = "Shooter found", body = ShooterResponse),
        (status = 404, description = "Shooter not found")
    ),
    tag = "shooters"
)]
pub async fn get_shooter(
    State(db): State<Database>,
    Path(shooter_id): Path<Uuid>,
) -> Result<Json<ShooterResponse>, WebError> {
    let shooter = services::get_shooter(db.pool(), shooter_id).await?;
    Ok(Json(ShooterResponse::from(shooter)))
}

#[utoipa::path(
    post,
    path = "/api/shooters",
    request_body = CreateShooterRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Shooter registered with the next start number", body = ShooterResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Start number could not be assigned")
    ),
    tag = "shooters"
)]
pub async fn create_shooter(
    State(db): State<Database>,
    State(changes): State<ChangeBus>,
    Json(req): Json<CreateShooterRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let shooter = services::create_shooter(db.pool(), &changes, &req).await?;

    Ok((StatusCode::CREATED, Json(ShooterResponse::from(shooter))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/shooters/{shooter_id}",
    params(
        ("shooter_id" = Uuid, Path, description = "Shooter ID")
    ),
    request_body = UpdateShooterRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Shooter updated successfully", body = ShooterResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Shooter not found")
    ),
    tag = "shooters"
)]
pub async fn update_shooter(
    State(db): State<Database>,
    State(changes): State<ChangeBus>,
    Path(shooter_id): Path<Uuid>,
    Json(req): Json<UpdateShooterRequest>,
) -> Result<Json<ShooterResponse>, WebError> {
    req.validate()?;

    let shooter = services::update_shooter(db.pool(), &changes, shooter_id, &req).await?;

    Ok(Json(ShooterResponse::from(shooter)))
}

#[utoipa::path(
    delete,
    path = "/api/shooters/{shooter_id}",
    params(
        ("shooter_id" = Uuid, Path, description = "Shooter ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Shooter deleted; their scores no longer count"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Shooter not found")
    ),
    tag = "shooters"
)]
pub async fn delete_shooter(
    State(db): State<Database>,
    State(changes): State<ChangeBus>,
    Path(shooter_id): Path<Uuid>,
) -> Result<StatusCode, WebError> {
    services::delete_shooter(db.pool(), &changes, shooter_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::score::{
        ScoreFilter, ScoreRequest, ScoreResponse, StationScoresParams, StationScoresResponse,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::live::ChangeBus;
use crate::middleware::auth::Operator;

use super::services;

#[utoipa::path(
    get,
    path = "/api/scores",
    params(ScoreFilter),
    responses(
        (status = 200, description = "Score records matching the filter, oldest first", body = Vec<ScoreResponse>)
    ),
    tag = "scores"
)]
pub async fn list_scores(
    State(db): State<Database>,
    Query(filter): Query<ScoreFilter>,
) -> Result<Json<Vec<ScoreResponse>>, WebError> {
    let scores = services::list_scores(db.pool(), &filter).await?;

    Ok(Json(scores.into_iter().map(ScoreResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/scores/station",
    params(StationScoresParams),
    responses(
        (status = 200, description = "Registrations of one shooter on one station, with their sum", body = StationScoresResponse)
    ),
    tag = "scores"
)]
pub async fn list_station_scores(
    State(db): State<Database>,
    Query(params): Query<StationScoresParams>,
) -> Result<Json<StationScoresResponse>, WebError> {
    let scores = services::list_station_scores(db.pool(), &params).await?;

    Ok(Json(StationScoresResponse::new(&params, scores)))
}

#[utoipa::path(
    get,
    path = "/api/scores/{score_id}",
    params(
        ("score_id" = Uuid, Path, description = "Score ID")
    ),
    responses(
        (status = 200, description = "Score found", body = ScoreResponse),
        (status = 404, description = "Score not found")
    ),
    tag = "scores"
)]
pub async fn get_score(
    State(db): State<Database>,
    Path(score_id): Path<Uuid>,
) -> Result<Json<ScoreResponse>, WebError> {
    let score = services::get_score(db.pool(), score_id).await?;

    Ok(Json(ScoreResponse::from(score)))
}

#[utoipa::path(
    post,
    path = "/api/scores",
    request_body = ScoreRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Series registered; totals derived from the shots", body = ScoreResponse),
        (status = 400, description = "Validation error or unknown competition/shooter"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "scores"
)]
pub async fn create_score(
    State(db): State<Database>,
    State(changes): State<ChangeBus>,
    Extension(operator): Extension<Operator>,
    Json(req): Json<ScoreRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let score = services::create_score(db.pool(), &changes, &req, operator.name()).await?;

    Ok((StatusCode::CREATED, Json(ScoreResponse::from(score))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/scores/{score_id}",
    params(
        ("score_id" = Uuid, Path, description = "Score ID")
    ),
    request_body = ScoreRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Score corrected", body = ScoreResponse),
        (status = 400, description = "Validation error or unknown competition/shooter"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Score not found")
    ),
    tag = "scores"
)]
pub async fn update_score(
    State(db): State<Database>,
    State(changes): State<ChangeBus>,
    Path(score_id): Path<Uuid>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, WebError> {
    req.validate()?;

    let score = services::update_score(db.pool(), &changes, score_id, &req).await?;

    Ok(Json(ScoreResponse::from(score)))
}

#[utoipa::path(
    delete,
    path = "/api/scores/{score_id}",
    params(
        ("score_id" = Uuid, Path, description = "Score ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Score deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Score not found")
    ),
    tag = "scores"
)]
pub async fn delete_score(
    State(db): State<Database>,
    State(changes): State<ChangeBus>,
    Path(score_id): Path<Uuid>,
) -> Result<StatusCode, WebError> {
    services::delete_score(db.pool(), &changes, score_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

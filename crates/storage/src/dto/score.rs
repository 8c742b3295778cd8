use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{MAX_SHOT_VALUE, SHOTS_PER_SERIES, Score, Shot, Station, StationResult};

/// Request payload for registering or correcting one series of shots.
///
/// Totals are never accepted from the client; they are derived from `shots`
/// when the record is written.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ScoreRequest {
    pub competition_id: Uuid,
    pub shooter_id: Uuid,
    pub station: Station,

    #[validate(length(equal = 5, message = "Exactly 5 shots are required"))]
    #[validate(custom(function = "validate_shots"))]
    pub shots: Vec<Shot>,
}

impl ScoreRequest {
    pub fn result(&self) -> StationResult {
        StationResult::from_shots(&self.shots)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScoreFilter {
    pub competition_id: Option<Uuid>,
    pub shooter_id: Option<Uuid>,
    pub station: Option<Station>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StationScoresParams {
    pub competition_id: Uuid,
    pub shooter_id: Uuid,
    pub station: Station,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreResponse {
    pub score_id: Uuid,
    pub competition_id: Uuid,
    pub shooter_id: Uuid,
    pub station: Station,
    /// Absent on records registered before shot-level detail was kept.
    pub shots: Option<Vec<Shot>>,
    pub total: i32,
    pub femettor: i32,
    pub created_at: NaiveDateTime,
    pub created_by: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// All registrations of one shooter on one station of a competition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StationScoresResponse {
    pub competition_id: Uuid,
    pub shooter_id: Uuid,
    pub station: Station,
    pub station_total: i32,
    pub scores: Vec<ScoreResponse>,
}

impl StationScoresResponse {
    pub fn new(params: &StationScoresParams, scores: Vec<Score>) -> Self {
        let scores: Vec<ScoreResponse> = scores.into_iter().map(ScoreResponse::from).collect();
        Self {
            competition_id: params.competition_id,
            shooter_id: params.shooter_id,
            station: params.station,
            station_total: scores.iter().map(|s| s.total).sum(),
            scores,
        }
    }
}

fn validate_shots(shots: &[Shot]) -> Result<(), validator::ValidationError> {
    if shots.len() != SHOTS_PER_SERIES {
        // reported by the length rule
        return Ok(());
    }

    match shots.iter().position(|shot| shot.value > MAX_SHOT_VALUE) {
        Some(index) => Err(super::validation_error(
            "shot_value",
            format!("Shot {} must be between 0 and {}", index + 1, MAX_SHOT_VALUE),
        )),
        None => Ok(()),
    }
}

impl From<Score> for ScoreResponse {
    fn from(score: Score) -> Self {
        let result = score.normalize();
        Self {
            score_id: score.score_id,
            competition_id: score.competition_id,
            shooter_id: score.shooter_id,
            station: score.station,
            shots: score.detail.shots().map(<[Shot]>::to_vec),
            total: result.total,
            femettor: result.femettor,
            created_at: score.created_at,
            created_by: score.created_by,
            updated_at: score.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(shots: Vec<Shot>) -> ScoreRequest {
        ScoreRequest {
            competition_id: Uuid::new_v4(),
            shooter_id: Uuid::new_v4(),
            station: Station::new(2).unwrap(),
            shots,
        }
    }

    #[test]
    fn test_accepts_five_valid_shots() {
        let req = request(vec![Shot::new(10, true); 5]);
        assert!(req.validate().is_ok());
        assert_eq!(req.result(), StationResult { total: 50, femettor: 5 });
    }

    #[test]
    fn test_rejects_wrong_shot_count() {
        let errors = request(vec![Shot::new(5, false); 4]).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("shots"));
    }

    #[test]
    fn test_rejects_shot_above_ten() {
        let mut shots = vec![Shot::new(5, false); 5];
        shots[3].value = 11;
        assert!(request(shots).validate().is_err());
    }

    #[test]
    fn test_client_cannot_supply_totals() {
        let json = format!(
            r#"{{"competition_id": "{}", "shooter_id": "{}", "station": 1,
                "shots": [{{"value": 7, "femetta": true}}, {{"value": 5, "femetta": true}},
                          {{"value": 0}}, {{"value": 0}}, {{"value": 0}}],
                "total": 99, "femettor": 9}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let req: ScoreRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.result(), StationResult { total: 12, femettor: 1 });
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Competition, MAX_TIE_BREAK_STATIONS, Station};

/// Request payload for creating a new competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub name: String,

    pub date: NaiveDate,

    /// Tie-break stations in priority order, 1 to 3 distinct stations.
    #[validate(custom(function = "validate_skiljemal"))]
    pub skiljemal: Vec<Station>,
}

/// Request payload for updating an existing competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCompetitionRequest {
    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub name: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(custom(function = "validate_skiljemal"))]
    pub skiljemal: Option<Vec<Station>>,
}

/// Response containing competition details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResponse {
    pub competition_id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub skiljemal: Vec<Station>,
    pub created_at: NaiveDateTime,
}

fn validate_skiljemal(stations: &[Station]) -> Result<(), validator::ValidationError> {
    if stations.is_empty() || stations.len() > MAX_TIE_BREAK_STATIONS {
        return Err(super::validation_error(
            "skiljemal_length",
            "Select between 1 and 3 tie-break stations",
        ));
    }

    let mut seen = Vec::with_capacity(stations.len());
    for station in stations {
        if seen.contains(station) {
            return Err(super::validation_error(
                "skiljemal_duplicate",
                format!("Station {} is listed more than once", station),
            ));
        }
        seen.push(*station);
    }

    Ok(())
}

impl From<Competition> for CompetitionResponse {
    fn from(comp: Competition) -> Self {
        Self {
            competition_id: comp.competition_id,
            name: comp.name,
            date: comp.date,
            skiljemal: comp.skiljemal,
            created_at: comp.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stations(numbers: &[u8]) -> Vec<Station> {
        numbers.iter().map(|n| Station::new(*n).unwrap()).collect()
    }

    fn request(skiljemal: Vec<Station>) -> CreateCompetitionRequest {
        CreateCompetitionRequest {
            name: "Deltävling 1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 4).unwrap(),
            skiljemal,
        }
    }

    #[test]
    fn test_accepts_one_to_three_stations() {
        assert!(request(stations(&[4])).validate().is_ok());
        assert!(request(stations(&[7, 2, 5])).validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_skiljemal() {
        let errors = request(Vec::new()).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("skiljemal"));
    }

    #[test]
    fn test_rejects_four_stations() {
        assert!(request(stations(&[1, 2, 3, 4])).validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_station() {
        assert!(request(stations(&[3, 3])).validate().is_err());
    }

    #[test]
    fn test_rejects_blank_name() {
        let mut req = request(stations(&[1]));
        req.name = "   ".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let req = UpdateCompetitionRequest {
            name: None,
            date: None,
            skiljemal: None,
        };
        assert!(req.validate().is_ok());

        let req = UpdateCompetitionRequest {
            name: None,
            date: None,
            skiljemal: Some(Vec::new()),
        };
        assert!(req.validate().is_err());
    }
}

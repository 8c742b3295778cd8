use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Klass, Shooter};

/// Most hits returned by a shooter search.
pub const SEARCH_LIMIT: i64 = 10;

/// Request payload for registering a shooter. The start number is assigned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateShooterRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Club is required"))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub club: String,

    #[serde(default = "default_klass")]
    pub klass: Klass,
}

/// Request payload for editing a shooter. Start number and id never change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateShooterRequest {
    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub club: Option<String>,

    pub klass: Option<Klass>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShooterSearchParams {
    /// Matches name or club (case-insensitive) or part of the start number.
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShooterResponse {
    pub shooter_id: Uuid,
    pub name: String,
    pub club: String,
    pub klass: Klass,
    pub start_number: i32,
    pub created_at: NaiveDateTime,
}

fn default_klass() -> Klass {
    Klass::Oppen
}

impl From<Shooter> for ShooterResponse {
    fn from(shooter: Shooter) -> Self {
        Self {
            shooter_id: shooter.shooter_id,
            name: shooter.name,
            club: shooter.club,
            klass: shooter.klass,
            start_number: shooter.start_number,
            created_at: shooter.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_klass_defaults_to_oppen() {
        let req: CreateShooterRequest =
            serde_json::from_str(r#"{"name": "Anna Berg", "club": "Landby"}"#).unwrap();
        assert_eq!(req.klass, Klass::Oppen);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_rejects_missing_club() {
        let req = CreateShooterRequest {
            name: "Anna Berg".to_string(),
            club: String::new(),
            klass: Klass::Dam,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("club"));
    }

    #[test]
    fn test_rejects_unknown_klass() {
        let result = serde_json::from_str::<CreateShooterRequest>(
            r#"{"name": "Anna Berg", "club": "Landby", "klass": "senior"}"#,
        );
        assert!(result.is_err());
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Station;

/// Number of shots in one registered series.
pub const SHOTS_PER_SERIES: usize = 5;

/// Highest value a single shot can score.
pub const MAX_SHOT_VALUE: u8 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Shot {
    pub value: u8,
    #[serde(default)]
    pub femetta: bool,
}

impl Shot {
    pub fn new(value: u8, femetta: bool) -> Self {
        Self { value, femetta }
    }

    /// A femetta flag only counts on a five or a ten.
    pub fn is_counted_femetta(&self) -> bool {
        self.femetta && matches!(self.value, 5 | 10)
    }
}

/// Total and bullseye count contributed by one score record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StationResult {
    pub total: i32,
    pub femettor: i32,
}

impl StationResult {
    pub fn from_shots(shots: &[Shot]) -> Self {
        Self {
            total: shots.iter().map(|shot| i32::from(shot.value)).sum(),
            femettor: shots.iter().filter(|shot| shot.is_counted_femetta()).count() as i32,
        }
    }
}

/// Shot-level detail of a score record.
///
/// Older records only carry the flat `total`/`femettor` counters. Newer records
/// carry the shots themselves, in which case the counters are always derived
/// from them and any cached values are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreDetail {
    Detailed { shots: Vec<Shot> },
    Legacy { total: i32, femettor: i32 },
}

impl ScoreDetail {
    /// Picks the detailed form whenever shots are present.
    pub fn from_parts(shots: Option<Vec<Shot>>, total: i32, femettor: i32) -> Self {
        match shots {
            Some(shots) => Self::Detailed { shots },
            None => Self::Legacy { total, femettor },
        }
    }

    pub fn normalize(&self) -> StationResult {
        match self {
            Self::Detailed { shots } => StationResult::from_shots(shots),
            Self::Legacy { total, femettor } => StationResult {
                total: *total,
                femettor: *femettor,
            },
        }
    }

    pub fn shots(&self) -> Option<&[Shot]> {
        match self {
            Self::Detailed { shots } => Some(shots),
            Self::Legacy { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Score {
    pub score_id: Uuid,
    pub competition_id: Uuid,
    pub shooter_id: Uuid,
    pub station: Station,
    pub detail: ScoreDetail,
    pub created_at: NaiveDateTime,
    pub created_by: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Score {
    pub fn normalize(&self) -> StationResult {
        self.detail.normalize()
    }
}

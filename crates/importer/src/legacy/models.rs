//! JSON export of the legacy document store.
//!
//! Every collection is a list of documents carrying their string `id`. Field
//! names are camelCase. Numeric fields were written by a browser form and are
//! sometimes stored as strings.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::models::{ScoreDetail, Shot};
use uuid::Uuid;

use crate::{ImporterError, Result};

/// Namespace of the ids derived from legacy document ids.
const LEGACY_NAMESPACE: Uuid = Uuid::from_u128(0x3c5f_2a7e_91b4_4d0a_8e61_5b27_c9d4_1f08);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyExport {
    #[serde(default)]
    pub competitions: Vec<LegacyCompetition>,
    #[serde(default)]
    pub shooters: Vec<LegacyShooter>,
    #[serde(default)]
    pub scores: Vec<LegacyScore>,
    #[serde(default)]
    pub counters: Vec<LegacyCounter>,
}

impl LegacyExport {
    /// Start number counter as exported, if present.
    pub fn shooter_counter(&self) -> Option<i32> {
        self.counters
            .iter()
            .find(|c| c.id == "shooter")
            .map(|c| c.current_number)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCompetition {
    pub id: String,
    pub name: String,
    pub date: String,
    #[serde(default)]
    pub skiljemal: Vec<LooseNumber>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyShooter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub club: String,
    #[serde(default)]
    pub klass: Option<String>,
    pub start_number: LooseNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyScore {
    pub id: String,
    pub competition_id: String,
    pub shooter_id: String,
    pub station: LooseNumber,
    #[serde(default)]
    pub shots: Option<Vec<LegacyShot>>,
    #[serde(default)]
    pub total: Option<LooseNumber>,
    #[serde(default)]
    pub femettor: Option<LooseNumber>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyShot {
    pub value: LooseNumber,
    #[serde(default)]
    pub femetta: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCounter {
    pub id: String,
    pub current_number: i32,
}

/// A number that may have been stored as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(i64),
    Text(String),
}

impl LooseNumber {
    /// Blank strings count as zero, like the legacy form did.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) if s.trim().is_empty() => Some(0),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Stable id for a legacy document, so re-running an import updates rows in place.
pub fn legacy_uuid(collection: &str, id: &str) -> Uuid {
    Uuid::new_v5(&LEGACY_NAMESPACE, format!("{}/{}", collection, id).as_bytes())
}

/// Parses the ISO timestamps the legacy client wrote.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

impl LegacyShot {
    pub fn to_shot(&self) -> Result<Shot> {
        let value = self
            .value
            .as_i64()
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| {
                ImporterError::TransformationError(format!("Invalid shot value: {:?}", self.value))
            })?;
        Ok(Shot::new(value, self.femetta))
    }
}

impl LegacyScore {
    /// Shot-level records keep their shots; flat records keep their counters.
    pub fn to_detail(&self) -> Result<ScoreDetail> {
        if let Some(shots) = &self.shots {
            let shots = shots
                .iter()
                .map(LegacyShot::to_shot)
                .collect::<Result<Vec<_>>>()?;
            return Ok(ScoreDetail::Detailed { shots });
        }

        let total = self
            .total
            .as_ref()
            .and_then(LooseNumber::as_i64)
            .ok_or_else(|| {
                ImporterError::TransformationError(format!(
                    "Score '{}' has neither shots nor a total",
                    self.id
                ))
            })?;
        let femettor = self
            .femettor
            .as_ref()
            .and_then(LooseNumber::as_i64)
            .unwrap_or(0);

        Ok(ScoreDetail::Legacy {
            total: to_i32(total, &self.id)?,
            femettor: to_i32(femettor, &self.id)?,
        })
    }
}

fn to_i32(value: i64, score_id: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        ImporterError::TransformationError(format!("Score '{}': {} is out of range", score_id, value))
    })
}

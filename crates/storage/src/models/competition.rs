use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Station;

/// Most tie-break stations a competition may configure.
pub const MAX_TIE_BREAK_STATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Competition {
    pub competition_id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    /// Tie-break stations in priority order.
    pub skiljemal: Vec<Station>,
    pub created_at: NaiveDateTime,
}

impl Competition {
    /// Configured tie-break stations, or stations 1-3 when none are stored.
    pub fn tie_break_stations(&self) -> &[Station] {
        if self.skiljemal.is_empty() {
            &Station::DEFAULT_TIE_BREAK
        } else {
            &self.skiljemal
        }
    }

    /// Short column label for cup tables: the last word of the name.
    pub fn short_label(&self) -> &str {
        self.name.split_whitespace().last().unwrap_or(&self.name)
    }
}

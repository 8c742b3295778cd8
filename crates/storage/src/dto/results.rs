use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Klass, Station};

/// Accumulated total and bullseye count for one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StationScore {
    pub station: Station,
    pub total: i32,
    pub femettor: i32,
}

/// One row of a competition result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RankedShooter {
    pub placement: u32,
    pub shooter_id: Uuid,
    pub start_number: i32,
    pub name: String,
    pub club: String,
    /// Stations this shooter has registered scores on, ascending.
    pub stations: Vec<StationScore>,
    /// One cell per tie-break station, in the competition's priority order.
    pub tie_breaks: Vec<StationScore>,
    pub total: i32,
}

impl RankedShooter {
    pub fn station_total(&self, station: Station) -> i32 {
        self.stations
            .iter()
            .find(|s| s.station == station)
            .map_or(0, |s| s.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassResults {
    pub klass: Klass,
    pub entries: Vec<RankedShooter>,
}

/// Ranked result tables of one competition, one per class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResults {
    pub competition_id: Uuid,
    pub competition_name: String,
    pub date: NaiveDate,
    pub tie_break_stations: Vec<Station>,
    /// Every station that has at least one score in this competition.
    pub stations: Vec<Station>,
    pub classes: Vec<ClassResults>,
}

impl CompetitionResults {
    pub fn class(&self, klass: Klass) -> Option<&ClassResults> {
        self.classes.iter().find(|c| c.klass == klass)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CupCompetition {
    pub competition_id: Uuid,
    pub name: String,
    pub short_label: String,
    pub date: NaiveDate,
}

/// One row of a cup standing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CupEntry {
    pub standing: u32,
    pub shooter_id: Uuid,
    pub start_number: i32,
    pub name: String,
    pub club: String,
    /// Placement per competition, aligned with `CupStandings::competitions`.
    /// `None` where the shooter did not take part.
    pub placements: Vec<Option<u32>>,
    pub cup_total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CupClassStandings {
    pub klass: Klass,
    pub entries: Vec<CupEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CupStandings {
    pub competitions: Vec<CupCompetition>,
    pub classes: Vec<CupClassStandings>,
}

impl CupStandings {
    pub fn class(&self, klass: Klass) -> Option<&CupClassStandings> {
        self.classes.iter().find(|c| c.klass == klass)
    }
}

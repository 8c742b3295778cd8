use std::collections::HashSet;

use chrono::NaiveDate;
use storage::models::{Klass, MAX_SHOT_VALUE, MAX_TIE_BREAK_STATIONS, SHOTS_PER_SERIES, Station};
use tracing::warn;

use super::models::{LegacyExport, LooseNumber};
use crate::{ImporterError, Result};

pub struct LegacyValidator;

fn station_of(value: &LooseNumber) -> Option<Station> {
    value
        .as_i64()
        .and_then(|n| u8::try_from(n).ok())
        .and_then(|n| Station::new(n).ok())
}

impl LegacyValidator {
    pub fn validate(export: &LegacyExport) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        let mut competition_ids = HashSet::new();
        for competition in &export.competitions {
            let label = format!("Competition '{}'", competition.name);

            if !competition_ids.insert(competition.id.as_str()) {
                report
                    .errors
                    .push(format!("Duplicate competition id: '{}'", competition.id));
            }
            if competition.name.trim().is_empty() {
                report
                    .errors
                    .push(format!("Competition '{}' has no name", competition.id));
            }
            if NaiveDate::parse_from_str(&competition.date, "%Y-%m-%d").is_err() {
                report
                    .errors
                    .push(format!("{} has invalid date: '{}'", label, competition.date));
            }

            if competition.skiljemal.is_empty() {
                report.warnings.push(format!(
                    "{} has no tie-break stations, stations 1, 2, 3 will be used",
                    label
                ));
            }
            if competition.skiljemal.len() > MAX_TIE_BREAK_STATIONS {
                report.errors.push(format!(
                    "{} has {} tie-break stations, at most {} are allowed",
                    label,
                    competition.skiljemal.len(),
                    MAX_TIE_BREAK_STATIONS
                ));
            }
            let mut seen = HashSet::new();
            for value in &competition.skiljemal {
                match station_of(value) {
                    Some(station) if !seen.insert(station) => report
                        .errors
                        .push(format!("{} repeats tie-break station {}", label, station)),
                    Some(_) => {}
                    None => report
                        .errors
                        .push(format!("{} has invalid tie-break station {:?}", label, value)),
                }
            }
        }

        let mut shooter_ids = HashSet::new();
        let mut start_numbers = HashSet::new();
        for shooter in &export.shooters {
            if !shooter_ids.insert(shooter.id.as_str()) {
                report
                    .errors
                    .push(format!("Duplicate shooter id: '{}'", shooter.id));
            }
            if shooter.name.trim().is_empty() {
                report
                    .errors
                    .push(format!("Shooter '{}' has no name", shooter.id));
            }
            if shooter.club.trim().is_empty() {
                report
                    .warnings
                    .push(format!("Shooter '{}' has no club", shooter.name));
            }

            match shooter.klass.as_deref() {
                None => report.warnings.push(format!(
                    "Shooter '{}' has no class, '{}' will be used",
                    shooter.name,
                    Klass::Oppen
                )),
                Some(klass) if klass.parse::<Klass>().is_err() => report.errors.push(format!(
                    "Shooter '{}' has unknown class '{}'",
                    shooter.name, klass
                )),
                Some(_) => {}
            }

            match shooter.start_number.as_i64() {
                Some(n) if n > 0 && i32::try_from(n).is_ok() => {
                    if !start_numbers.insert(n) {
                        report.errors.push(format!(
                            "Start number {} is used by more than one shooter",
                            n
                        ));
                    }
                }
                _ => report.errors.push(format!(
                    "Shooter '{}' has invalid start number {:?}",
                    shooter.name, shooter.start_number
                )),
            }
        }

        let mut score_ids = HashSet::new();
        for score in &export.scores {
            let label = format!("Score '{}'", score.id);

            if !score_ids.insert(score.id.as_str()) {
                report
                    .errors
                    .push(format!("Duplicate score id: '{}'", score.id));
            }
            if station_of(&score.station).is_none() {
                report
                    .errors
                    .push(format!("{} has invalid station {:?}", label, score.station));
            }

            if !competition_ids.contains(score.competition_id.as_str()) {
                report.warnings.push(format!(
                    "{} belongs to unknown competition '{}' and will not count",
                    label, score.competition_id
                ));
            }
            if !shooter_ids.contains(score.shooter_id.as_str()) {
                report.warnings.push(format!(
                    "{} belongs to unknown shooter '{}' and will not count",
                    label, score.shooter_id
                ));
            }

            match &score.shots {
                Some(shots) => {
                    if shots.len() != SHOTS_PER_SERIES {
                        report.warnings.push(format!(
                            "{} has {} shots instead of {}",
                            label,
                            shots.len(),
                            SHOTS_PER_SERIES
                        ));
                    }
                    for (idx, shot) in shots.iter().enumerate() {
                        let valid = shot
                            .value
                            .as_i64()
                            .is_some_and(|v| (0..=i64::from(MAX_SHOT_VALUE)).contains(&v));
                        if !valid {
                            report.errors.push(format!(
                                "{}, shot {}: invalid value {:?}",
                                label,
                                idx + 1,
                                shot.value
                            ));
                        }
                    }
                }
                None => {
                    if score.total.as_ref().and_then(LooseNumber::as_i64).is_none() {
                        report
                            .errors
                            .push(format!("{} has neither shots nor a total", label));
                    }
                }
            }
        }

        if let Some(counter) = export.shooter_counter() {
            let highest = start_numbers.iter().copied().max().unwrap_or(0);
            if i64::from(counter) < highest {
                report.warnings.push(format!(
                    "Start number counter {} is below the highest start number {}, it will be raised",
                    counter, highest
                ));
            }
        } else {
            report
                .warnings
                .push("No start number counter in export, it will be derived".to_string());
        }

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export(json: serde_json::Value) -> LegacyExport {
        serde_json::from_value(json).unwrap()
    }

    fn valid() -> serde_json::Value {
        serde_json::json!({
            "competitions": [{"id": "c1", "name": "Deltävling 1", "date": "2025-05-04", "skiljemal": [3, 1]}],
            "shooters": [{"id": "s1", "name": "Anna", "club": "Landby", "klass": "dam", "startNumber": 1}],
            "scores": [{"id": "x1", "competitionId": "c1", "shooterId": "s1", "station": 3,
                        "shots": [{"value": 10, "femetta": true}, {"value": 9}, {"value": 8}, {"value": 7}, {"value": 5}]}],
            "counters": [{"id": "shooter", "currentNumber": 1}]
        })
    }

    #[test]
    fn test_valid_export_passes_without_warnings() {
        let report = LegacyValidator::validate(&export(valid())).unwrap();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_orphaned_scores_only_warn() {
        let mut json = valid();
        json["scores"][0]["shooterId"] = "gone".into();

        let report = LegacyValidator::validate(&export(json)).unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("unknown shooter"));
    }

    #[test]
    fn test_rejects_unknown_class() {
        let mut json = valid();
        json["shooters"][0]["klass"] = "senior".into();

        let err = LegacyValidator::validate(&export(json)).unwrap_err();
        assert!(err.to_string().contains("unknown class 'senior'"));
    }

    #[test]
    fn test_rejects_bad_tie_break_stations() {
        let mut json = valid();
        json["competitions"][0]["skiljemal"] = serde_json::json!([1, 1, 8, 2]);

        let err = LegacyValidator::validate(&export(json)).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("at most 3"));
        assert!(message.contains("repeats tie-break station 1"));
        assert!(message.contains("invalid tie-break station"));
    }

    #[test]
    fn test_rejects_duplicate_start_numbers() {
        let mut json = valid();
        json["shooters"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!({"id": "s2", "name": "Bo", "club": "Byn", "klass": "öppen", "startNumber": "1"}));

        let err = LegacyValidator::validate(&export(json)).unwrap_err();
        assert!(err.to_string().contains("Start number 1 is used by more than one shooter"));
    }

    #[test]
    fn test_rejects_shot_out_of_range() {
        let mut json = valid();
        json["scores"][0]["shots"][2]["value"] = 11.into();

        assert!(LegacyValidator::validate(&export(json)).is_err());
    }

    #[test]
    fn test_low_counter_warns() {
        let mut json = valid();
        json["counters"][0]["currentNumber"] = 0.into();

        let report = LegacyValidator::validate(&export(json)).unwrap();
        assert!(report.warnings[0].contains("will be raised"));
    }
}

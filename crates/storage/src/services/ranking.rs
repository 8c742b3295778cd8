//! Per-competition ranking.
//!
//! Scores are aggregated per shooter and station, shooters are split by class,
//! ordered by total with the competition's tie-break stations deciding ties,
//! and placed with shared placements for exact ties (`1, 1, 1, 4`).

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use uuid::Uuid;

use crate::dto::results::{ClassResults, CompetitionResults, RankedShooter, StationScore};
use crate::models::{Competition, Klass, Score, Shooter, Station, StationResult};

/// Station totals and bullseye counts of one shooter in one competition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    totals: BTreeMap<Station, i32>,
    femettor: BTreeMap<Station, i32>,
    total: i32,
}

impl Tally {
    pub fn add(&mut self, station: Station, result: StationResult) {
        *self.totals.entry(station).or_default() += result.total;
        *self.femettor.entry(station).or_default() += result.femettor;
        self.total += result.total;
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn station_total(&self, station: Station) -> i32 {
        self.totals.get(&station).copied().unwrap_or(0)
    }

    pub fn station_femettor(&self, station: Station) -> i32 {
        self.femettor.get(&station).copied().unwrap_or(0)
    }

    fn station_scores(&self) -> Vec<StationScore> {
        self.totals
            .iter()
            .map(|(&station, &total)| StationScore {
                station,
                total,
                femettor: self.station_femettor(station),
            })
            .collect()
    }

    fn tie_break_scores(&self, tie_break: &[Station]) -> Vec<StationScore> {
        tie_break
            .iter()
            .map(|&station| StationScore {
                station,
                total: self.station_total(station),
                femettor: self.station_femettor(station),
            })
            .collect()
    }
}

/// Orders `a` before `b` when `a` ranks higher.
///
/// Higher total first, then higher station total for each tie-break station in
/// order, then higher bullseye count for each tie-break station in order.
pub fn compare_tallies(a: &Tally, b: &Tally, tie_break: &[Station]) -> Ordering {
    b.total
        .cmp(&a.total)
        .then_with(|| first_difference(tie_break, |s| b.station_total(s).cmp(&a.station_total(s))))
        .then_with(|| {
            first_difference(tie_break, |s| b.station_femettor(s).cmp(&a.station_femettor(s)))
        })
}

fn first_difference(stations: &[Station], cmp: impl Fn(Station) -> Ordering) -> Ordering {
    stations
        .iter()
        .map(|&station| cmp(station))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Assigns competition placements to an already sorted sequence.
///
/// Each item gets its 1-based position unless it ties with its immediate
/// predecessor, in which case it shares the predecessor's placement.
pub fn assign_placements<T>(sorted: &[T], tied: impl Fn(&T, &T) -> bool) -> Vec<u32> {
    let mut placements: Vec<u32> = Vec::with_capacity(sorted.len());
    for (index, item) in sorted.iter().enumerate() {
        let placement = match placements.last() {
            Some(&previous) if tied(&sorted[index - 1], item) => previous,
            _ => index as u32 + 1,
        };
        placements.push(placement);
    }
    placements
}

/// Sums every score of `competition` per shooter. Shooters without scores are absent.
pub fn tally_competition(competition_id: Uuid, scores: &[Score]) -> HashMap<Uuid, Tally> {
    let mut tallies: HashMap<Uuid, Tally> = HashMap::new();
    for score in scores.iter().filter(|s| s.competition_id == competition_id) {
        tallies
            .entry(score.shooter_id)
            .or_default()
            .add(score.station, score.normalize());
    }
    tallies
}

/// Ranks every participating shooter of one competition, per class.
///
/// Scores whose shooter is unknown are ignored. Shooters without any score in
/// the competition are left out of the tables.
pub fn rank_competition(
    competition: &Competition,
    shooters: &[Shooter],
    scores: &[Score],
) -> CompetitionResults {
    let tie_break = competition.tie_break_stations();
    let mut tallies = tally_competition(competition.competition_id, scores);

    let stations: BTreeSet<Station> = scores
        .iter()
        .filter(|s| s.competition_id == competition.competition_id)
        .map(|s| s.station)
        .collect();

    let classes = Klass::ALL
        .into_iter()
        .map(|klass| {
            let mut participants: Vec<(&Shooter, Tally)> = shooters
                .iter()
                .filter(|shooter| shooter.klass == klass)
                .filter_map(|shooter| {
                    tallies
                        .remove(&shooter.shooter_id)
                        .map(|tally| (shooter, tally))
                })
                .collect();

            participants.sort_by(|(_, a), (_, b)| compare_tallies(a, b, tie_break));

            let placements = assign_placements(&participants, |(_, a), (_, b)| {
                compare_tallies(a, b, tie_break).is_eq()
            });

            let entries = participants
                .into_iter()
                .zip(placements)
                .map(|((shooter, tally), placement)| RankedShooter {
                    placement,
                    shooter_id: shooter.shooter_id,
                    start_number: shooter.start_number,
                    name: shooter.name.clone(),
                    club: shooter.club.clone(),
                    stations: tally.station_scores(),
                    tie_breaks: tally.tie_break_scores(tie_break),
                    total: tally.total(),
                })
                .collect();

            ClassResults { klass, entries }
        })
        .collect();

    CompetitionResults {
        competition_id: competition.competition_id,
        competition_name: competition.name.clone(),
        date: competition.date,
        tie_break_stations: tie_break.to_vec(),
        stations: stations.into_iter().collect(),
        classes,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime};
    use uuid::Uuid;

    use crate::models::{Competition, Klass, Score, ScoreDetail, Shooter, Shot, Station};

    pub fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 4)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    pub fn station(number: u8) -> Station {
        Station::new(number).unwrap()
    }

    pub fn competition(name: &str, skiljemal: &[u8]) -> Competition {
        Competition {
            competition_id: Uuid::new_v4(),
            name: name.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 4).unwrap(),
            skiljemal: skiljemal.iter().map(|n| station(*n)).collect(),
            created_at: timestamp(),
        }
    }

    pub fn shooter(name: &str, klass: Klass, start_number: i32) -> Shooter {
        Shooter {
            shooter_id: Uuid::new_v4(),
            name: name.to_string(),
            club: "Landby".to_string(),
            klass,
            start_number,
            created_at: timestamp(),
        }
    }

    /// Five shots whose values are spread so they sum to `total`.
    pub fn shots_summing(total: u8) -> Vec<Shot> {
        let mut remaining = total;
        (0..5)
            .map(|_| {
                let value = remaining.min(10);
                remaining -= value;
                Shot::new(value, false)
            })
            .collect()
    }

    pub fn score_with_shots(
        competition: &Competition,
        shooter: &Shooter,
        station_number: u8,
        shots: Vec<Shot>,
    ) -> Score {
        Score {
            score_id: Uuid::new_v4(),
            competition_id: competition.competition_id,
            shooter_id: shooter.shooter_id,
            station: station(station_number),
            detail: ScoreDetail::Detailed { shots },
            created_at: timestamp(),
            created_by: None,
            updated_at: None,
        }
    }

    pub fn score(
        competition: &Competition,
        shooter: &Shooter,
        station_number: u8,
        total: u8,
    ) -> Score {
        score_with_shots(competition, shooter, station_number, shots_summing(total))
    }
}

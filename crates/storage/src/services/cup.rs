//! Season cup standings.
//!
//! Every competition contributes the shooter's placement in their class, or
//! [`SENTINEL_PLACEMENT`] when they did not take part. The best
//! [`CUP_BEST_OF`] values are summed and the lowest sum wins.

use std::collections::HashMap;

use uuid::Uuid;

use crate::dto::results::{CupClassStandings, CupCompetition, CupEntry, CupStandings};
use crate::models::{Competition, Klass, Score, Shooter};

use super::ranking::rank_competition;

/// Placement counted for a competition the shooter did not take part in.
pub const SENTINEL_PLACEMENT: u32 = 1000;

/// Number of placements that count toward the cup total.
pub const CUP_BEST_OF: usize = 5;

/// Shooters whose cup total reaches this value are left out of the standings.
pub const CUP_EXCLUSION_THRESHOLD: u32 = 5000;

/// Sum of the lowest [`CUP_BEST_OF`] placements.
pub fn cup_total(placements: &[u32]) -> u32 {
    let mut sorted = placements.to_vec();
    sorted.sort_unstable();
    sorted.iter().take(CUP_BEST_OF).sum()
}

pub fn is_ranked(cup_total: u32) -> bool {
    cup_total < CUP_EXCLUSION_THRESHOLD
}

/// Computes cup standings over `competitions`, in the order given.
pub fn cup_standings(
    competitions: &[Competition],
    shooters: &[Shooter],
    scores: &[Score],
) -> CupStandings {
    if competitions.is_empty() {
        return CupStandings {
            competitions: Vec::new(),
            classes: Klass::ALL
                .into_iter()
                .map(|klass| CupClassStandings {
                    klass,
                    entries: Vec::new(),
                })
                .collect(),
        };
    }

    let placements_by_competition: Vec<HashMap<Uuid, u32>> = competitions
        .iter()
        .map(|competition| {
            rank_competition(competition, shooters, scores)
                .classes
                .into_iter()
                .flat_map(|class| class.entries)
                .map(|entry| (entry.shooter_id, entry.placement))
                .collect()
        })
        .collect();

    let classes = Klass::ALL
        .into_iter()
        .map(|klass| {
            let mut rows: Vec<(&Shooter, Vec<Option<u32>>, u32)> = shooters
                .iter()
                .filter(|shooter| shooter.klass == klass)
                .map(|shooter| {
                    let placements: Vec<Option<u32>> = placements_by_competition
                        .iter()
                        .map(|placed| placed.get(&shooter.shooter_id).copied())
                        .collect();
                    let counted: Vec<u32> = placements
                        .iter()
                        .map(|p| p.unwrap_or(SENTINEL_PLACEMENT))
                        .collect();
                    (shooter, placements, cup_total(&counted))
                })
                .filter(|(_, _, total)| is_ranked(*total))
                .collect();

            // stable: equal totals keep shooter order
            rows.sort_by_key(|(_, _, total)| *total);

            // standing is the position in the sorted table, ties included
            let entries = rows
                .into_iter()
                .enumerate()
                .map(|(idx, (shooter, placements, total))| CupEntry {
                    standing: idx as u32 + 1,
                    shooter_id: shooter.shooter_id,
                    start_number: shooter.start_number,
                    name: shooter.name.clone(),
                    club: shooter.club.clone(),
                    placements,
                    cup_total: total,
                })
                .collect();

            CupClassStandings { klass, entries }
        })
        .collect();

    CupStandings {
        competitions: competitions
            .iter()
            .map(|c| CupCompetition {
                competition_id: c.competition_id,
                name: c.name.clone(),
                short_label: c.short_label().to_string(),
                date: c.date,
            })
            .collect(),
        classes,
    }
}

#[cfg(test)]
mod tests {
    use super::super::ranking::fixtures::*;
    use super::*;

    #[test]
    fn test_best_five_of_seven() {
        let placements = [1000, 2, 1000, 1000, 3, 1000, 1];
        assert_eq!(cup_total(&placements), 2006);
    }

    #[test]
    fn test_fewer_than_five_sums_everything() {
        assert_eq!(cup_total(&[4, 1000, 2]), 1006);
        assert_eq!(cup_total(&[]), 0);
    }

    #[test]
    fn test_exclusion_boundary() {
        assert!(is_ranked(4999));
        assert!(!is_ranked(5000));
        assert!(!is_ranked(7000));
    }

    #[test]
    fn test_absent_competition_contributes_sentinel() {
        let comps: Vec<Competition> = (1..=6)
            .map(|i| competition(&format!("Deltävling {}", i), &[1]))
            .collect();
        let anna = shooter("Anna", Klass::Oppen, 1);
        let bo = shooter("Bo", Klass::Oppen, 2);
        let scores = vec![
            score(&comps[0], &anna, 1, 40),
            score(&comps[0], &bo, 1, 30),
            score(&comps[1], &bo, 1, 30),
        ];

        let standings = cup_standings(&comps, &[anna, bo], &scores);
        let entries = &standings.class(Klass::Oppen).unwrap().entries;

        // Bo: placements 2, 1, then four absences -> 2 + 1 + 3 * 1000
        assert_eq!(entries[0].name, "Bo");
        assert_eq!(entries[0].cup_total, 3003);
        assert_eq!(
            entries[0].placements,
            vec![Some(2), Some(1), None, None, None, None]
        );
        // Anna: 1, then five absences, best five = 1 + 4 * 1000
        assert_eq!(entries[1].name, "Anna");
        assert_eq!(entries[1].cup_total, 4001);
        assert_eq!(entries[1].standing, 2);
    }

    #[test]
    fn test_shooter_without_participation_is_excluded() {
        let comps: Vec<Competition> = (1..=5)
            .map(|i| competition(&format!("Deltävling {}", i), &[1]))
            .collect();
        let anna = shooter("Anna", Klass::Dam, 1);
        let idle = shooter("Idle", Klass::Dam, 2);
        let scores = vec![score(&comps[2], &anna, 1, 40)];

        let standings = cup_standings(&comps, &[anna, idle], &scores);
        let names: Vec<&str> = standings
            .class(Klass::Dam)
            .unwrap()
            .entries
            .iter()
            .map(|e| e.name.as_str())
            .collect();

        assert_eq!(names, vec!["Anna"]);
    }

    #[test]
    fn test_equal_totals_keep_order_and_take_positions() {
        let comps = vec![competition("Deltävling 1", &[1])];
        let anna = shooter("Anna", Klass::Veteran, 1);
        let bo = shooter("Bo", Klass::Veteran, 2);
        let cilla = shooter("Cilla", Klass::Veteran, 3);
        let scores = vec![
            score(&comps[0], &anna, 1, 30),
            score(&comps[0], &bo, 1, 30),
            score(&comps[0], &cilla, 1, 10),
        ];

        let standings = cup_standings(&comps, &[anna, bo, cilla], &scores);
        let rows: Vec<(&str, u32, u32)> = standings
            .class(Klass::Veteran)
            .unwrap()
            .entries
            .iter()
            .map(|e| (e.name.as_str(), e.standing, e.cup_total))
            .collect();

        assert_eq!(
            rows,
            vec![("Anna", 1, 1), ("Bo", 2, 1), ("Cilla", 3, 3)]
        );
    }

    #[test]
    fn test_placements_come_from_the_shooters_own_class() {
        let comps = vec![competition("Deltävling 1", &[1])];
        let anna = shooter("Anna", Klass::Ungdom, 1);
        let bo = shooter("Bo", Klass::Oppen, 2);
        let scores = vec![score(&comps[0], &anna, 1, 10), score(&comps[0], &bo, 1, 50)];

        let standings = cup_standings(&comps, &[anna, bo], &scores);

        assert_eq!(
            standings.class(Klass::Ungdom).unwrap().entries[0].placements,
            vec![Some(1)]
        );
    }

    #[test]
    fn test_empty_competitions_give_empty_standings() {
        let anna = shooter("Anna", Klass::Oppen, 1);
        let standings = cup_standings(&[], &[anna], &[]);

        assert!(standings.competitions.is_empty());
        assert!(standings.classes.iter().all(|c| c.entries.is_empty()));
    }

    #[test]
    fn test_competition_columns_follow_input_order() {
        let comps = vec![
            competition("Landby Cup Deltävling 1", &[1]),
            competition("Landby Cup Final", &[2]),
        ];
        let standings = cup_standings(&comps, &[], &[]);
        let labels: Vec<&str> = standings
            .competitions
            .iter()
            .map(|c| c.short_label.as_str())
            .collect();

        assert_eq!(labels, vec!["1", "Final"]);
    }
}

use crate::dto::export::{ExportDocument, ExportSection};
use crate::dto::results::{CompetitionResults, CupStandings};

const NO_PARTICIPANTS: &str = "Inga deltagare";
const ABSENT: &str = "-";

/// Result list of one competition: one section per class, every class present.
///
/// Columns: `Plats`, `Skytt`, `Ort`, one `St n` per scored station, one
/// `Skilje k` per tie-break station (`total/femettor`), `Summa`.
pub fn competition_document(results: &CompetitionResults) -> ExportDocument {
    let mut columns = vec!["Plats".to_string(), "Skytt".to_string(), "Ort".to_string()];
    columns.extend(results.stations.iter().map(|s| format!("St {}", s)));
    columns.extend((1..=results.tie_break_stations.len()).map(|k| format!("Skilje {}", k)));
    columns.push("Summa".to_string());

    let sections = results
        .classes
        .iter()
        .map(|class| {
            let rows = if class.entries.is_empty() {
                vec![vec![NO_PARTICIPANTS.to_string()]]
            } else {
                class
                    .entries
                    .iter()
                    .map(|entry| {
                        let mut row =
                            vec![entry.placement.to_string(), entry.name.clone(), entry.club.clone()];
                        row.extend(
                            results
                                .stations
                                .iter()
                                .map(|&station| entry.station_total(station).to_string()),
                        );
                        row.extend(
                            entry
                                .tie_breaks
                                .iter()
                                .map(|cell| format!("{}/{}", cell.total, cell.femettor)),
                        );
                        row.push(entry.total.to_string());
                        row
                    })
                    .collect()
            };

            ExportSection {
                heading: class.klass.to_string(),
                columns: columns.clone(),
                rows,
            }
        })
        .collect();

    let note = results
        .tie_break_stations
        .iter()
        .enumerate()
        .map(|(i, station)| format!("Skilje {}: St {}", i + 1, station))
        .collect::<Vec<_>>()
        .join(", ");

    ExportDocument {
        title: "Resultatlista".to_string(),
        subtitle: Some(results.competition_name.clone()),
        note: Some(format!("Skiljemål: {}", note)),
        file_name: format!("resultatlista_{}.pdf", results.competition_name),
        sections,
    }
}

/// Cup standings: one section per class that has at least one ranked shooter.
///
/// Columns: `Plats`, `Skytt`, `Ort`, one per competition (short label),
/// `Totalpoäng`. Competitions the shooter missed are shown as `-`.
pub fn cup_document(standings: &CupStandings) -> ExportDocument {
    let mut columns = vec!["Plats".to_string(), "Skytt".to_string(), "Ort".to_string()];
    columns.extend(standings.competitions.iter().map(|c| c.short_label.clone()));
    columns.push("Totalpoäng".to_string());

    let sections = standings
        .classes
        .iter()
        .filter(|class| !class.entries.is_empty())
        .map(|class| ExportSection {
            heading: class.klass.title(),
            columns: columns.clone(),
            rows: class
                .entries
                .iter()
                .map(|entry| {
                    let mut row =
                        vec![entry.standing.to_string(), entry.name.clone(), entry.club.clone()];
                    row.extend(entry.placements.iter().map(|placement| match placement {
                        Some(p) => p.to_string(),
                        None => ABSENT.to_string(),
                    }));
                    row.push(entry.cup_total.to_string());
                    row
                })
                .collect(),
        })
        .collect();

    ExportDocument {
        title: "Cupresultat".to_string(),
        subtitle: None,
        note: Some(format!(
            "Totalpoängen baseras på de {} bästa placeringarna. Lägst poäng vinner. \
             Skytt som ej deltagit i en deltävling får {} poäng och visas som {}.",
            super::cup::CUP_BEST_OF,
            super::cup::SENTINEL_PLACEMENT,
            ABSENT
        )),
        file_name: "cupresultat.pdf".to_string(),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::super::cup::cup_standings;
    use super::super::ranking::fixtures::*;
    use super::super::ranking::rank_competition;
    use super::*;
    use crate::models::{Klass, Shot};

    #[test]
    fn test_competition_columns_in_order() {
        let comp = competition("Deltävling 1", &[5, 2]);
        let anna = shooter("Anna", Klass::Oppen, 1);
        let scores = vec![
            score(&comp, &anna, 2, 30),
            score(&comp, &anna, 5, 20),
            score(&comp, &anna, 7, 10),
        ];
        let results = rank_competition(&comp, &[anna], &scores);

        let doc = competition_document(&results);
        let section = &doc.sections[0];

        assert_eq!(
            section.columns,
            vec![
                "Plats", "Skytt", "Ort", "St 2", "St 5", "St 7", "Skilje 1", "Skilje 2", "Summa"
            ]
        );
        assert_eq!(
            section.rows[0],
            vec!["1", "Anna", "Landby", "30", "20", "10", "20/0", "30/0", "60"]
        );
        assert_eq!(doc.note.as_deref(), Some("Skiljemål: Skilje 1: St 5, Skilje 2: St 2"));
    }

    #[test]
    fn test_competition_document_lists_empty_classes() {
        let comp = competition("Deltävling 1", &[1]);
        let results = rank_competition(&comp, &[], &[]);

        let doc = competition_document(&results);

        assert_eq!(doc.sections.len(), Klass::ALL.len());
        assert_eq!(doc.sections[0].heading, "öppen");
        assert_eq!(doc.sections[0].rows, vec![vec!["Inga deltagare".to_string()]]);
    }

    #[test]
    fn test_tie_break_cell_shows_femettor() {
        let comp = competition("Deltävling 1", &[1]);
        let anna = shooter("Anna", Klass::Oppen, 1);
        let shots = vec![
            Shot::new(10, true),
            Shot::new(5, true),
            Shot::new(5, false),
            Shot::new(0, false),
            Shot::new(0, false),
        ];
        let scores = vec![score_with_shots(&comp, &anna, 1, shots)];
        let results = rank_competition(&comp, &[anna], &scores);

        let doc = competition_document(&results);

        assert_eq!(doc.sections[0].rows[0][4], "20/2");
    }

    #[test]
    fn test_cup_document_marks_absence_and_skips_empty_classes() {
        let comps = vec![
            competition("Deltävling 1", &[1]),
            competition("Deltävling 2", &[1]),
        ];
        let anna = shooter("Anna", Klass::Veteran, 1);
        let scores = vec![score(&comps[1], &anna, 1, 30)];
        let standings = cup_standings(&comps, &[anna], &scores);

        let doc = cup_document(&standings);

        assert_eq!(doc.sections.len(), 1);
        let section = &doc.sections[0];
        assert_eq!(section.heading, "Veteran");
        assert_eq!(section.columns, vec!["Plats", "Skytt", "Ort", "1", "2", "Totalpoäng"]);
        assert_eq!(section.rows[0], vec!["1", "Anna", "Landby", "-", "1", "1001"]);
    }
}

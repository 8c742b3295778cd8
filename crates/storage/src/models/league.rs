use uuid::Uuid;

use super::{Competition, Score, Shooter};

/// Snapshot of the three league collections, as the ranking engine consumes them.
#[derive(Debug, Clone, Default)]
pub struct League {
    pub competitions: Vec<Competition>,
    pub shooters: Vec<Shooter>,
    pub scores: Vec<Score>,
}

impl League {
    pub fn competition(&self, competition_id: Uuid) -> Option<&Competition> {
        self.competitions
            .iter()
            .find(|c| c.competition_id == competition_id)
    }
}

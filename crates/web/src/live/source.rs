use async_trait::async_trait;
use serde::Serialize;
use storage::{
    Database,
    dto::results::{CompetitionResults, CupStandings},
    error::StorageError,
    repository::CompetitionRepository,
    services::standings,
};
use uuid::Uuid;

/// A view clients can watch live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKey {
    CompetitionResults(Uuid),
    Cup,
}

impl FeedKey {
    /// SSE event name of this feed's payloads.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::CompetitionResults(_) => "results",
            Self::Cup => "cup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeedPayload {
    Results(CompetitionResults),
    Cup(CupStandings),
}

/// Produces the current value of a feed.
#[async_trait]
pub trait FeedSource: Send + Sync + 'static {
    async fn load(&self, key: FeedKey) -> Result<FeedPayload, StorageError>;

    /// Fails with [`StorageError::NotFound`] when `key` names nothing that can be watched.
    async fn exists(&self, _key: FeedKey) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Recomputes feeds from a fresh league snapshot.
pub struct DbFeedSource {
    db: Database,
}

impl DbFeedSource {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeedSource for DbFeedSource {
    async fn load(&self, key: FeedKey) -> Result<FeedPayload, StorageError> {
        match key {
            FeedKey::CompetitionResults(competition_id) => {
                standings::competition_results(self.db.pool(), competition_id)
                    .await
                    .map(FeedPayload::Results)
            }
            FeedKey::Cup => standings::cup_standings(self.db.pool())
                .await
                .map(FeedPayload::Cup),
        }
    }

    async fn exists(&self, key: FeedKey) -> Result<(), StorageError> {
        match key {
            FeedKey::CompetitionResults(competition_id) => CompetitionRepository::new(self.db.pool())
                .find_by_id(competition_id)
                .await
                .map(|_| ()),
            FeedKey::Cup => Ok(()),
        }
    }
}

use tokio::sync::broadcast;
use uuid::Uuid;

use super::FeedKey;

/// A collection changed. Score changes name the competition they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Competition(Uuid),
    Shooters,
    Scores(Uuid),
}

impl Change {
    /// Whether the view behind `key` may differ after this change.
    pub fn affects(&self, key: &FeedKey) -> bool {
        match (key, self) {
            (FeedKey::Cup, _) => true,
            (FeedKey::CompetitionResults(_), Change::Shooters) => true,
            (FeedKey::CompetitionResults(id), Change::Competition(changed))
            | (FeedKey::CompetitionResults(id), Change::Scores(changed)) => id == changed,
        }
    }
}

/// Fan-out of collection changes to the feed pumps.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<Change>,
}

impl ChangeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.sender.subscribe()
    }

    /// Publishing with no pump listening is not an error.
    pub fn publish(&self, change: Change) {
        tracing::debug!(?change, "Publishing change");
        let _ = self.sender.send(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cup_follows_every_change() {
        let id = Uuid::new_v4();
        assert!(Change::Shooters.affects(&FeedKey::Cup));
        assert!(Change::Competition(id).affects(&FeedKey::Cup));
        assert!(Change::Scores(id).affects(&FeedKey::Cup));
    }

    #[test]
    fn test_competition_results_follow_their_own_competition() {
        let watched = Uuid::new_v4();
        let other = Uuid::new_v4();
        let key = FeedKey::CompetitionResults(watched);

        assert!(Change::Scores(watched).affects(&key));
        assert!(Change::Competition(watched).affects(&key));
        assert!(Change::Shooters.affects(&key));
        assert!(!Change::Scores(other).affects(&key));
        assert!(!Change::Competition(other).affects(&key));
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let bus = ChangeBus::new(4);
        let mut receiver = bus.subscribe();

        bus.publish(Change::Shooters);

        assert_eq!(receiver.recv().await.unwrap(), Change::Shooters);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        ChangeBus::new(4).publish(Change::Shooters);
    }
}

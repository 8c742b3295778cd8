use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use storage::error::StorageError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::{Change, ChangeBus, FeedKey, FeedPayload, FeedSource};

type Latest = Option<Arc<FeedPayload>>;

struct FeedEntry {
    receiver: watch::Receiver<Latest>,
    consumers: usize,
    pump: JoinHandle<()>,
}

struct RegistryInner {
    feeds: DashMap<FeedKey, FeedEntry>,
    source: Arc<dyn FeedSource>,
    changes: ChangeBus,
}

/// Shares one pump per watched view between all of its subscribers.
#[derive(Clone)]
pub struct FeedRegistry {
    inner: Arc<RegistryInner>,
}

impl FeedRegistry {
    pub fn new(source: Arc<dyn FeedSource>, changes: ChangeBus) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                feeds: DashMap::new(),
                source,
                changes,
            }),
        }
    }

    /// Attach to the feed behind `key`, starting its pump if nobody watches it yet.
    pub fn subscribe(&self, key: FeedKey) -> FeedSubscription {
        let receiver = match self.inner.feeds.entry(key) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.consumers += 1;
                entry.receiver.clone()
            }
            Entry::Vacant(vacant) => {
                let (sender, receiver) = watch::channel(None);
                // subscribe before the first load so no change slips in between
                let changes = self.inner.changes.subscribe();
                let pump = tokio::spawn(run_pump(key, self.inner.source.clone(), changes, sender));

                tracing::info!(?key, "Started live feed");
                vacant.insert(FeedEntry {
                    receiver: receiver.clone(),
                    consumers: 1,
                    pump,
                });
                receiver
            }
        };

        FeedSubscription {
            key,
            receiver,
            primed: false,
            registry: self.clone(),
        }
    }

    /// Like [`subscribe`](Self::subscribe), but checks that `key` exists
    /// before a new pump is started for it.
    pub async fn open(&self, key: FeedKey) -> Result<FeedSubscription, StorageError> {
        if !self.inner.feeds.contains_key(&key) {
            self.inner.source.exists(key).await?;
        }
        Ok(self.subscribe(key))
    }

    fn release(&self, key: FeedKey) {
        if let Entry::Occupied(mut occupied) = self.inner.feeds.entry(key) {
            let entry = occupied.get_mut();
            entry.consumers = entry.consumers.saturating_sub(1);

            if entry.consumers == 0 {
                let entry = occupied.remove();
                entry.pump.abort();
                tracing::info!(?key, "Stopped live feed");
            }
        }
    }

    /// Number of views with at least one subscriber.
    pub fn active_feeds(&self) -> usize {
        self.inner.feeds.len()
    }

    pub fn consumers(&self, key: FeedKey) -> usize {
        self.inner
            .feeds
            .get(&key)
            .map(|entry| entry.consumers)
            .unwrap_or(0)
    }
}

async fn run_pump(
    key: FeedKey,
    source: Arc<dyn FeedSource>,
    mut changes: broadcast::Receiver<Change>,
    sender: watch::Sender<Latest>,
) {
    refresh(key, source.as_ref(), &sender).await;

    loop {
        match changes.recv().await {
            Ok(change) if change.affects(&key) => refresh(key, source.as_ref(), &sender).await,
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(?key, skipped, "Live feed lagged behind changes, recomputing");
                refresh(key, source.as_ref(), &sender).await;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn refresh(key: FeedKey, source: &dyn FeedSource, sender: &watch::Sender<Latest>) {
    match source.load(key).await {
        Ok(payload) => {
            sender.send_replace(Some(Arc::new(payload)));
        }
        Err(e) => tracing::warn!(?key, error = %e, "Failed to recompute live feed"),
    }
}

/// One consumer's attachment to a feed. Dropping it detaches.
pub struct FeedSubscription {
    key: FeedKey,
    receiver: watch::Receiver<Latest>,
    primed: bool,
    registry: FeedRegistry,
}

impl FeedSubscription {
    pub fn key(&self) -> FeedKey {
        self.key
    }

    /// Waits for the next payload. The first call returns the current one if
    /// it has already been computed. `None` once the feed has shut down.
    pub async fn next(&mut self) -> Option<Arc<FeedPayload>> {
        if !self.primed {
            self.primed = true;
            if let Some(payload) = self.receiver.borrow_and_update().clone() {
                return Some(payload);
            }
        }

        loop {
            self.receiver.changed().await.ok()?;
            if let Some(payload) = self.receiver.borrow_and_update().clone() {
                return Some(payload);
            }
        }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.registry.release(self.key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use storage::dto::results::CupStandings;
    use tokio::time::timeout;

    use super::*;

    const WAIT: Duration = Duration::from_secs(2);

    #[derive(Default)]
    struct CountingSource {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl FeedSource for CountingSource {
        async fn load(&self, _key: FeedKey) -> Result<FeedPayload, StorageError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(FeedPayload::Cup(CupStandings {
                competitions: Vec::new(),
                classes: Vec::new(),
            }))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl FeedSource for FailingSource {
        async fn load(&self, _key: FeedKey) -> Result<FeedPayload, StorageError> {
            Err(StorageError::NotFound)
        }
    }

    struct OneCompetitionSource {
        known: uuid::Uuid,
    }

    #[async_trait]
    impl FeedSource for OneCompetitionSource {
        async fn load(&self, key: FeedKey) -> Result<FeedPayload, StorageError> {
            CountingSource::default().load(key).await
        }

        async fn exists(&self, key: FeedKey) -> Result<(), StorageError> {
            match key {
                FeedKey::CompetitionResults(id) if id != self.known => Err(StorageError::NotFound),
                _ => Ok(()),
            }
        }
    }

    fn registry() -> (FeedRegistry, Arc<CountingSource>, ChangeBus) {
        let source = Arc::new(CountingSource::default());
        let changes = ChangeBus::new(16);
        let registry = FeedRegistry::new(source.clone(), changes.clone());
        (registry, source, changes)
    }

    #[tokio::test]
    async fn test_subscribers_share_one_feed() {
        let (registry, _, _) = registry();

        let first = registry.subscribe(FeedKey::Cup);
        let second = registry.subscribe(FeedKey::Cup);

        assert_eq!(registry.active_feeds(), 1);
        assert_eq!(registry.consumers(FeedKey::Cup), 2);

        drop(first);
        assert_eq!(registry.active_feeds(), 1);
        assert_eq!(registry.consumers(FeedKey::Cup), 1);

        drop(second);
        assert_eq!(registry.active_feeds(), 0);
        assert_eq!(registry.consumers(FeedKey::Cup), 0);
    }

    #[tokio::test]
    async fn test_distinct_keys_get_distinct_feeds() {
        let (registry, _, _) = registry();
        let competition = uuid::Uuid::new_v4();

        let _cup = registry.subscribe(FeedKey::Cup);
        let _results = registry.subscribe(FeedKey::CompetitionResults(competition));

        assert_eq!(registry.active_feeds(), 2);
    }

    #[tokio::test]
    async fn test_first_payload_then_refresh_on_change() {
        let (registry, source, changes) = registry();
        let mut subscription = registry.subscribe(FeedKey::Cup);

        let first = timeout(WAIT, subscription.next()).await.unwrap();
        assert!(first.is_some());
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);

        changes.publish(Change::Shooters);

        let second = timeout(WAIT, subscription.next()).await.unwrap();
        assert!(second.is_some());
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_current_payload() {
        let (registry, source, _) = registry();
        let mut early = registry.subscribe(FeedKey::Cup);
        timeout(WAIT, early.next()).await.unwrap();

        let mut late = registry.subscribe(FeedKey::Cup);
        let payload = timeout(WAIT, late.next()).await.unwrap();

        assert!(payload.is_some());
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resubscribing_after_teardown_restarts_the_pump() {
        let (registry, source, _) = registry();

        let mut subscription = registry.subscribe(FeedKey::Cup);
        timeout(WAIT, subscription.next()).await.unwrap();
        drop(subscription);
        assert_eq!(registry.active_feeds(), 0);

        let mut subscription = registry.subscribe(FeedKey::Cup);
        timeout(WAIT, subscription.next()).await.unwrap();

        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_open_rejects_unknown_competition_without_starting_a_feed() {
        let known = uuid::Uuid::new_v4();
        let registry = FeedRegistry::new(Arc::new(OneCompetitionSource { known }), ChangeBus::new(4));

        let result = registry
            .open(FeedKey::CompetitionResults(uuid::Uuid::new_v4()))
            .await;

        assert!(matches!(result, Err(StorageError::NotFound)));
        assert_eq!(registry.active_feeds(), 0);

        let _subscription = registry
            .open(FeedKey::CompetitionResults(known))
            .await
            .unwrap();
        let _cup = registry.open(FeedKey::Cup).await.unwrap();
        assert_eq!(registry.active_feeds(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_publishes_nothing() {
        let registry = FeedRegistry::new(Arc::new(FailingSource), ChangeBus::new(4));
        let mut subscription = registry.subscribe(FeedKey::Cup);

        let result = timeout(Duration::from_millis(100), subscription.next()).await;

        assert!(result.is_err());
    }
}

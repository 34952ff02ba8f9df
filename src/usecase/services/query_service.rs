use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::domain::entities::dataset::DatasetKind;
use crate::domain::entities::snapshot::Snapshot;
use crate::usecase::ports::repo::{RepoError, TicketRepository};

struct CachedSnapshot {
    loaded_at: Instant,
    snapshot: Snapshot,
}

/// Read side of the dashboard. Snapshots are reused for `ttl` and dropped by
/// [`QueryService::invalidate`] after every successful write.
pub struct QueryService {
    repo: Arc<dyn TicketRepository>,
    ttl: Duration,
    cache: Mutex<HashMap<DatasetKind, CachedSnapshot>>,
}

impl QueryService {
    pub fn new(repo: Arc<dyn TicketRepository>, ttl: Duration) -> Self {
        Self {
            repo,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn load_snapshot(&self, dataset: DatasetKind) -> Result<Snapshot, RepoError> {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(cached) = cache.get(&dataset) {
            if cached.loaded_at.elapsed() < self.ttl {
                tracing::debug!(?dataset, rows = cached.snapshot.len(), "snapshot served from cache");
                return Ok(cached.snapshot.clone());
            }
        }

        let snapshot = self.repo.load_snapshot(dataset)?;
        tracing::debug!(?dataset, rows = snapshot.len(), "snapshot loaded from store");
        cache.insert(
            dataset,
            CachedSnapshot {
                loaded_at: Instant::now(),
                snapshot: snapshot.clone(),
            },
        );
        Ok(snapshot)
    }

    pub fn invalidate(&self, dataset: DatasetKind) {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if cache.remove(&dataset).is_some() {
            tracing::debug!(?dataset, "snapshot cache invalidated");
        }
    }
}

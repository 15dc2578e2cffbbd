use crate::dialects::CombinedStrategy;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

use super::identity::DatabaseIdentity;

#[derive(Debug, Clone)]
struct CacheEntry {
    strategy: Arc<CombinedStrategy>,
    detected_at: DateTime<Utc>,
}

/// Diagnostic view of one cached detection outcome.
#[derive(Debug, Clone)]
pub struct CachedDetection {
    pub identity: DatabaseIdentity,
    pub paging_delegate: Option<String>,
    pub detected_at: DateTime<Utc>,
}

/// Detection outcomes per database endpoint.
///
/// Entries are written once per key and never evicted. Reads and
/// insert-if-absent writes lock a single shard, not the whole map.
#[derive(Debug, Default)]
pub struct DetectionCache {
    entries: DashMap<DatabaseIdentity, CacheEntry>,
}

impl DetectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &DatabaseIdentity) -> Option<Arc<CombinedStrategy>> {
        self.entries
            .get(identity)
            .map(|entry| entry.strategy.clone())
    }

    /// Store `strategy` unless the key is already present.
    ///
    /// Returns the authoritative entry: the stored one if another caller got
    /// there first, otherwise `strategy` itself.
    pub fn insert_if_absent(
        &self,
        identity: DatabaseIdentity,
        strategy: Arc<CombinedStrategy>,
    ) -> Arc<CombinedStrategy> {
        self.entries
            .entry(identity)
            .or_insert_with(|| CacheEntry {
                strategy,
                detected_at: Utc::now(),
            })
            .strategy
            .clone()
    }

    pub fn contains(&self, identity: &DatabaseIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> Vec<CachedDetection> {
        let mut detections: Vec<CachedDetection> = self
            .entries
            .iter()
            .map(|entry| CachedDetection {
                identity: entry.key().clone(),
                paging_delegate: entry.value().strategy.delegate_name().map(str::to_string),
                detected_at: entry.value().detected_at,
            })
            .collect();
        detections.sort_by(|a, b| a.identity.key().cmp(b.identity.key()));
        detections
    }
}

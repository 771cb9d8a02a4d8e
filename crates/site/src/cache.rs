//! Process-wide categories cache.
//!
//! Holds one snapshot of the public category list. A snapshot is replaced
//! as a unit on refresh and dropped on invalidation, so readers never see a
//! mix of old and new records.
//!
//! ## Invariants
//!
//! - The excluded category id never appears in returned records.
//! - The loading placeholder is returned but never stored.
//! - Generations increase by one on every stored refresh and never go back.
//! - A refresh that started before [`CategoriesCache::invalidate`] is never
//!   stored after it.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use noble_paints_core::{CategoryId, CategoryRecord};

use crate::db::RepositoryError;

/// Storage backing the cache.
pub trait CategorySource {
    /// Fetch every category except `excluded`, ordered by id.
    fn fetch_categories(
        &self,
        excluded: CategoryId,
    ) -> impl Future<Output = Result<Vec<CategoryRecord>, RepositoryError>> + Send;
}

#[derive(Debug)]
struct CacheEntry {
    records: Arc<[CategoryRecord]>,
    fetched_at: Instant,
    generation: u64,
}

/// Records returned by [`CategoriesCache::get`].
#[derive(Debug, Clone)]
pub struct CategoriesSnapshot {
    pub records: Arc<[CategoryRecord]>,
    /// Generation of the stored entry, `0` when nothing has been stored yet.
    pub generation: u64,
    /// Whether the records came from a stored entry rather than a fresh fetch.
    pub from_cache: bool,
}

impl CategoriesSnapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Time-bounded cache of the public category list.
#[derive(Debug)]
pub struct CategoriesCache {
    entry: RwLock<Option<CacheEntry>>,
    ttl: Duration,
    excluded: CategoryId,
    generations: AtomicU64,
    epoch: AtomicU64,
}

impl CategoriesCache {
    #[must_use]
    pub fn new(ttl: Duration, excluded: CategoryId) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
            excluded,
            generations: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
        }
    }

    /// Cached categories, refreshed from `source` when absent or expired.
    ///
    /// Never fails: a refresh error falls back to the previous entry even if
    /// it is stale, and to a single placeholder record when nothing was ever
    /// stored.
    pub async fn get<S: CategorySource + Sync>(&self, source: &S) -> CategoriesSnapshot {
        if let Some(snapshot) = self.fresh().await {
            return snapshot;
        }

        // The lock is not held while querying. A refresh only stores its
        // records if no invalidation happened since it started.
        let epoch = self.epoch.load(Ordering::Acquire);
        match source.fetch_categories(self.excluded).await {
            Ok(records) => {
                let records: Arc<[CategoryRecord]> = records
                    .into_iter()
                    .filter(|r| r.id != self.excluded)
                    .collect();
                let mut guard = self.entry.write().await;
                if self.epoch.load(Ordering::Acquire) != epoch {
                    tracing::debug!(count = records.len(), "Categories cache invalidated during refresh, not storing");
                    return CategoriesSnapshot {
                        records,
                        generation: guard.as_ref().map_or(0, |e| e.generation),
                        from_cache: false,
                    };
                }
                let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
                *guard = Some(CacheEntry {
                    records: Arc::clone(&records),
                    fetched_at: Instant::now(),
                    generation,
                });
                drop(guard);
                tracing::debug!(count = records.len(), generation, "Categories cache refreshed");
                CategoriesSnapshot {
                    records,
                    generation,
                    from_cache: false,
                }
            }
            Err(e) => {
                let guard = self.entry.read().await;
                if let Some(entry) = guard.as_ref() {
                    tracing::warn!(error = %e, generation = entry.generation, "Category refresh failed, serving stale entry");
                    CategoriesSnapshot {
                        records: Arc::clone(&entry.records),
                        generation: entry.generation,
                        from_cache: true,
                    }
                } else {
                    tracing::warn!(error = %e, "Category refresh failed with nothing cached");
                    CategoriesSnapshot {
                        records: Arc::from([CategoryRecord::loading_placeholder()]),
                        generation: 0,
                        from_cache: false,
                    }
                }
            }
        }
    }

    async fn fresh(&self) -> Option<CategoriesSnapshot> {
        let guard = self.entry.read().await;
        let entry = guard.as_ref()?;
        (entry.fetched_at.elapsed() < self.ttl).then(|| CategoriesSnapshot {
            records: Arc::clone(&entry.records),
            generation: entry.generation,
            from_cache: true,
        })
    }

    /// Drop the stored entry so the next [`get`](Self::get) refetches.
    pub async fn invalidate(&self) {
        let mut guard = self.entry.write().await;
        self.epoch.fetch_add(1, Ordering::AcqRel);
        *guard = None;
        drop(guard);
        tracing::debug!("Categories cache invalidated");
    }

    /// Generation of the stored entry, `0` when empty.
    pub async fn generation(&self) -> u64 {
        self.entry.read().await.as_ref().map_or(0, |e| e.generation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::*;

    struct FakeSource {
        calls: AtomicU64,
        failing: AtomicBool,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                calls: AtomicU64::new(0),
                failing: AtomicBool::new(false),
            }
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }

        fn fail(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }
    }

    impl CategorySource for FakeSource {
        async fn fetch_categories(
            &self,
            _excluded: CategoryId,
        ) -> Result<Vec<CategoryRecord>, RepositoryError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
            }
            // The excluded id is returned on purpose: the cache must drop it
            // even when a source forgets to.
            Ok([1, 29, 2]
                .into_iter()
                .map(|id| {
                    CategoryRecord::from_columns(
                        CategoryId::new(id),
                        Some(format!("Category {id} v{call}")),
                        None,
                        None,
                        None,
                    )
                })
                .collect())
        }
    }

    fn cache(ttl: Duration) -> CategoriesCache {
        CategoriesCache::new(ttl, CategoryId::new(29))
    }

    #[tokio::test]
    async fn test_second_get_within_ttl_does_not_refetch() {
        let source = FakeSource::new();
        let cache = cache(Duration::from_secs(300));

        let first = cache.get(&source).await;
        let second = cache.get(&source).await;

        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&first.records, &second.records));
        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.generation, second.generation);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let source = FakeSource::new();
        let cache = cache(Duration::from_secs(300));

        let first = cache.get(&source).await;
        cache.invalidate().await;
        assert_eq!(cache.generation().await, 0);
        let second = cache.get(&source).await;

        assert_eq!(source.calls(), 2);
        assert!(second.generation > first.generation);
        assert_ne!(first.records[0].name, second.records[0].name);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let source = FakeSource::new();
        let cache = cache(Duration::ZERO);

        cache.get(&source).await;
        cache.get(&source).await;

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_excluded_id_never_returned() {
        let source = FakeSource::new();
        let snapshot = cache(Duration::from_secs(300)).get(&source).await;

        let ids: Vec<i32> = snapshot.records.iter().map(|r| r.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failed_refresh_serves_stale_entry() {
        let source = FakeSource::new();
        let cache = cache(Duration::ZERO);

        let first = cache.get(&source).await;
        source.fail();
        let second = cache.get(&source).await;

        assert!(Arc::ptr_eq(&first.records, &second.records));
        assert!(second.from_cache);
        assert_eq!(second.generation, first.generation);
    }

    #[tokio::test]
    async fn test_failure_without_entry_returns_unstored_placeholder() {
        let source = FakeSource::new();
        source.fail();
        let cache = cache(Duration::from_secs(300));

        let snapshot = cache.get(&source).await;
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.records[0].is_placeholder());
        assert_eq!(cache.generation().await, 0);

        // The placeholder was not stored, so the next call queries again.
        cache.get(&source).await;
        assert_eq!(source.calls(), 2);
    }

    /// Blocks the first fetch until released; later fetches return at once.
    struct GatedSource {
        calls: AtomicU64,
        started: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    impl CategorySource for GatedSource {
        async fn fetch_categories(
            &self,
            _excluded: CategoryId,
        ) -> Result<Vec<CategoryRecord>, RepositoryError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let name = if call == 0 {
                self.started.notify_one();
                self.release.notified().await;
                "old"
            } else {
                "new"
            };
            Ok(vec![CategoryRecord::from_columns(
                CategoryId::new(1),
                Some(name.to_owned()),
                None,
                None,
                None,
            )])
        }
    }

    #[tokio::test]
    async fn test_refresh_started_before_invalidate_is_not_stored() {
        let source = Arc::new(GatedSource {
            calls: AtomicU64::new(0),
            started: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
        });
        let cache = Arc::new(cache(Duration::from_secs(300)));

        let pending = tokio::spawn({
            let cache = Arc::clone(&cache);
            let source = Arc::clone(&source);
            async move { cache.get(&*source).await }
        });
        source.started.notified().await;
        cache.invalidate().await;
        source.release.notify_one();

        // The in-flight caller still gets what it fetched.
        let in_flight = pending.await.unwrap();
        assert_eq!(in_flight.records[0].name, "old");
        assert_eq!(cache.generation().await, 0);

        let fresh = cache.get(&*source).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(fresh.records[0].name, "new");
        assert_eq!(fresh.generation, 1);
    }
}

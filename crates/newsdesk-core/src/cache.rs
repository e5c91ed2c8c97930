//! Query cache with tag-based invalidation.
//!
//! Each cached read is stored under a [`QueryKey`] together with the
//! [`Tag`]s it depends on. A mutation invalidates tags, which marks every
//! entry carrying one of them stale; the next read of a stale entry goes
//! back to the network. Entries also go stale after a fixed age.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use newsdesk_api::ArticleId;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::error::Result;

/// Age after which an entry is refetched even without invalidation.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60);

/// Upper bound on cached queries.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// Resource family a cached query depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Any article list.
    Articles,
    /// One article.
    Article(ArticleId),
    /// Category list.
    Categories,
    /// Source list.
    Sources,
    /// User preferences.
    Preferences,
    /// Job list.
    Jobs,
    /// Current user.
    User,
}

/// Endpoint plus canonicalized parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    endpoint: String,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    /// Key for a parameterless endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: BTreeMap::new(),
        }
    }

    /// Key with parameters taken from a serializable struct.
    ///
    /// Fields are sorted and `null`s dropped, so two queries that differ
    /// only in field order or unset fields share a key.
    #[must_use]
    pub fn with_params<P: Serialize + ?Sized>(endpoint: impl Into<String>, params: &P) -> Self {
        let mut key = Self::new(endpoint);
        if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(params) {
            for (name, value) in map {
                let value = match value {
                    serde_json::Value::Null => continue,
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                key.params.insert(name, value);
            }
        }
        key
    }

    /// Endpoint this key belongs to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.endpoint)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        Ok(())
    }
}

/// How a read treats cached data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Serve a fresh entry if there is one.
    #[default]
    CacheFirst,
    /// Always go to the network (manual refresh, polling).
    Refetch,
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    tags: Vec<Tag>,
    fetched_at: Instant,
    stale: bool,
}

impl Entry {
    fn is_fresh(&self, stale_after: Duration) -> bool {
        !self.stale && self.fetched_at.elapsed() < stale_after
    }
}

#[derive(Default)]
struct State {
    entries: HashMap<QueryKey, Entry>,
    /// Bumped by every invalidation and clear.
    generation: u64,
    /// Generation at which each tag was last invalidated.
    invalidated: HashMap<Tag, u64>,
    /// Generation of the last clear.
    cleared: u64,
}

impl State {
    /// A fetch that started at `started` raced an invalidation of `tags`.
    fn superseded(&self, started: u64, tags: &[Tag]) -> bool {
        self.cleared > started
            || tags
                .iter()
                .any(|tag| self.invalidated.get(tag).is_some_and(|&g| g > started))
    }

    /// Drops expired entries other than `keep`, then the oldest ones above
    /// `max_entries`.
    fn evict(&mut self, keep: &QueryKey, stale_after: Duration, max_entries: usize) {
        self.entries
            .retain(|key, e| key == keep || e.is_fresh(stale_after));
        if self.entries.len() <= max_entries {
            return;
        }
        let mut by_age: Vec<(Instant, QueryKey)> = self
            .entries
            .iter()
            .filter(|(key, _)| *key != keep)
            .map(|(key, e)| (e.fetched_at, key.clone()))
            .collect();
        by_age.sort_unstable_by_key(|(fetched_at, _)| *fetched_at);
        let excess = self.entries.len() - max_entries;
        for (_, key) in by_age.into_iter().take(excess) {
            self.entries.remove(&key);
        }
    }
}

/// Shared cache of query results.
///
/// Clones share the same entries. Expired entries are evicted on insert and
/// the map never holds more than `max_entries` queries.
#[derive(Clone)]
pub struct QueryCache {
    state: Arc<RwLock<State>>,
    stale_after: Duration,
    max_entries: usize,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("stale_after", &self.stale_after)
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER)
    }
}

impl QueryCache {
    /// Empty cache whose entries go stale after `stale_after`.
    #[must_use]
    pub fn new(stale_after: Duration) -> Self {
        Self::with_capacity(stale_after, DEFAULT_MAX_ENTRIES)
    }

    /// Empty cache holding at most `max_entries` queries.
    #[must_use]
    pub fn with_capacity(stale_after: Duration, max_entries: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            stale_after,
            max_entries,
        }
    }

    /// Fresh value for `key`, if cached with the expected type.
    pub async fn get<T: Clone + Send + Sync + 'static>(&self, key: &QueryKey) -> Option<T> {
        let state = self.state.read().await;
        let entry = state.entries.get(key)?;
        if !entry.is_fresh(self.stale_after) {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Stores a fresh value, replacing any previous entry.
    pub async fn insert<T: Send + Sync + 'static>(&self, key: QueryKey, value: T, tags: &[Tag]) {
        let mut state = self.state.write().await;
        self.store(&mut state, key, value, tags, false);
    }

    fn store<T: Send + Sync + 'static>(
        &self,
        state: &mut State,
        key: QueryKey,
        value: T,
        tags: &[Tag],
        stale: bool,
    ) {
        trace!("Caching {key} (stale: {stale})");
        state.entries.insert(
            key.clone(),
            Entry {
                value: Arc::new(value),
                tags: tags.to_vec(),
                fetched_at: Instant::now(),
                stale,
            },
        );
        state.evict(&key, self.stale_after, self.max_entries);
    }

    /// Marks every entry carrying any of `tags` stale. Returns how many.
    ///
    /// Fetches already in flight for these tags commit their results as
    /// stale, so the next read goes back to the network.
    pub async fn invalidate(&self, tags: &[Tag]) -> usize {
        let mut state = self.state.write().await;
        state.generation += 1;
        let generation = state.generation;
        for tag in tags {
            state.invalidated.insert(*tag, generation);
        }

        let mut count = 0;
        for entry in state.entries.values_mut() {
            if !entry.stale && entry.tags.iter().any(|t| tags.contains(t)) {
                entry.stale = true;
                count += 1;
            }
        }
        debug!("Invalidated {count} cached queries for {tags:?}");
        count
    }

    /// Returns true if `key` is missing, stale or too old.
    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        self.state
            .read()
            .await
            .entries
            .get(key)
            .is_none_or(|e| !e.is_fresh(self.stale_after))
    }

    /// Drops everything (used on sign-out).
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.generation += 1;
        state.cleared = state.generation;
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Serves `key` from cache, or runs `fetch` and caches its result.
    ///
    /// The result is committed even if the caller has stopped waiting for
    /// it elsewhere; concurrent misses for the same key both fetch. A result
    /// whose tags were invalidated while it was in flight is committed stale.
    ///
    /// # Errors
    ///
    /// Returns whatever `fetch` returns; failures are not cached.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        tags: &[Tag],
        policy: FetchPolicy,
        fetch: F,
    ) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if policy == FetchPolicy::CacheFirst
            && let Some(value) = self.get::<T>(&key).await
        {
            trace!("Cache hit for {key}");
            return Ok(value);
        }

        let started = self.state.read().await.generation;
        debug!("Fetching {key}");
        let value = fetch().await?;

        let mut state = self.state.write().await;
        let stale = state.superseded(started, tags);
        if stale {
            debug!("{key} was invalidated while in flight");
        }
        self.store(&mut state, key, value.clone(), tags, stale);
        Ok(value)
    }
}

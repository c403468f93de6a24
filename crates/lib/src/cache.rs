//! # Remote Page Cache
//!
//! A small in-memory cache of successful remote search pages, keyed by the
//! full `SearchQuery`. Entries expire after a fixed TTL and the cache holds at
//! most `max_entries` pages; failures are never stored.

use crate::types::{RemotePage, SearchQuery};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    page: RemotePage,
    created_at: Instant,
}

#[derive(Debug)]
pub struct PageCache {
    entries: RwLock<HashMap<SearchQuery, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl PageCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries,
        }
    }

    /// Returns the cached page for `query` if it exists and has not expired.
    pub async fn get(&self, query: &SearchQuery) -> Option<RemotePage> {
        let entries = self.entries.read().await;
        match entries.get(query) {
            Some(entry) if entry.created_at.elapsed() < self.ttl => {
                debug!(query = %query.title, page = query.page, "Remote page cache hit");
                Some(entry.page.clone())
            }
            _ => None,
        }
    }

    /// Stores `page` for `query`, evicting expired and then oldest entries when full.
    pub async fn insert(&self, query: SearchQuery, page: RemotePage) {
        if self.max_entries == 0 {
            return;
        }

        let mut entries = self.entries.write().await;
        if !entries.contains_key(&query) && entries.len() >= self.max_entries {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.created_at.elapsed() < ttl);

            if entries.len() >= self.max_entries {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.created_at)
                    .map(|(key, _)| key.clone());
                if let Some(key) = oldest {
                    entries.remove(&key);
                }
            }
        }

        entries.insert(
            query,
            CacheEntry {
                page,
                created_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

//! # Guarded Remote Source
//!
//! Wraps any `RemoteSource` with the resilience policy applied to the remote
//! search: a response cache, a circuit breaker, and a configurable outcome
//! for failed calls (an empty page, or a single "upstream unavailable" error).

use super::{RemoteSource, REMOTE_SOURCE};
use crate::{
    breaker::CircuitBreaker,
    cache::PageCache,
    errors::SearchError,
    types::{RemotePage, SearchQuery},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

/// What a failed remote call resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteFailurePolicy {
    /// Resolve to `RemotePage::empty()`.
    #[default]
    EmptyPage,
    /// Resolve to `SearchError::UpstreamUnavailable`.
    Error,
}

/// A `RemoteSource` behind a response cache, a circuit breaker and a failure policy.
#[derive(Clone, Debug)]
pub struct GuardedRemoteSource {
    inner: Box<dyn RemoteSource>,
    cache: Arc<PageCache>,
    breaker: Arc<CircuitBreaker>,
    policy: RemoteFailurePolicy,
}

impl GuardedRemoteSource {
    pub fn new(
        inner: Box<dyn RemoteSource>,
        cache: PageCache,
        breaker: CircuitBreaker,
        policy: RemoteFailurePolicy,
    ) -> Self {
        Self {
            inner,
            cache: Arc::new(cache),
            breaker: Arc::new(breaker),
            policy,
        }
    }

    /// A guard with caching disabled and a breaker that never opens in practice.
    pub fn with_policy(inner: Box<dyn RemoteSource>, policy: RemoteFailurePolicy) -> Self {
        Self::new(
            inner,
            PageCache::new(Duration::ZERO, 0),
            CircuitBreaker::new(REMOTE_SOURCE, u32::MAX, Duration::ZERO),
            policy,
        )
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    async fn call_through_breaker(&self, query: &SearchQuery) -> Result<RemotePage, SearchError> {
        let Some(permit) = self.breaker.acquire() else {
            return Err(SearchError::CircuitOpen(REMOTE_SOURCE));
        };

        let result = self.inner.fetch_page(query).await;
        match &result {
            Ok(_) => permit.record_success(),
            Err(_) => permit.record_failure(),
        }
        result
    }
}

#[async_trait]
impl RemoteSource for GuardedRemoteSource {
    async fn fetch_page(&self, query: &SearchQuery) -> Result<RemotePage, SearchError> {
        if let Some(page) = self.cache.get(query).await {
            return Ok(page);
        }

        match self.call_through_breaker(query).await {
            Ok(page) => {
                self.cache.insert(query.clone(), page.clone()).await;
                Ok(page)
            }
            Err(e) => match self.policy {
                RemoteFailurePolicy::EmptyPage => {
                    warn!(error = %e, "Remote search failed; falling back to an empty page");
                    Ok(RemotePage::empty())
                }
                RemoteFailurePolicy::Error => {
                    error!(error = %e, "Remote search failed");
                    Err(SearchError::UpstreamUnavailable(e.to_string()))
                }
            },
        }
    }
}

//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup: one HTTP client, the two upstream adapters, and
//! the guard around the remote search.

use crate::config::AppConfig;
use moviesearch::{
    breaker::CircuitBreaker,
    cache::PageCache,
    providers::{
        build_http_client, GuardedRemoteSource, HttpLocalSource, HttpRemoteSource, REMOTE_SOURCE,
    },
    MovieAggregator, MovieAggregatorBuilder,
};
use std::{sync::Arc, time::Duration};
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<MovieAggregator>,
}

/// Builds the shared application state from the configuration.
///
/// The `reqwest::Client` is created once here and handed to both adapters.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let client = build_http_client()?;

    let local_source = HttpLocalSource::new(
        client.clone(),
        config.local.base_url.clone(),
        config.local.timeout(),
    );
    let remote_source = HttpRemoteSource::new(
        client,
        config.remote.base_url.clone(),
        config.remote.api_key.clone(),
        config.remote.timeout(),
    );
    let guarded_remote = GuardedRemoteSource::new(
        Box::new(remote_source),
        PageCache::new(
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.max_entries,
        ),
        CircuitBreaker::new(
            REMOTE_SOURCE,
            config.circuit_breaker.failure_threshold,
            Duration::from_secs(config.circuit_breaker.open_secs),
        ),
        config.remote.on_failure,
    );

    let aggregator = MovieAggregatorBuilder::new()
        .local_source(Box::new(local_source))
        .remote_source(Box::new(guarded_remote))
        .build()?;

    info!(
        local = %config.local.base_url,
        remote = %config.remote.base_url,
        on_failure = ?config.remote.on_failure,
        "Movie aggregator ready"
    );

    Ok(AppState {
        aggregator: Arc::new(aggregator),
    })
}

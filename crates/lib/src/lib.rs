//! # Movie Search Aggregation
//!
//! This crate merges a remote movie search with a local movie collection. A
//! `MovieAggregator` queries both sources concurrently and returns the remote
//! page with every item flagged as `saved` when it already exists locally.
//!
//! The HTTP adapters for both sources live in [`providers`], together with the
//! guard (cache, circuit breaker, failure policy) placed around the remote one.

pub mod aggregator;
pub mod breaker;
pub mod cache;
pub mod errors;
pub mod mapper;
pub mod providers;
pub mod types;
pub mod validation;

pub use aggregator::{MovieAggregator, MovieAggregatorBuilder};
pub use errors::SearchError;
pub use types::{
    AggregateResponse, EnrichedItem, LocalIdentifierSet, RemoteItem, RemotePage, SearchQuery,
};

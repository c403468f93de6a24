pub mod guarded;
pub mod local;
pub mod remote;

use crate::{
    errors::SearchError,
    types::{LocalIdentifierSet, RemotePage, SearchQuery},
};
use async_trait::async_trait;
use dyn_clone::DynClone;
use reqwest::Client as ReqwestClient;
use std::fmt::Debug;

pub use guarded::{GuardedRemoteSource, RemoteFailurePolicy};
pub use local::HttpLocalSource;
pub use remote::HttpRemoteSource;

/// Name used for the local movie collection in logs and errors.
pub const LOCAL_SOURCE: &str = "local";
/// Name used for the remote search source in logs and errors.
pub const REMOTE_SOURCE: &str = "remote";

/// A source of identifiers for movies already saved locally.
///
/// Implementations absorb their own failures: a broken local source yields an
/// empty set, never an error, so a search can still be served without the
/// `saved` annotation.
#[async_trait]
pub trait LocalSource: Send + Sync + Debug + DynClone {
    async fn fetch_ids(&self, title: &str, include_adult: bool) -> LocalIdentifierSet;
}

dyn_clone::clone_trait_object!(LocalSource);

/// A paginated remote movie search.
#[async_trait]
pub trait RemoteSource: Send + Sync + Debug + DynClone {
    /// Fetches one page of results for `query`.
    async fn fetch_page(&self, query: &SearchQuery) -> Result<RemotePage, SearchError>;
}

dyn_clone::clone_trait_object!(RemoteSource);

/// Builds the HTTP client shared by both upstream adapters.
///
/// `reqwest::Client` pools connections internally and is cheap to clone, so a
/// single instance is created at startup and handed to every adapter.
pub fn build_http_client() -> Result<ReqwestClient, SearchError> {
    ReqwestClient::builder()
        .build()
        .map_err(SearchError::ReqwestClientBuild)
}

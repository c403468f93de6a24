//! # Shared Test Helpers
//!
//! Programmable stand-ins for the local and remote sources, plus fixtures for
//! remote movie records. Both mocks record every call they receive so tests
//! can assert on what the aggregator dispatched.

use async_trait::async_trait;
use moviesearch::{
    providers::{LocalSource, RemoteSource, REMOTE_SOURCE},
    LocalIdentifierSet, RemotePage, SearchError, SearchQuery,
};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

/// Initialises a compact tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .try_init();
}

/// A remote movie record in the remote source's wire format.
pub fn movie_record(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "adult": false,
        "backdrop_path": format!("/backdrop_{id}.jpg"),
        "genre_ids": [28, 878, 12],
        "original_language": "en",
        "original_title": title,
        "overview": format!("Overview of {title}"),
        "popularity": 83.952,
        "poster_path": format!("/poster_{id}.jpg"),
        "release_date": "2010-07-15",
        "title": title,
        "video": false,
        "vote_average": 8.369
    })
}

/// A remote page holding `records`, with the given pagination metadata.
pub fn remote_page(
    records: Vec<Value>,
    page: i64,
    total_pages: i64,
    total_results: i64,
) -> RemotePage {
    RemotePage {
        records,
        page,
        total_pages,
        total_results,
    }
}

// --- Mock Local Source ---

#[derive(Clone, Debug, Default)]
pub struct MockLocalSource {
    ids: Arc<Mutex<LocalIdentifierSet>>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<(String, bool)>>>,
    completed: Arc<AtomicUsize>,
}

impl MockLocalSource {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: Arc::new(Mutex::new(ids.into_iter().collect())),
            ..Default::default()
        }
    }

    /// Delays every response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replaces the identifiers returned from now on.
    pub fn set_ids(&self, ids: impl IntoIterator<Item = i64>) {
        *self.ids.lock().unwrap() = ids.into_iter().collect();
    }

    pub fn get_calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls that ran to completion (were not dropped mid-delay).
    pub fn completed_calls(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalSource for MockLocalSource {
    async fn fetch_ids(&self, title: &str, include_adult: bool) -> LocalIdentifierSet {
        self.calls
            .lock()
            .unwrap()
            .push((title.to_string(), include_adult));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.ids.lock().unwrap().clone()
    }
}

// --- Mock Remote Source ---

/// What the mock remote source answers with.
#[derive(Clone, Debug)]
pub enum RemoteBehaviour {
    Page(RemotePage),
    /// Fails with a 503 upstream status carrying this message.
    Fail(String),
    /// Fails the way a guarded source configured to surface errors does.
    Unavailable(String),
}

#[derive(Clone, Debug)]
pub struct MockRemoteSource {
    behaviour: Arc<Mutex<RemoteBehaviour>>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<SearchQuery>>>,
    completed: Arc<AtomicUsize>,
}

impl MockRemoteSource {
    pub fn new(behaviour: RemoteBehaviour) -> Self {
        Self {
            behaviour: Arc::new(Mutex::new(behaviour)),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_page(page: RemotePage) -> Self {
        Self::new(RemoteBehaviour::Page(page))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_behaviour(&self, behaviour: RemoteBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    pub fn get_calls(&self) -> Vec<SearchQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn completed_calls(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSource for MockRemoteSource {
    async fn fetch_page(&self, query: &SearchQuery) -> Result<RemotePage, SearchError> {
        self.calls.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        let behaviour = self.behaviour.lock().unwrap().clone();
        match behaviour {
            RemoteBehaviour::Page(page) => Ok(page),
            RemoteBehaviour::Fail(message) => Err(SearchError::UpstreamStatus {
                source_name: REMOTE_SOURCE,
                status: 503,
                message,
            }),
            RemoteBehaviour::Unavailable(message) => Err(SearchError::UpstreamUnavailable(message)),
        }
    }
}

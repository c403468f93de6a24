//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port, wired to two
//! `httpmock` servers that stand in for the local movie service and the
//! remote movie search.

// Not every test binary uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use moviesearch::providers::RemoteFailurePolicy;
use moviesearch_server::{
    config::{AppConfig, CacheConfig, CircuitBreakerConfig, LocalConfig, RemoteConfig},
    router::create_router,
    state::build_app_state,
};
use reqwest::Client;
use serde_json::Value;
use std::net::SocketAddr;
use tokio::{net::TcpListener, task::JoinHandle};

pub const LOCAL_PATH: &str = "/api/v1/movies";
pub const REMOTE_PATH: &str = "/3/search/movie";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub local_server: MockServer,
    pub remote_server: MockServer,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with the default test configuration.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Spawns the server after letting the caller adjust the configuration.
    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        moviesearch_test_utils::init_tracing();

        let local_server = MockServer::start_async().await;
        let remote_server = MockServer::start_async().await;

        let mut config = AppConfig {
            port: 0,
            local: LocalConfig {
                base_url: local_server.url(LOCAL_PATH),
                timeout_secs: 2,
            },
            remote: RemoteConfig {
                base_url: remote_server.url(REMOTE_PATH),
                api_key: Some("test-api-key".to_string()),
                timeout_secs: 2,
                on_failure: RemoteFailurePolicy::EmptyPage,
            },
            cache: CacheConfig {
                ttl_secs: 600,
                max_entries: 100,
            },
            circuit_breaker: CircuitBreakerConfig {
                failure_threshold: 5,
                open_secs: 30,
            },
        };
        customize(&mut config);

        let app_state = build_app_state(config)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            local_server,
            remote_server,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Sends `GET /search` with the given query string pairs.
    pub async fn search(&self, params: &[(&str, &str)]) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}/search", self.address))
            .query(params)
            .send()
            .await?)
    }

    /// Searches for `title` and returns the decoded body.
    pub async fn search_title(&self, title: String) -> Result<Value> {
        let response = self.search(&[("query", title.as_str())]).await?;
        Ok(response.error_for_status()?.json().await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The server task may already be gone.
            let _ = tx.send(());
        }
    }
}

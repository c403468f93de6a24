use super::{RemoteSource, REMOTE_SOURCE};
use crate::{
    errors::SearchError,
    types::{RemotePage, SearchQuery, DEFAULT_LANGUAGE},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

// --- TMDB-style error body ---

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    #[serde(default)]
    status_code: Option<i64>,
    #[serde(default)]
    status_message: Option<String>,
}

// --- Remote search adapter ---

/// Calls the remote movie search endpoint for one page of results.
#[derive(Clone, Debug)]
pub struct HttpRemoteSource {
    client: ReqwestClient,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpRemoteSource {
    /// Creates a new `HttpRemoteSource` on top of a shared client.
    pub fn new(
        client: ReqwestClient,
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.is_empty()),
            timeout,
        }
    }

    /// Builds the outbound query string.
    ///
    /// Optional filters are only included when present, and a non-positive
    /// page is sent as page 1.
    pub fn query_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        let language = if query.language.trim().is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            query.language.clone()
        };

        let mut params = vec![
            ("query", query.title.clone()),
            ("include_adult", query.include_adult.to_string()),
            ("language", language),
        ];
        if let Some(year) = &query.primary_release_year {
            params.push(("primary_release_year", year.clone()));
        }
        params.push(("page", query.page.max(1).to_string()));
        if let Some(region) = &query.region {
            params.push(("region", region.clone()));
        }
        if let Some(year) = &query.year {
            params.push(("year", year.clone()));
        }
        params
    }

    fn error_message(body: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(ApiErrorBody {
                status_code: Some(code),
                status_message: Some(message),
            }) => format!("{message} (status_code={code})"),
            _ => body.to_string(),
        }
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch_page(&self, query: &SearchQuery) -> Result<RemotePage, SearchError> {
        let params = Self::query_params(query);
        info!(
            url = %self.base_url,
            query = %query.title,
            page = query.page,
            "Fetching movies from remote search"
        );
        debug!(?params, "Remote search parameters");

        let mut request = self
            .client
            .get(&self.base_url)
            .query(&params)
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|error| SearchError::Request {
            source_name: REMOTE_SOURCE,
            error,
        })?;

        let status = response.status();
        info!(status = status.as_u16(), "Remote search responded");
        let body = response
            .text()
            .await
            .map_err(|error| SearchError::Request {
                source_name: REMOTE_SOURCE,
                error,
            })?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "Error during remote search call");
            return Err(SearchError::UpstreamStatus {
                source_name: REMOTE_SOURCE,
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        let page: RemotePage =
            serde_json::from_str(&body).map_err(|error| SearchError::Deserialization {
                source_name: REMOTE_SOURCE,
                error,
            })?;

        debug!(
            records = page.records.len(),
            total_results = page.total_results,
            "Remote search page decoded"
        );
        Ok(page)
    }
}

use super::{LocalSource, LOCAL_SOURCE};
use crate::{errors::SearchError, types::LocalIdentifierSet};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, error, info};

/// Looks up saved movie identifiers in the local movie service.
///
/// Issues `GET <base_url>?query=<title>&includeAdult=<bool>` and expects a JSON
/// array of numeric identifiers in return.
#[derive(Clone, Debug)]
pub struct HttpLocalSource {
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl HttpLocalSource {
    /// Creates a new `HttpLocalSource` on top of a shared client.
    pub fn new(client: ReqwestClient, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    async fn request_ids(
        &self,
        title: &str,
        include_adult: bool,
    ) -> Result<LocalIdentifierSet, SearchError> {
        info!(url = %self.base_url, query = title, include_adult, "Fetching saved movie ids");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("query", title.to_string()),
                ("includeAdult", include_adult.to_string()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|error| SearchError::Request {
                source_name: LOCAL_SOURCE,
                error,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| SearchError::Request {
                source_name: LOCAL_SOURCE,
                error,
            })?;

        if !status.is_success() {
            return Err(SearchError::UpstreamStatus {
                source_name: LOCAL_SOURCE,
                status: status.as_u16(),
                message: body,
            });
        }

        let ids: Vec<i64> =
            serde_json::from_str(&body).map_err(|error| SearchError::Deserialization {
                source_name: LOCAL_SOURCE,
                error,
            })?;

        Ok(ids.into_iter().collect())
    }
}

#[async_trait]
impl LocalSource for HttpLocalSource {
    async fn fetch_ids(&self, title: &str, include_adult: bool) -> LocalIdentifierSet {
        match self.request_ids(title, include_adult).await {
            Ok(ids) => {
                debug!(count = ids.len(), "Local source returned saved ids");
                ids
            }
            Err(e) => {
                error!(error = %e, "Local source failed; continuing without saved flags");
                LocalIdentifierSet::new()
            }
        }
    }
}

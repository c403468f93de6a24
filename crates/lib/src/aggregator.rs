use crate::{
    errors::SearchError,
    mapper::enrich_records,
    providers::{LocalSource, RemoteSource, LOCAL_SOURCE, REMOTE_SOURCE},
    types::{AggregateResponse, SearchQuery},
    validation::validate_query,
};
use tracing::{debug, error, info};

/// Merges a remote search page with the local collection.
///
/// Both upstreams are queried concurrently for every request; the remote page
/// decides the shape of the response and the local identifiers decide each
/// item's `saved` flag.
#[derive(Clone, Debug)]
pub struct MovieAggregator {
    pub local_source: Box<dyn LocalSource>,
    pub remote_source: Box<dyn RemoteSource>,
}

/// A builder for creating `MovieAggregator` instances.
#[derive(Default)]
pub struct MovieAggregatorBuilder {
    local_source: Option<Box<dyn LocalSource>>,
    remote_source: Option<Box<dyn RemoteSource>>,
}

impl MovieAggregatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local_source(mut self, source: Box<dyn LocalSource>) -> Self {
        self.local_source = Some(source);
        self
    }

    pub fn remote_source(mut self, source: Box<dyn RemoteSource>) -> Self {
        self.remote_source = Some(source);
        self
    }

    /// Builds the `MovieAggregator`, failing if either source is missing.
    pub fn build(self) -> Result<MovieAggregator, SearchError> {
        Ok(MovieAggregator {
            local_source: self
                .local_source
                .ok_or(SearchError::MissingSource(LOCAL_SOURCE))?,
            remote_source: self
                .remote_source
                .ok_or(SearchError::MissingSource(REMOTE_SOURCE))?,
        })
    }
}

impl MovieAggregator {
    /// Runs one search and returns the enriched page.
    ///
    /// Blank filters are treated as absent, and the query is validated before
    /// either upstream is contacted. Local failures only cost the `saved`
    /// flags; a remote failure either arrives here as an empty page or is
    /// surfaced as `UpstreamUnavailable`.
    pub async fn aggregate(&self, query: &SearchQuery) -> Result<AggregateResponse, SearchError> {
        let query = query.clone().normalized();
        validate_query(&query)?;
        info!(
            query = %query.title,
            page = query.page,
            include_adult = query.include_adult,
            "Aggregating movie search"
        );

        let (remote_result, local_ids) = tokio::join!(
            self.remote_source.fetch_page(&query),
            self.local_source
                .fetch_ids(&query.title, query.include_adult)
        );

        let remote_page = match remote_result {
            Ok(page) => page,
            Err(e @ SearchError::UpstreamUnavailable(_)) => return Err(e),
            Err(e) => {
                error!(error = %e, "Remote search failed during aggregation");
                return Err(SearchError::UpstreamUnavailable(e.to_string()));
            }
        };

        let result = if remote_page.is_empty() {
            debug!("Remote search returned no records");
            Vec::new()
        } else {
            enrich_records(&remote_page.records, &local_ids)
        };

        let response = AggregateResponse {
            result,
            page: remote_page.page,
            total_pages: remote_page.total_pages,
            total_results: remote_page.total_results,
        };
        info!(
            items = response.result.len(),
            saved = response.saved_count(),
            total_results = response.total_results,
            "Aggregation complete"
        );
        Ok(response)
    }
}

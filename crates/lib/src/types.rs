use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// The language sent upstream when the caller does not provide one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Identifiers of movies already saved in the local collection for one query.
///
/// Only used for membership tests; it is never part of a response.
pub type LocalIdentifierSet = HashSet<i64>;

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_page() -> i64 {
    1
}

/// Deserializes an explicit `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A single search request, as accepted by the aggregator.
///
/// Field names on the wire follow the inbound query string
/// (`query`, `includeAdult`, `primaryReleaseYear`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(rename = "query", default)]
    pub title: String,
    #[serde(default)]
    pub include_adult: bool,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub primary_release_year: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            title: String::new(),
            include_adult: false,
            language: default_language(),
            primary_release_year: None,
            page: default_page(),
            region: None,
            year: None,
        }
    }
}

impl SearchQuery {
    /// Creates a query for `title` with every other field at its default.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn primary_release_year(mut self, year: impl Into<String>) -> Self {
        self.primary_release_year = Some(year.into());
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Treats blank optional filters as absent and a blank language as the default.
    pub fn normalized(mut self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        if self.language.trim().is_empty() {
            self.language = default_language();
        }
        self.primary_release_year = non_blank(self.primary_release_year);
        self.region = non_blank(self.region);
        self.year = non_blank(self.year);
        self
    }
}

/// One movie as returned by the remote search source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItem {
    pub tmdb_id: i64,
    pub adult: bool,
    pub backdrop_path: Option<String>,
    pub genre_ids: Vec<i64>,
    pub original_language: String,
    pub original_title: String,
    pub overview: String,
    pub popularity: f64,
    pub poster_path: Option<String>,
    pub release_date: String,
    pub title: String,
    pub video: bool,
    pub vote_average: f64,
}

/// A `RemoteItem` annotated with whether it is already saved locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: RemoteItem,
    pub saved: bool,
}

/// One page of results from the remote search source.
///
/// Records are kept raw so that a single malformed entry can be dropped
/// during enrichment without discarding the rest of the page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RemotePage {
    #[serde(rename = "results", default, deserialize_with = "null_as_default")]
    pub records: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_results: i64,
}

impl RemotePage {
    /// The page used in place of a failed remote call: no records, all counts zero.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The single response produced for one aggregation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    pub result: Vec<EnrichedItem>,
    pub page: i64,
    pub total_pages: i64,
    pub total_results: i64,
}

impl AggregateResponse {
    /// Number of items flagged as already saved locally.
    pub fn saved_count(&self) -> usize {
        self.result.iter().filter(|item| item.saved).count()
    }
}

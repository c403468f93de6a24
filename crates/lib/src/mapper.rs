//! Maps raw remote records into `EnrichedItem`s.

use crate::types::{null_as_default, EnrichedItem, LocalIdentifierSet, RemoteItem};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Why a single remote record could not be mapped.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("malformed movie record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("movie {tmdb_id} has a negative {field}")]
    NegativeScore { tmdb_id: i64, field: &'static str },
}

/// The remote source's movie record (TMDB field names).
///
/// Only `id` and `title` are required; any other field may be missing or
/// `null`.
#[derive(Deserialize)]
struct MovieRecord {
    id: i64,
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    adult: bool,
    backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    genre_ids: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    original_language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    original_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    popularity: f64,
    poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    video: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    vote_average: f64,
}

impl TryFrom<MovieRecord> for RemoteItem {
    type Error = MappingError;

    fn try_from(record: MovieRecord) -> Result<Self, Self::Error> {
        if record.popularity < 0.0 {
            return Err(MappingError::NegativeScore {
                tmdb_id: record.id,
                field: "popularity",
            });
        }
        if record.vote_average < 0.0 {
            return Err(MappingError::NegativeScore {
                tmdb_id: record.id,
                field: "vote_average",
            });
        }

        Ok(RemoteItem {
            tmdb_id: record.id,
            adult: record.adult,
            backdrop_path: record.backdrop_path,
            genre_ids: record.genre_ids,
            original_language: record.original_language,
            original_title: record.original_title,
            overview: record.overview,
            popularity: record.popularity,
            poster_path: record.poster_path,
            release_date: record.release_date,
            title: record.title,
            video: record.video,
            vote_average: record.vote_average,
        })
    }
}

/// Parses one raw remote record into a `RemoteItem`.
pub fn map_remote_record(record: &Value) -> Result<RemoteItem, MappingError> {
    let parsed = MovieRecord::deserialize(record)?;
    RemoteItem::try_from(parsed)
}

/// Annotates `item` with its membership in `local_ids`.
pub fn enrich(item: RemoteItem, local_ids: &LocalIdentifierSet) -> EnrichedItem {
    let saved = local_ids.contains(&item.tmdb_id);
    EnrichedItem { item, saved }
}

/// Maps and enriches every record in order, dropping the ones that fail to map.
pub fn enrich_records(records: &[Value], local_ids: &LocalIdentifierSet) -> Vec<EnrichedItem> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match map_remote_record(record) {
            Ok(item) => Some(enrich(item, local_ids)),
            Err(e) => {
                warn!(index, error = %e, "Skipping remote record that could not be mapped");
                None
            }
        })
        .collect()
}

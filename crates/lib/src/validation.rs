//! # Query Validation
//!
//! Checks a `SearchQuery` before any upstream is contacted. Optional filters
//! are either absent or must match their pattern; a bad value is rejected
//! with a message naming the expected format.

use crate::{errors::SearchError, types::SearchQuery};
use regex::Regex;

const LANGUAGE_PATTERN: &str = r"^[a-z]{2}-[A-Z]{2}$";
const YEAR_PATTERN: &str = r"^\d{4}$";
const REGION_PATTERN: &str = r"^[A-Z]{2}$";

/// Validates every field of `query`, returning the first violation found.
pub fn validate_query(query: &SearchQuery) -> Result<(), SearchError> {
    if query.title.trim().is_empty() {
        return Err(SearchError::Validation("Query cannot be blank".to_string()));
    }

    if !Regex::new(LANGUAGE_PATTERN)?.is_match(&query.language) {
        return Err(SearchError::Validation(
            "Invalid language format. Expected 'xx-XX'.".to_string(),
        ));
    }

    if query.page < 1 {
        return Err(SearchError::Validation("Page must be at least 1".to_string()));
    }

    let year = Regex::new(YEAR_PATTERN)?;
    for (name, value) in [
        ("primaryReleaseYear", &query.primary_release_year),
        ("year", &query.year),
    ] {
        if let Some(value) = value {
            if !year.is_match(value) {
                return Err(SearchError::Validation(format!(
                    "Invalid year format for '{name}'. Expected 'YYYY'."
                )));
            }
        }
    }

    if let Some(region) = &query.region {
        if !Regex::new(REGION_PATTERN)?.is_match(region) {
            return Err(SearchError::Validation(
                "Region must be a 2-letter country code.".to_string(),
            ));
        }
    }

    Ok(())
}

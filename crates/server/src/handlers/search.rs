//! # Search Handler
//!
//! Serves `GET /search`: parses the query string, hands it to the aggregator
//! and returns the enriched page.

use super::{AppError, AppState};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use moviesearch::{AggregateResponse, SearchQuery};
use tracing::info;

pub async fn search_handler(
    State(app_state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<AggregateResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let query = query.normalized();
    info!("Received search request: {:?}", query);

    let response = app_state.aggregator.aggregate(&query).await?;
    Ok(Json(response))
}

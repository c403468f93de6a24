use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use moviesearch::SearchError;
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// This enum encapsulates the errors a request can end in, so they can be
/// converted into appropriate HTTP responses.
pub enum AppError {
    /// Errors originating from the `moviesearch` library.
    Search(SearchError),
    /// The request itself could not be parsed (e.g. a non-numeric page).
    BadRequest(String),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        AppError::Search(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Search(err) => match err {
                SearchError::Validation(message) => {
                    warn!("Rejected search request: {message}");
                    (StatusCode::BAD_REQUEST, message)
                }
                err if err.is_upstream() => {
                    error!("Upstream error: {:?}", err);
                    (StatusCode::BAD_GATEWAY, err.to_string())
                }
                err => {
                    error!("SearchError: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                    )
                }
            },
            AppError::BadRequest(message) => {
                warn!("Malformed search request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
        };

        let body = Json(json!({
            "error": error_message,
            "time": Utc::now().to_rfc3339(),
        }));

        (status_code, body).into_response()
    }
}

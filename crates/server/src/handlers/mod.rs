//! # Route Handlers
//!
//! The Axum handlers for the `moviesearch-server`, split by concern and
//! re-exported for the router.

pub mod general;
pub mod search;

pub use general::*;
pub use search::*;

pub use crate::{errors::AppError, state::AppState};

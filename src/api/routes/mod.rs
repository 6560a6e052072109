//! Route handlers for the REST API
//!
//! - [`stories`] - Best-stories ranking
//! - [`system`] - Health, OpenAPI

use serde::{Deserialize, Serialize};

mod stories;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use stories::*;
pub use system::*;

/// Query parameters for GET /stories/best
#[derive(Debug, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BestStoriesQuery {
    /// Number of stories to return, 1 to 100 (default: 10)
    pub limit: Option<i64>,
}

/// Response for GET /health
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// Always "ok" when the process is serving
    pub status: String,
    /// Crate version
    pub version: String,
}

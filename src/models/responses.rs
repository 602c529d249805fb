use serde::Serialize;
use crate::models::domain::{ProductAggregate, SearchOrigin};

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub origin: SearchOrigin,
    /// Number of case records behind the aggregates.
    #[serde(rename = "casesConsidered")]
    pub cases_considered: usize,
    pub products: Vec<ProductAggregate>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Total records in the case repository (0 when the store is unreachable).
    pub cases: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

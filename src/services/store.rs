use async_trait::async_trait;
use thiserror::Error;

use crate::models::CaseRecord;

/// Errors surfaced by a case repository backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// The case repository as the pipeline sees it.
///
/// Retrieval is substring containment across disease label / content /
/// product name, ordered by recency; no transactional guarantees are assumed
/// and a write may become visible to reads at any later point.
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Wide-net retrieval for one search term, newest first.
    async fn search_cases(&self, term: &str) -> Result<Vec<CaseRecord>, StoreError>;

    /// Insert a batch of case-shaped records (used by the fire-and-forget
    /// persistence of synthesized knowledge).
    async fn insert_cases(&self, records: Vec<CaseRecord>) -> Result<(), StoreError>;

    /// Total record count, for health reporting.
    async fn count_cases(&self) -> Result<u64, StoreError>;

    /// Backend liveness probe for the health endpoint.
    async fn health_check(&self) -> Result<bool, StoreError>;
}

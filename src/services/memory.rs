use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::CaseRecord;
use crate::services::store::{CaseStore, StoreError};

/// In-memory case repository.
///
/// Used by the integration tests and as the startup fallback when no
/// database URL is configured, so the service can still answer queries from
/// seeded or synthesized data.
#[derive(Default)]
pub struct MemoryStore {
    cases: RwLock<Vec<CaseRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, records: Vec<CaseRecord>) {
        self.cases.write().await.extend(records);
    }
}

#[async_trait]
impl CaseStore for MemoryStore {
    async fn search_cases(&self, term: &str) -> Result<Vec<CaseRecord>, StoreError> {
        let term = term.to_lowercase();
        let cases = self.cases.read().await;

        let mut matches: Vec<CaseRecord> = cases
            .iter()
            .filter(|case| {
                let disease = case.disease_type.to_lowercase();
                let content = case.content.to_lowercase();
                let product = case
                    .product_name
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase();

                let forward =
                    disease.contains(&term) || content.contains(&term) || product.contains(&term);
                let reverse = disease.chars().count() > 1 && term.contains(&disease);

                forward || reverse
            })
            .cloned()
            .collect();

        // Newest first, matching the repository contract.
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matches)
    }

    async fn insert_cases(&self, records: Vec<CaseRecord>) -> Result<(), StoreError> {
        self.cases.write().await.extend(records);
        Ok(())
    }

    async fn count_cases(&self) -> Result<u64, StoreError> {
        Ok(self.cases.read().await.len() as u64)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

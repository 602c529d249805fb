//! UWCase - cascading case-search service for the non-standard-body
//! underwriting library
//!
//! Turns a free-text medical condition into a ranked list of insurance
//! products with underwriting-outcome evidence: synonym expansion, local
//! case-repository scoring, and a web-search + summarization fallback chain
//! whose untrusted output is sanitized, aggregated and persisted in the
//! background.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{normalize, rank_cases, sanitize, PipelineOptions, RankingPolicy, SearchPipeline, SynonymTable};
pub use crate::models::{CaseRecord, ProductAggregate, SearchOrigin, SortCriterion, Verdict};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let table = SynonymTable::builtin();
        let normalized = normalize("thyroid nodule", &table);
        assert_eq!(normalized.primary_token(), Some("thyroid"));
    }
}

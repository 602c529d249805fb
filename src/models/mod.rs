// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CaseRecord, ProductAggregate, ProductSuggestion, ScoredCase, SearchOrigin, SortCriterion, Verdict};
pub use requests::SearchRequest;
pub use responses::{ErrorResponse, HealthResponse, SearchResponse};

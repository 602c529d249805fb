// Core pipeline exports
pub mod aggregate;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod sanitizer;
pub mod sort;

pub use aggregate::{aggregate, RankingPolicy, UNKNOWN_PRODUCT};
pub use matcher::rank_cases;
pub use normalizer::{normalize, NormalizedQuery, SynonymTable};
pub use pipeline::{PipelineError, PipelineOptions, SearchOutcome, SearchPipeline};
pub use sanitizer::{sanitize, SanitizeError};
pub use sort::{parse_criterion, sort_products};

// Service exports
pub mod memory;
pub mod postgres;
pub mod store;
pub mod summarizer;
pub mod websearch;

pub use memory::MemoryStore;
pub use postgres::PgCaseStore;
pub use store::{CaseStore, StoreError};
pub use summarizer::{ChatSummarizer, Summarizer, SummarizerError};
pub use websearch::{SearchProviderError, TavilyClient, WebSearch};

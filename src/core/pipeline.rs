use std::sync::Arc;

use chrono::{Datelike, Utc};
use thiserror::Error;

use crate::core::aggregate::{aggregate, RankingPolicy};
use crate::core::matcher::rank_cases;
use crate::core::normalizer::{normalize, NormalizedQuery, SynonymTable};
use crate::core::sanitizer::{sanitize, SanitizeError};
use crate::core::sort::sort_products;
use crate::models::{CaseRecord, ProductAggregate, SearchOrigin, SortCriterion, Verdict};
use crate::services::{CaseStore, Summarizer, WebSearch};

/// The one pipeline error that crosses the boundary to the caller.
///
/// Transport failures, malformed summarization output and empty result sets
/// are all absorbed internally: they degrade to the fallback record or an
/// empty result, never to an error response.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("search collaborator not configured: {0}")]
    NotConfigured(&'static str),
}

/// Failure modes internal to the remote chain.
#[derive(Debug, Error)]
enum RemoteError {
    #[error("collaborator not configured: {0}")]
    NotConfigured(&'static str),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("web search returned no usable snippets")]
    EmptySearch,

    #[error("summarization output rejected: {0}")]
    Malformed(SanitizeError),
}

/// Tunable policy values for the cascade.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Local hits below this count trigger the remote chain. The original
    /// variants disagree on the value ("any hit" vs "count below N"), so it
    /// is configuration, not a constant.
    pub min_local_results: usize,
    /// Result-count cap passed to the web-search collaborator.
    pub max_web_results: u8,
    /// Cap on third-party text forwarded to the summarizer, in chars.
    pub snippet_char_budget: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            min_local_results: 1,
            max_web_results: 5,
            snippet_char_budget: 4000,
        }
    }
}

/// What a pipeline run produced.
#[derive(Debug)]
pub struct SearchOutcome {
    pub origin: SearchOrigin,
    /// Flat case records behind the aggregates.
    pub cases_considered: usize,
    pub products: Vec<ProductAggregate>,
}

impl SearchOutcome {
    fn empty() -> Self {
        Self {
            origin: SearchOrigin::Empty,
            cases_considered: 0,
            products: Vec::new(),
        }
    }
}

/// Cascading search orchestrator.
///
/// One execution per query: Normalize -> LocalSearch -> (RemoteSearch ->
/// Summarize -> SanitizeAndValidate -> PersistAsync) -> Aggregate, with a
/// fallback terminal state guaranteeing the caller always receives at least
/// one actionable row. Stateless across requests; the synonym table and
/// ranking policy are shared read-only.
pub struct SearchPipeline {
    store: Arc<dyn CaseStore>,
    web_search: Option<Arc<dyn WebSearch>>,
    summarizer: Option<Arc<dyn Summarizer>>,
    synonyms: Arc<SynonymTable>,
    policy: Arc<RankingPolicy>,
    options: PipelineOptions,
}

impl SearchPipeline {
    pub fn new(
        store: Arc<dyn CaseStore>,
        synonyms: Arc<SynonymTable>,
        policy: Arc<RankingPolicy>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            store,
            web_search: None,
            summarizer: None,
            synonyms,
            policy,
            options,
        }
    }

    pub fn with_web_search(mut self, web_search: Arc<dyn WebSearch>) -> Self {
        self.web_search = Some(web_search);
        self
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Run the full cascade for one query.
    pub async fn run(
        &self,
        query: &str,
        criterion: SortCriterion,
    ) -> Result<SearchOutcome, PipelineError> {
        // Normalize
        let normalized = normalize(query, &self.synonyms);
        let Some(primary) = normalized.primary_token() else {
            return Ok(SearchOutcome::empty());
        };

        // LocalSearch. A repository read error is not fatal: it is logged
        // and treated as zero rows, the normal remote-fallback trigger.
        let candidates = match self.store.search_cases(primary).await {
            Ok(cases) => cases,
            Err(e) => {
                tracing::warn!("Repository read failed, treating as empty: {}", e);
                Vec::new()
            }
        };

        let ranked = rank_cases(&normalized.tokens, candidates);
        if ranked.len() >= self.options.min_local_results {
            tracing::info!(
                "Local search satisfied '{}' with {} cases",
                normalized.original,
                ranked.len()
            );
            let cases: Vec<CaseRecord> = ranked.into_iter().map(|c| c.record).collect();
            return Ok(self.finish(SearchOrigin::Local, cases, criterion));
        }

        // RemoteSearch -> Summarize -> SanitizeAndValidate -> PersistAsync
        match self.remote_chain(&normalized).await {
            Ok(cases) => Ok(self.finish(SearchOrigin::Synthesized, cases, criterion)),
            Err(RemoteError::NotConfigured(which)) => Err(PipelineError::NotConfigured(which)),
            Err(e) => {
                tracing::warn!(
                    "Remote chain failed for '{}', falling back to manual review: {}",
                    normalized.original,
                    e
                );
                let fallback = vec![fallback_record(&normalized.original)];
                Ok(self.finish(SearchOrigin::Fallback, fallback, criterion))
            }
        }
    }

    /// The remote leg of the cascade. Every failure here short of missing
    /// configuration degrades to the fallback state in `run`.
    async fn remote_chain(&self, query: &NormalizedQuery) -> Result<Vec<CaseRecord>, RemoteError> {
        let web_search = self
            .web_search
            .as_ref()
            .ok_or(RemoteError::NotConfigured("web search"))?;
        let summarizer = self
            .summarizer
            .as_ref()
            .ok_or(RemoteError::NotConfigured("summarizer"))?;

        // Year hint biases the provider toward fresh underwriting policy.
        let web_query = format!("{} 投保 核保结论 {}", query.original, Utc::now().year());

        let snippets = web_search
            .search(&web_query, self.options.max_web_results)
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if snippets.is_empty() {
            return Err(RemoteError::EmptySearch);
        }

        let mut joined = snippets.join("\n");
        truncate_chars(&mut joined, self.options.snippet_char_budget);

        let raw = summarizer
            .summarize(&query.original, &joined)
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let suggestions = sanitize(&raw).map_err(RemoteError::Malformed)?;
        if suggestions.is_empty() {
            return Err(RemoteError::Malformed(SanitizeError::SchemaMismatch));
        }

        let now = Utc::now();
        let records: Vec<CaseRecord> = suggestions
            .into_iter()
            .map(|s| CaseRecord {
                disease_type: query.original.clone(),
                product_name: Some(s.product_name),
                company: s.company,
                verdict: s.verdict,
                content: s.content,
                summary: s.summary,
                created_at: now,
                source: "synthesized".to_string(),
            })
            .collect();

        // PersistAsync: fire-and-forget, at-most-effort. The response does
        // not wait and a write failure never reaches the caller.
        let store = Arc::clone(&self.store);
        let to_persist = records.clone();
        tokio::spawn(async move {
            if let Err(e) = store.insert_cases(to_persist).await {
                tracing::warn!("Background persistence of synthesized cases failed: {}", e);
            }
        });

        Ok(records)
    }

    /// Aggregate + Sort
    fn finish(
        &self,
        origin: SearchOrigin,
        cases: Vec<CaseRecord>,
        criterion: SortCriterion,
    ) -> SearchOutcome {
        let cases_considered = cases.len();
        let mut products = aggregate(cases, &self.policy);
        sort_products(&mut products, criterion);

        SearchOutcome {
            origin,
            cases_considered,
            products,
        }
    }
}

/// The single deterministic record substituted when every automated path
/// fails. Guarantees the caller still receives one actionable row.
fn fallback_record(disease: &str) -> CaseRecord {
    CaseRecord {
        disease_type: disease.to_string(),
        product_name: Some("人工核保通道".to_string()),
        company: None,
        verdict: Verdict::Manual,
        content: format!(
            "暂未找到与「{}」匹配的核保结论，已转交人工核保专家分析，请留意后续反馈。",
            disease
        ),
        summary: Some("转人工核保".to_string()),
        created_at: Utc::now(),
        source: "fallback".to_string(),
    }
}

/// Truncate in place to at most `budget` chars, on a char boundary.
fn truncate_chars(text: &mut String, budget: usize) {
    if let Some((idx, _)) = text.char_indices().nth(budget) {
        text.truncate(idx);
    }
}

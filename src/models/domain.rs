use serde::{Deserialize, Serialize};

/// Categorical underwriting outcome.
///
/// `Manual` covers every case where no automated verdict was reached.
/// Unknown values coming out of the summarization collaborator or the
/// repository must be coerced here via [`Verdict::from_loose`] — aggregation
/// divides by total count and must never silently skip records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Exclude,
    Reject,
    Manual,
}

impl Verdict {
    /// Parse a loosely-formatted verdict string, coercing anything
    /// unrecognized to `Manual`.
    pub fn from_loose(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "pass" => Verdict::Pass,
            "exclude" => Verdict::Exclude,
            "reject" => Verdict::Reject,
            _ => Verdict::Manual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Exclude => "exclude",
            Verdict::Reject => "reject",
            Verdict::Manual => "manual",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded or synthesized underwriting outcome for a disease/product pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "diseaseType")]
    pub disease_type: String,
    #[serde(rename = "productName", default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub verdict: Verdict,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Provenance tag: "用户分享", "synthesized", "fallback", ...
    pub source: String,
}

/// A case with the relevance score attached by the local matcher.
#[derive(Debug, Clone)]
pub struct ScoredCase {
    pub record: CaseRecord,
    /// Number of query tokens matched (>= 1 once score-0 rows are dropped).
    pub score: usize,
}

/// One product entry parsed out of the summarization collaborator's output.
///
/// Only name and verdict are required at the sanitizer boundary; everything
/// else defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSuggestion {
    #[serde(rename = "productName")]
    pub product_name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub verdict: Verdict,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Per-product rollup of case records, rebuilt for every search response.
#[derive(Debug, Clone, Serialize)]
pub struct ProductAggregate {
    pub name: String,
    pub company: Option<String>,
    /// Insertion order = repository return order.
    pub cases: Vec<CaseRecord>,
    #[serde(rename = "passCount")]
    pub pass_count: usize,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    #[serde(rename = "passRate")]
    pub pass_rate: f64,
    #[serde(rename = "leverageScore")]
    pub leverage_score: f64,
    #[serde(rename = "companyScore")]
    pub company_score: f64,
    #[serde(rename = "coverageScore")]
    pub coverage_score: f64,
}

/// Which branch of the cascade produced the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrigin {
    /// Repository matches were sufficient.
    Local,
    /// Web-search + summarization chain produced the result.
    Synthesized,
    /// Every automated path failed; single manual-review record.
    Fallback,
    /// The query normalized to nothing.
    Empty,
}

/// Selectable sort order for aggregated products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriterion {
    Recommend,
    Leverage,
    Coverage,
    Company,
}

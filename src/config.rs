use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub search: SearchProviderSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    /// Extra colloquial-term -> canonical-term mappings merged over the
    /// built-in synonym table.
    #[serde(default)]
    pub synonyms: HashMap<String, String>,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    /// Omitted in local/dev setups; the service then runs on the in-memory
    /// store instead of PostgreSQL.
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

/// Web-search collaborator (Tavily-compatible)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchProviderSettings {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
}

impl Default for SearchProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key: String::new(),
        }
    }
}

fn default_search_endpoint() -> String {
    "https://api.tavily.com".to_string()
}

/// Summarization collaborator (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: String::new(),
            model: default_llm_model(),
        }
    }
}

fn default_llm_endpoint() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_llm_model() -> String {
    "deepseek-chat".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    #[serde(default = "default_min_local_results")]
    pub min_local_results: usize,
    #[serde(default = "default_max_web_results")]
    pub max_web_results: u8,
    #[serde(default = "default_snippet_char_budget")]
    pub snippet_char_budget: usize,
    /// Timeout applied to both remote collaborators; a timeout degrades to
    /// the fallback path like any other transport failure.
    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            min_local_results: default_min_local_results(),
            max_web_results: default_max_web_results(),
            snippet_char_budget: default_snippet_char_budget(),
            remote_timeout_secs: default_remote_timeout_secs(),
        }
    }
}

fn default_min_local_results() -> usize { 1 }
fn default_max_web_results() -> u8 { 5 }
fn default_snippet_char_budget() -> usize { 4000 }
fn default_remote_timeout_secs() -> u64 { 30 }

/// Keyword sets and tier values behind the heuristic product scores.
/// Empty lists fall back to the built-in policy defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingSettings {
    #[serde(default)]
    pub inclusive_markers: Vec<String>,
    #[serde(default)]
    pub critical_markers: Vec<String>,
    #[serde(default)]
    pub major_insurers: Vec<String>,
    #[serde(default)]
    pub high_tier: Option<f64>,
    #[serde(default)]
    pub mid_tier: Option<f64>,
    #[serde(default)]
    pub low_tier: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with UWCASE__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g. UWCASE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("UWCASE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_well_known_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("UWCASE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Fold in the conventional environment variable names the deployment
/// environments already use, so credentials never have to live in TOML.
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(key) = env::var("TAVILY_API_KEY") {
        builder = builder.set_override("search.api_key", key)?;
    }
    if let Ok(key) = env::var("DEEPSEEK_API_KEY").or_else(|_| env::var("OPENAI_API_KEY")) {
        builder = builder.set_override("llm.api_key", key)?;
    }
    if let Ok(base) = env::var("OPENAI_BASE_URL") {
        builder = builder.set_override("llm.endpoint", base)?;
    }

    builder.build()
}

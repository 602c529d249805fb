mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use crate::config::Settings;
use crate::core::{PipelineOptions, RankingPolicy, SearchPipeline, SynonymTable};
use crate::routes::search::AppState;
use crate::services::{CaseStore, ChatSummarizer, MemoryStore, PgCaseStore, TavilyClient};
use std::sync::Arc;
use tracing::{error, info, warn};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting UWCase search service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the case repository: PostgreSQL when configured, otherwise
    // the in-memory store so the service still answers from synthesized data.
    let store: Arc<dyn CaseStore> = match settings.database.url.as_deref() {
        Some(url) if !url.is_empty() => {
            let pg = PgCaseStore::from_settings(
                url,
                settings.database.max_connections,
                settings.database.min_connections,
            )
            .await
            .unwrap_or_else(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                panic!("PostgreSQL connection error: {}", e);
            });
            info!("PostgreSQL case repository initialized");
            Arc::new(pg)
        }
        _ => {
            warn!("No database URL configured, using in-memory case store");
            Arc::new(MemoryStore::new())
        }
    };

    // Synonym table: built-in defaults merged with config entries
    let mut synonyms = SynonymTable::builtin();
    synonyms.extend(
        settings
            .synonyms
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    );
    info!("Synonym table loaded ({} entries)", synonyms.len());

    // Ranking policy: config lists override the built-in keyword sets
    let mut policy = RankingPolicy::default();
    if !settings.ranking.inclusive_markers.is_empty() {
        policy.inclusive_markers = settings.ranking.inclusive_markers.clone();
    }
    if !settings.ranking.critical_markers.is_empty() {
        policy.critical_markers = settings.ranking.critical_markers.clone();
    }
    if !settings.ranking.major_insurers.is_empty() {
        policy.major_insurers = settings.ranking.major_insurers.clone();
    }
    if let Some(tier) = settings.ranking.high_tier {
        policy.high_tier = tier;
    }
    if let Some(tier) = settings.ranking.mid_tier {
        policy.mid_tier = tier;
    }
    if let Some(tier) = settings.ranking.low_tier {
        policy.low_tier = tier;
    }

    let options = PipelineOptions {
        min_local_results: settings.pipeline.min_local_results,
        max_web_results: settings.pipeline.max_web_results,
        snippet_char_budget: settings.pipeline.snippet_char_budget,
    };

    let mut pipeline = SearchPipeline::new(
        Arc::clone(&store),
        Arc::new(synonyms),
        Arc::new(policy),
        options,
    );

    // Remote collaborators are optional: without credentials the pipeline
    // reports service-unavailable when the remote stage is reached.
    if settings.search.api_key.is_empty() {
        warn!("No web-search API key configured, remote fallback disabled");
    } else {
        pipeline = pipeline.with_web_search(Arc::new(TavilyClient::new(
            settings.search.endpoint.clone(),
            settings.search.api_key.clone(),
            settings.pipeline.remote_timeout_secs,
        )));
        info!("Web-search collaborator initialized");
    }

    if settings.llm.api_key.is_empty() {
        warn!("No summarization API key configured, remote fallback disabled");
    } else {
        pipeline = pipeline.with_summarizer(Arc::new(ChatSummarizer::new(
            settings.llm.endpoint.clone(),
            settings.llm.api_key.clone(),
            settings.llm.model.clone(),
            settings.pipeline.remote_timeout_secs,
        )));
        info!("Summarization collaborator initialized (model: {})", settings.llm.model);
    }

    // Build application state
    let app_state = AppState {
        pipeline: Arc::new(pipeline),
        store,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

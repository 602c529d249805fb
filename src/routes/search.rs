use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{parse_criterion, PipelineError, SearchPipeline};
use crate::models::{ErrorResponse, HealthResponse, SearchRequest, SearchResponse};
use crate::services::CaseStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SearchPipeline>,
    pub store: Arc<dyn CaseStore>,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/search", web::post().to(search));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let (status, cases) = match state.store.health_check().await {
        Ok(true) => {
            let cases = state.store.count_cases().await.unwrap_or_default();
            ("healthy", cases)
        }
        Ok(false) => ("degraded", 0),
        Err(e) => {
            tracing::warn!("Case repository unreachable during health check: {}", e);
            ("degraded", 0)
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cases,
        timestamp: chrono::Utc::now(),
    })
}

/// Search endpoint
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// {
///   "disease": "甲状腺结节",
///   "sort": "recommend",
///   "limit": 20
/// }
/// ```
async fn search(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let Some(criterion) = parse_criterion(&req.sort) else {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid sort criterion".to_string(),
            message: "Sort must be one of: recommend, leverage, coverage, company".to_string(),
            status_code: 400,
        });
    };

    // Cap limit at 100 to keep responses bounded
    let limit = req.limit.min(100) as usize;

    tracing::info!("Searching cases for '{}' (sort: {})", req.disease, req.sort);

    match state.pipeline.run(&req.disease, criterion).await {
        Ok(mut outcome) => {
            outcome.products.truncate(limit);

            tracing::info!(
                "Returning {} products for '{}' (origin: {:?}, {} cases)",
                outcome.products.len(),
                req.disease,
                outcome.origin,
                outcome.cases_considered
            );

            HttpResponse::Ok().json(SearchResponse {
                query: req.disease.clone(),
                origin: outcome.origin,
                cases_considered: outcome.cases_considered,
                products: outcome.products,
            })
        }
        Err(e @ PipelineError::NotConfigured(_)) => {
            tracing::error!("Search pipeline unavailable: {}", e);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "Search service unavailable".to_string(),
                message: e.to_string(),
                status_code: 503,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            cases: 42,
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
        assert_eq!(response.cases, 42);
    }
}

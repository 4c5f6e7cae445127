pub mod error;

use anyhow::{Context, Result};
use axum::{extract::{Path, State}, routing::get, Json, Router};
use recommender_core::engine::DEFAULT_K;
use recommender_core::{Assessment, RecommendOptions, Recommender};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiJson, ApiQuery};

#[derive(Deserialize)]
pub struct RecommendParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_K }
fn default_true() -> bool { true }

#[derive(Deserialize)]
pub struct RecommendRequest {
    pub query: String,
    #[serde(default = "default_k")]
    pub max_results: usize,
    /// Explicit time budget in minutes; overrides anything found in the query.
    #[serde(default)]
    pub max_duration: Option<u32>,
    #[serde(default = "default_true")]
    pub infer_duration: bool,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub count: usize,
    pub took_s: f64,
    /// The query had no term in the catalog vocabulary; every score is 0.
    pub no_match: bool,
    pub recommendations: serde_json::Value,
}

/// Shared, read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub max_k: usize,
}

impl AppState {
    pub fn new(recommender: Recommender, max_k: usize) -> Self {
        Self { recommender: Arc::new(recommender), max_k: max_k.max(1) }
    }

    pub fn load(catalog_path: &str, max_k: usize) -> Result<Self> {
        let recommender = Recommender::load(catalog_path)
            .with_context(|| format!("loading assessment catalog from {catalog_path}"))?;
        Ok(Self::new(recommender, max_k))
    }
}

pub fn build_app(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/recommend", get(recommend_query_handler).post(recommend_handler))
        .route("/assessments", get(list_handler))
        .route("/assessments/:id", get(assessment_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "assessments": state.recommender.catalog().len(),
    }))
}

pub async fn recommend_query_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RecommendParams>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let opts = RecommendOptions::infer(&params.q, clamp_k(&state, params.k));
    run_recommend(&state, params.q, opts).map(Json)
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let k = clamp_k(&state, req.max_results);
    let opts = match (req.max_duration, req.infer_duration) {
        (Some(minutes), _) => RecommendOptions { k, max_duration_minutes: Some(minutes) },
        (None, true) => RecommendOptions::infer(&req.query, k),
        (None, false) => RecommendOptions::new(k),
    };
    run_recommend(&state, req.query, opts).map(Json)
}

pub async fn list_handler(State(state): State<AppState>) -> Json<Vec<Assessment>> {
    Json(state.recommender.catalog().as_slice().to_vec())
}

pub async fn assessment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Assessment>, ApiError> {
    state
        .recommender
        .catalog()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

// 0 is passed through so the engine rejects it; anything above the cap is clamped.
fn clamp_k(state: &AppState, k: usize) -> usize { k.min(state.max_k) }

fn run_recommend(state: &AppState, query: String, opts: RecommendOptions) -> Result<RecommendResponse, ApiError> {
    let start = std::time::Instant::now();
    let recs = state.recommender.recommend_with(&query, &opts)?;
    let no_match = !state.recommender.has_signal(&query);
    let recommendations = serde_json::to_value(&recs)?;
    tracing::debug!(k = opts.k, count = recs.len(), no_match, "served recommendation");
    Ok(RecommendResponse {
        count: recs.len(),
        took_s: start.elapsed().as_secs_f64(),
        no_match,
        recommendations,
        query,
    })
}

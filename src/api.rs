// 🌐 HTTP API - Axum routes around the classifier
//
// POST {prefix}/categorize  { "content": "..." } → category matches
// POST {prefix}/tokenize    { "content": "..." } → tokens
// GET  {prefix}/model                            → current taxonomy
// GET  {prefix}/ping                             → "Healthy"
// POST {prefix}/reload                           → reload taxonomy source

use crate::aggregator::CategoryMatch;
use crate::classifier::Classifier;
use crate::taxonomy::{TaxonomyDefinition, TaxonomySource, TaxonomyStore};
use crate::tokenizer::Token;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TaxonomyStore>,
    pub classifier: Classifier,
    pub source: TaxonomySource,
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Content to categorize or tokenize
#[derive(Debug, Serialize, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub version: u64,
    pub fingerprint: String,
    pub source: String,
    pub categories: usize,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /ping - Health check
async fn ping() -> impl IntoResponse {
    Json(ApiResponse::ok("Healthy"))
}

/// POST /categorize - Classify content against the current taxonomy
async fn categorize(State(state): State<AppState>, Json(req): Json<ContentRequest>) -> impl IntoResponse {
    let snapshot = state.store.current();

    match state.classifier.classify(&req.content, &snapshot) {
        Ok(matches) => (StatusCode::OK, Json(ApiResponse::ok(matches))).into_response(),
        Err(e) => {
            error!(error = %e, version = snapshot.version, "classification failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<CategoryMatch>>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// POST /tokenize - Show how content is split and filtered
async fn tokenize(State(state): State<AppState>, Json(req): Json<ContentRequest>) -> impl IntoResponse {
    let snapshot = state.store.current();
    let tokens: Vec<Token> = state.classifier.tokenize_for(&req.content, &snapshot);
    Json(ApiResponse::ok(tokens))
}

/// GET /model - Current taxonomy in its nested JSON shape
async fn model(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.current();
    Json(ApiResponse::ok(TaxonomyDefinition::from_node(snapshot.root())))
}

/// POST /reload - Re-read the configured source and swap the snapshot
async fn reload(State(state): State<AppState>) -> impl IntoResponse {
    let source = state.source.clone();
    let loaded = tokio::task::spawn_blocking(move || source.load()).await;

    let root = match loaded {
        Ok(Ok(root)) => root,
        Ok(Err(e)) => {
            error!(error = %e, source = %state.source, "taxonomy reload failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ReloadResponse>::err(format!("{:#}", e))),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "taxonomy reload task panicked");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ReloadResponse>::err("reload task failed")),
            )
                .into_response();
        }
    };

    let snapshot = state.store.replace(&root, state.source.to_string());
    info!(version = snapshot.version, "taxonomy reloaded via API");

    let response = ReloadResponse {
        version: snapshot.version,
        fingerprint: snapshot.fingerprint.clone(),
        source: snapshot.source.clone(),
        categories: snapshot.category_count(),
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router with all routes under `prefix`.
pub fn router(state: AppState, prefix: &str) -> Router {
    let api_routes = Router::new()
        .route("/categorize", post(categorize))
        .route("/tokenize", post(tokenize))
        .route("/model", get(model))
        .route("/ping", get(ping))
        .route("/reload", post(reload))
        .with_state(state);

    let prefix = prefix.trim().trim_end_matches('/');
    let app = if prefix.is_empty() {
        Router::new().merge(api_routes)
    } else if prefix.starts_with('/') {
        Router::new().nest(prefix, api_routes)
    } else {
        Router::new().nest(&format!("/{}", prefix), api_routes)
    };

    app.layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

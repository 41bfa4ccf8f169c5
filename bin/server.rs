// Term Categorizer - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use std::sync::Arc;
use term_categorizer::api::{router, AppState};
use term_categorizer::config::{init_tracing, AppConfig};
use term_categorizer::{Classifier, TaxonomySnapshot, TaxonomyStore};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.log_filter);

    info!(version = term_categorizer::VERSION, "starting term categorizer server");

    // Load taxonomy once; reloads go through POST {prefix}/reload
    let source = config.taxonomy_source()?;
    let root = source
        .load()
        .with_context(|| format!("Failed to load taxonomy from {}", source))?;

    let snapshot = TaxonomySnapshot::new(&root, config.case_mode, source.to_string());
    info!(
        fingerprint = %snapshot.fingerprint,
        categories = snapshot.category_count(),
        case_mode = config.case_mode.as_str(),
        "taxonomy ready"
    );

    let state = AppState {
        store: Arc::new(TaxonomyStore::new(snapshot)),
        classifier: Classifier::new(config.case_mode),
        source,
    };

    let app = router(state, &config.route_prefix);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!(
        addr = %config.bind_addr,
        prefix = %config.route_prefix,
        "server listening"
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

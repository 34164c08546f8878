use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use studyrec_api::api::{create_router, AppState};
use studyrec_api::config::Config;
use studyrec_api::services::{
    EngineConfig, HybridWeights, JsonlFeedbackLog, RecommendationEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("studyrec_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let engine = Arc::new(RecommendationEngine::new(EngineConfig {
        artifact_dir: config.artifact_dir.clone(),
        weights: HybridWeights {
            content: config.hybrid_content_weight,
            collaborative: config.hybrid_cf_weight,
        },
    }));

    // Artifact load failures at startup are fatal: the service must not
    // report ready without a catalog to recommend from.
    engine
        .load()
        .map_err(|e| anyhow::anyhow!("failed to load recommendation artifacts: {}", e))?;

    let feedback = Arc::new(JsonlFeedbackLog::new(config.feedback_log.clone()));
    let state = AppState::new(engine, feedback, config.default_k);

    let ui_dir = config.ui_dir.is_dir().then(|| config.ui_dir.clone());
    if ui_dir.is_none() {
        tracing::debug!(ui_dir = %config.ui_dir.display(), "no static UI directory, skipping");
    }

    let app = create_router(state, ui_dir);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

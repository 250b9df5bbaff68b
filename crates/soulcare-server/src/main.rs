mod api;
mod middleware;
mod results;

use std::sync::Arc;

use soulcare_sentiment::sources::TEXT_COLUMN;
use soulcare_sentiment::{SentimentConfig, SentimentPipeline, TeiClassifier};
use soulcare_store::ComplaintStore;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
    results::AnalysisResults,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = soulcare_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let sentiment_config = SentimentConfig::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    // Stored complaints are always exposed to the pipeline under the scraper's text column.
    let pipeline = SentimentPipeline::new(
        TeiClassifier::text_model(&sentiment_config)?,
        TeiClassifier::emoji_model(&sentiment_config)?,
        TEXT_COLUMN,
    );

    let state = AppState {
        store: Arc::new(ComplaintStore::new(config.data_file.clone())),
        pipeline: Arc::new(pipeline),
        results: AnalysisResults::default(),
    };
    let auth = AuthState::from_config(&config);
    let app = build_app(state, auth);

    tracing::info!(env = %config.env, addr = %config.bind_addr, "starting soulcare server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

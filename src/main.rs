use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinematch_api::{
    catalog::CatalogLoader,
    config::Config,
    routes::{create_router, AppState},
    services::OmdbPosterResolver,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Load errors are fatal: there is nothing to serve without the catalog
    let loader = CatalogLoader::from_config(&config);
    let catalog = loader
        .get_or_load()
        .await
        .context("Failed to load movie catalog")?;

    let poster_resolver = OmdbPosterResolver::from_config(&config)
        .context("Failed to build poster client")?;
    if !poster_resolver.is_enabled() {
        tracing::warn!("OMDB_API_KEY not set, recommendations will have no posters");
    }

    let state = Arc::new(AppState {
        catalog,
        poster_resolver: Arc::new(poster_resolver),
        default_top_n: config.default_top_n,
    });

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

//! Inkgate booking policy engine HTTP server

use anyhow::Result;
use inkgate_sdk::{PolicyEngine, PolicyEngineBuilder};
use inkgate_server::config::ServerConfig;
use inkgate_server::api;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = ServerConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let engine = init_engine(&config).await?;
    info!("Policy engine initialized");

    let app = api::create_router(Arc::new(engine));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("✓ Server listening on http://{}", addr);
    info!("  Health check: http://{}/health", addr);
    info!("  Decision API: http://{}/v1/decide", addr);
    info!("  Rule management: http://{}/v1/rules", addr);
    info!("  Policy versions: http://{}/v1/policy/versions", addr);
    info!("  Audit log: http://{}/v1/audit", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "inkgate_server=info,inkgate_sdk=info,inkgate_store=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

/// Build the engine from configuration
///
/// Uses the PostgreSQL store when a database URL is configured and the
/// `postgres` feature is enabled; the in-memory store otherwise.
async fn init_engine(config: &ServerConfig) -> Result<PolicyEngine> {
    let mut builder = PolicyEngineBuilder::new();

    #[cfg(feature = "postgres")]
    if let Some(database_url) = &config.database_url {
        let store = inkgate_store::PostgresStore::connect(database_url).await?;
        builder = builder.with_store(Arc::new(store));
        info!("✓ PostgreSQL store configured");
    }

    #[cfg(not(feature = "postgres"))]
    if config.database_url.is_some() {
        tracing::warn!(
            "database_url is set but the server was built without the postgres feature; \
             falling back to the in-memory store"
        );
    }

    if let Some(seed_path) = &config.seed_path {
        builder = builder.with_seed_dir(seed_path);
    }

    Ok(builder.build().await?)
}

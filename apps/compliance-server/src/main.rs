//! Compliance analysis server
//!
//! REST boundary for the compliance engine:
//!
//! - `POST /api/compliance/analyze` - applicable rules and report for a business profile
//! - `GET /api/rules` - rules kept by the persistence layer
//! - `GET /health` - liveness and persistence mode
//!
//! Engine settings come from the environment (a `.env` file is loaded first);
//! see `compliance_engine::config` for the variables. Missing credentials stop
//! the server before it binds.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use compliance_engine::{Analyzer, ConfigError, EngineConfig, EngineServices, PersistenceMode};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod store;

use api::{handle_analyze, handle_health, handle_list_rules};
use store::SqliteRuleStore;

/// Command-line arguments for the compliance server
#[derive(Parser, Debug)]
#[command(name = "compliance-server")]
#[command(about = "Business compliance analysis server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "5")]
    rate_limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
}

/// Routes plus CORS and request tracing. Rate limiting is added in `main`
/// because it needs the peer address of a real connection.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/compliance/analyze", post(handle_analyze))
        .route("/api/rules", get(handle_list_rules))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn build_services(config: &EngineConfig) -> anyhow::Result<EngineServices> {
    let services = match config.persistence {
        PersistenceMode::Sqlite => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let store = SqliteRuleStore::connect(url).await?;
            EngineServices::init_with_store(config, Arc::new(store))?
        }
        PersistenceMode::Disabled | PersistenceMode::Memory => EngineServices::init(config)?,
    };
    Ok(services)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(format!("compliance_server={}", level).parse()?)
                .add_directive(format!("compliance_engine={}", level).parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env()?;
    let services = Arc::new(build_services(&config).await?);
    let state = AppState {
        analyzer: Analyzer::new(services.clone()),
    };

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.max(1).into())
            .burst_size(args.rate_limit.max(1) * 2)
            .finish()
            .ok_or_else(|| anyhow!("invalid rate limit: {}", args.rate_limit))?,
    );

    let app = router(state).layer(GovernorLayer {
        config: governor_conf,
    });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!(
        "Sources: {:?}, persistence: {}",
        config.sources.iter().map(|s| s.source_type().to_string()).collect::<Vec<_>>(),
        config.persistence
    );

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    services.shutdown().await;
    Ok(())
}

//! # REA Server
//!
//! Serves the "update a registered email address" journey.
//!
//! ## Architecture
//!
//! - Redis for sessions (or an in-memory store for local runs)
//! - Companies House public API for company profiles and transactions
//! - Oracle query API for the current registered email address

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::Parser;
use rea_core::SessionStore;
use rea_core::clients::{ChsApiClient, ChsApiClientConfig};
use rea_core::session::{MemorySessionStore, RedisSessionStore};
use rea_server::{
    AppState, create_router,
    infra::config::{Config, ConfigLoad, ConfigLoader},
    render::Renderer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rea-server")]
#[command(about = "Update a company's registered email address")]
struct ServeArgs {
    /// Server port (overrides PORT)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Keep sessions in process memory instead of Redis
    #[arg(long, env = "REA_MEMORY_SESSIONS", default_value_t = false)]
    memory_sessions: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServeArgs::parse();

    let ConfigLoad {
        mut config,
        env_file_loaded,
    } = ConfigLoader::new()
        .load()
        .context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},tower_http=warn", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if env_file_loaded {
        info!("loaded .env file");
    }

    let config = Arc::new(config);
    let sessions = build_session_store(&config, args.memory_sessions).await?;

    let api = ChsApiClient::new(ChsApiClientConfig {
        api_url: config.api_url.clone(),
        oracle_query_api_url: config.oracle_query_api_url.clone(),
        api_key: config.chs_api_key.clone(),
    })
    .context("failed to build API client")?;
    let renderer = Renderer::new(&config).context("failed to load page templates")?;

    let state = AppState::new(config.clone(), sessions, Arc::new(api), Arc::new(renderer));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "registered email address service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn build_session_store(
    config: &Config,
    memory_sessions: bool,
) -> anyhow::Result<Arc<dyn SessionStore>> {
    if memory_sessions {
        warn!("using in-memory sessions; sessions are lost on restart");
        return Ok(Arc::new(MemorySessionStore::new()));
    }

    let store = RedisSessionStore::new(&config.redis_url(), config.session_expiration)
        .await
        .context("failed to connect to the session cache")?;
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

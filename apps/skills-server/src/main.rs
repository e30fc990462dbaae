//! Reference REST API server for the skills resource.
//!
//! Wires a skill store, the single-writer runtime thread and the hyper
//! server together, with configuration parsing and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use skills_api::{ApiConfig, Router, Server};
use skills_core::config::PostgresConfig;
use skills_core::{MemorySkillStore, PostgresSkillStore, SharedSkillStore};
use skills_runtime::{RuntimeConfig, SkillRuntime};
use tokio::signal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// `skill` table in Postgres
    Postgres,
    /// Process memory, lost on exit
    Memory,
}

/// Command-line arguments for the skills server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host address to bind to
    #[arg(long, env = "SKILLS_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "SKILLS_PORT", default_value_t = 8080)]
    port: u16,

    /// Storage backend
    #[arg(long, env = "SKILLS_STORE", value_enum, default_value_t = StoreKind::Postgres)]
    store: StoreKind,

    /// Postgres host
    #[arg(long, env = "SKILLS_DB_HOST", default_value = "127.0.0.1")]
    db_host: String,

    /// Postgres port
    #[arg(long, env = "SKILLS_DB_PORT", default_value_t = 5432)]
    db_port: u16,

    /// Postgres user
    #[arg(long, env = "SKILLS_DB_USER", default_value = "postgres")]
    db_user: String,

    /// Postgres password
    #[arg(long, env = "SKILLS_DB_PASSWORD", default_value = "postgres", hide_env_values = true)]
    db_password: String,

    /// Postgres database
    #[arg(long, env = "SKILLS_DB_NAME", default_value = "app")]
    db_name: String,

    /// Pooled Postgres connections
    #[arg(long, env = "SKILLS_DB_POOL_SIZE", default_value_t = 4)]
    db_pool_size: u32,

    /// Request body timeout in milliseconds
    #[arg(long, env = "SKILLS_REQUEST_TIMEOUT_MS", default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Runtime reply timeout in milliseconds
    #[arg(long, env = "SKILLS_RESPONSE_TIMEOUT_MS", default_value_t = 10000)]
    response_timeout_ms: u64,

    /// Capacity of the runtime request queue
    #[arg(long, env = "SKILLS_QUEUE_CAPACITY", default_value_t = 1024)]
    queue_capacity: usize,
}

impl Args {
    fn postgres_config(&self) -> PostgresConfig {
        PostgresConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            max_connections: self.db_pool_size,
            ..PostgresConfig::default()
        }
    }

    fn api_config(&self) -> ApiConfig {
        ApiConfig {
            request_timeout_ms: self.request_timeout_ms,
            response_timeout_ms: self.response_timeout_ms,
            ..ApiConfig::default()
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

/// Opens the store. Runs before any async runtime exists; the Postgres
/// client blocks.
fn open_store(args: &Args) -> anyhow::Result<SharedSkillStore> {
    match args.store {
        StoreKind::Postgres => {
            let config = args.postgres_config();
            tracing::info!(db = %config.redacted(), "Connecting to Postgres");
            let store = PostgresSkillStore::connect(&config)
                .with_context(|| format!("failed to open store at {}", config.redacted()))?;
            Ok(Arc::new(store))
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Ok(Arc::new(MemorySkillStore::new()))
        }
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down server..."),
        Err(e) => {
            tracing::error!("Failed to listen for ctrl_c: {}", e);
            std::future::pending::<()>().await
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let store = open_store(&args)?;

    let runtime_config = RuntimeConfig {
        queue_capacity: args.queue_capacity,
    };
    let (api_tx, mut runtime) = SkillRuntime::with_channel(store, &runtime_config);
    let runtime_thread = thread::Builder::new()
        .name("skill-runtime".to_string())
        .spawn(move || runtime.run())
        .context("failed to spawn runtime thread")?;

    let router = Router::new(Arc::new(args.api_config()), api_tx)?;
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;

    tracing::info!(
        store = ?args.store,
        request_timeout_ms = args.request_timeout_ms,
        response_timeout_ms = args.response_timeout_ms,
        "Starting skills server"
    );

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    rt.block_on(async move {
        let server = Server::bind(addr, router).await?;
        server.serve_until(shutdown_signal()).await
    })
    .with_context(|| format!("server on {} failed", addr))?;

    // Dropping the tokio runtime drops every open connection and with them
    // the last request senders, which ends the runtime loop.
    drop(rt);
    runtime_thread
        .join()
        .map_err(|_| anyhow!("skill runtime thread panicked"))?;

    Ok(())
}

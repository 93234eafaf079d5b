//! chainwatch daemon — entry point for running the transaction monitor.

use std::sync::Arc;

use clap::Parser;

use chainwatch_api::{ApiServer, ApiState};
use chainwatch_eth::{parse_endpoints, ChainRegistry};
use chainwatch_monitor::{
    init_logging, AbandonmentPolicy, LogFormat, Monitor, MonitorConfig, MonitorMetrics,
    ShutdownController, Sweeper, TransactionChecker,
};
use chainwatch_store::TransactionStore;
use chainwatch_store_pg::{PgStore, PgStoreConfig};

#[derive(Parser)]
#[command(name = "chainwatch", about = "Blockchain transaction monitoring service")]
struct Cli {
    /// Postgres host.
    #[arg(long, default_value = "localhost", env = "DB_HOST")]
    db_host: String,

    /// Postgres port.
    #[arg(long, default_value_t = 5432, env = "DB_PORT")]
    db_port: u16,

    /// Postgres user.
    #[arg(long, default_value = "postgres", env = "DB_USER")]
    db_user: String,

    /// Postgres password.
    #[arg(long, default_value = "", env = "DB_PASSWORD")]
    db_password: String,

    /// Postgres database name.
    #[arg(long, default_value = "transactions", env = "DB_NAME")]
    db_name: String,

    /// Comma-separated chain endpoints: "mainnet=https://…,gnosis=https://…".
    #[arg(long, env = "ETH_ENDPOINTS")]
    eth_endpoints: String,

    /// Seconds to sleep between sweeps.
    #[arg(long, env = "CHECKS_TIMER")]
    checks_timer: u64,

    /// HTTP listen port.
    #[arg(long, default_value_t = 8080, env = "PORT")]
    port: u16,

    /// Sweep worker-pool size.
    #[arg(long, default_value_t = 10, env = "CHAINWATCH_WORKERS")]
    workers: usize,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "CHAINWATCH_LOG_FORMAT")]
    log_format: String,
    // CHECKS_THRESHOLD is deliberately absent: the abandonment policy reads
    // it fresh from the environment on every evaluation.
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(LogFormat::from_name(&cli.log_format), "info");

    tracing::info!(
        db_host = %cli.db_host,
        db_name = %cli.db_name,
        port = cli.port,
        checks_timer = cli.checks_timer,
        workers = cli.workers,
        "starting chainwatch"
    );

    // Chain registry — a malformed endpoint list is fatal here, before any
    // connection is attempted.
    let endpoints = parse_endpoints(&cli.eth_endpoints)?;
    let registry = Arc::new(ChainRegistry::from_endpoints(&endpoints));
    tracing::info!(chains = registry.len(), "chain registry built");

    // Store — connecting also bootstraps the schema; an unreachable store
    // is fatal at startup.
    let store: Arc<dyn TransactionStore> = Arc::new(
        PgStore::connect(&PgStoreConfig {
            host: cli.db_host,
            port: cli.db_port,
            user: cli.db_user,
            password: cli.db_password,
            database: cli.db_name,
        })
        .await?,
    );

    // Engine.
    let metrics = Arc::new(MonitorMetrics::new());
    let checker = Arc::new(TransactionChecker::new(
        Arc::clone(&store),
        Arc::clone(&registry),
        AbandonmentPolicy::from_env(),
    ));
    let sweeper = Arc::new(Sweeper::new(
        checker,
        Arc::clone(&store),
        Arc::clone(&metrics),
        cli.workers,
    ));

    let shutdown = ShutdownController::new();

    let mut monitor = Monitor::new(
        sweeper,
        Arc::clone(&store),
        MonitorConfig {
            sweep_interval: std::time::Duration::from_secs(cli.checks_timer),
            workers: cli.workers,
            liveness_interval: MonitorConfig::default().liveness_interval,
        },
    );
    monitor.start(&shutdown);

    // HTTP surface.
    let api_state = Arc::new(ApiState {
        store,
        registry,
        metrics: metrics.registry.clone(),
    });
    let server = ApiServer::new(cli.port, api_state);
    let mut server_signal = shutdown.subscribe();
    let server_handle = tokio::spawn(async move {
        let stop = async move { server_signal.triggered().await };
        if let Err(e) = server.start(stop).await {
            tracing::error!("API server error: {e}");
        }
    });

    shutdown.wait_for_signal().await;

    tracing::info!("shutdown signal received, stopping");
    monitor.join().await;
    let _ = server_handle.await;

    tracing::info!("chainwatch exited cleanly");
    Ok(())
}

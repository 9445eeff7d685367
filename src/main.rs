use std::{net::TcpListener, time::Duration};

use actix_web::web;
use clap::Parser;
use qasset::{
    background_task::start_idempotency_purge_task,
    graceful_shutdown::shutdown_signal,
    middlewares::idempotency::IdempotencyStore,
    settings::{AppConfig, Cli},
    startup,
    storage::local::LocalStorage,
    AppState,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_json);
    tracing::info!("Loaded configuration: {:?}", config);

    LocalStorage::from(&config).ensure_roots().await?;

    let app_state = web::Data::new(AppState::new(&config));
    let idempotency = IdempotencyStore::new(Duration::from_secs(config.idempotency_ttl_secs));

    let server_addr = config.server_addr();
    let listener = TcpListener::bind(&server_addr)?;

    tracing::info!(
        "🚀 Starting {} v{} on {} ({} worker{})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.workers(),
        if config.workers() == 1 { "" } else { "s" }
    );

    let server = startup::run(listener, app_state, idempotency.clone(), config.workers())?;
    let handle = server.handle();

    tokio::spawn(start_idempotency_purge_task(idempotency));
    let server_task = tokio::spawn(server);

    tokio::select! {
        res = server_task => res??,
        _ = shutdown_signal() => handle.stop(true).await,
    }

    Ok(())
}

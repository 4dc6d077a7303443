use clap::Parser;
use mercy_server::{AppState, bootstrap, config, routes, startup};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mercy-server", version, about = "Mercy campus registry server")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "MERCY_CONFIG", default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = startup::open_store(&cfg.store).await?;
    bootstrap::bootstrap_admin(store.as_ref(), &cfg.bootstrap).await?;

    let tokens = startup::token_service(&cfg.token)?;
    let timeout = cfg.server.request_timeout().map_err(anyhow::Error::msg)?;
    let state = AppState::new(store, tokens, cfg.auth.clone());
    let app = routes::router(state, timeout);

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind).await?;
    tracing::info!(address = %cfg.server.bind, "mercy-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("mercy-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

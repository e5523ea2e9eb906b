mod config;
mod wiring;

use std::error::Error;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use api::state::AppState;
use ledger::{Ledger, LedgerConfig, SeededRandomSource};
use runtime::RefreshTask;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::Config::from_env()?;
    let state = AppState::with_ledger(build_ledger(&config));

    let refresh_state = state.clone();
    let refresher = RefreshTask::spawn(
        Duration::from_millis(config.refresh_interval_ms),
        move || {
            refresh_state.refresh_prices();
        },
    );

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "virtual trade panel listening");

    axum::serve(listener, wiring::build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let ticks = refresher.stop().await;
    tracing::info!(ticks, "price refresh task stopped");
    Ok(())
}

fn build_ledger(config: &config::Config) -> Ledger {
    let ledger_config = LedgerConfig {
        starting_balance: config.starting_balance,
        ..LedgerConfig::default()
    };

    Ledger::with_default_watchlist(
        ledger_config,
        Box::new(SeededRandomSource::new(config.price_seed)),
    )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "shutdown signal listener failed");
    }
}

//! Daily Payment Engine HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use daily_pay_engine::api::{AppState, create_router};
use daily_pay_engine::config::ConfigLoader;
use daily_pay_engine::ledger::DayLedger;

#[derive(Parser, Debug)]
#[command(name = "daily-pay-engine")]
#[command(version, about, long_about = None)]
struct Args {
    /// Tenant configuration directory
    #[arg(long, env = "DAILY_PAY_CONFIG", default_value = "./config/demo")]
    config: PathBuf,

    /// Address to listen on
    #[arg(long, env = "DAILY_PAY_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Ledger state file, loaded at start and written after every change
    #[arg(long)]
    state: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(args.log_level.into()),
        )
        .with_target(false)
        .init();

    let config = ConfigLoader::load(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;
    info!(
        tenant_id = %config.tenant().id,
        config_dir = %args.config.display(),
        "Configuration loaded"
    );

    let ledger = match &args.state {
        Some(path) if path.exists() => DayLedger::load_from(path)
            .with_context(|| format!("failed to load state from {}", path.display()))?,
        _ => DayLedger::new(config.tenant().id.clone()),
    };
    if ledger.tenant_id() != config.tenant().id {
        warn!(
            ledger_tenant = ledger.tenant_id(),
            config_tenant = %config.tenant().id,
            "State file belongs to a different tenant"
        );
    }

    let state = AppState::with_ledger(config, ledger, args.state.clone());
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(address = %args.bind, "Daily payment engine listening");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}

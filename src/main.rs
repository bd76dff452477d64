//! shift-ledger server binary.
//!
//! Environment:
//! - `SHIFT_LEDGER_POLICY`: policy YAML path (default `./config/policy.yaml`)
//! - `SHIFT_LEDGER_ADDR`: listen address (default `127.0.0.1:3000`)
//! - `RUST_LOG`: tracing filter (default `info`)

use std::env;

use shift_ledger::api::{AppState, create_router};
use shift_ledger::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_POLICY_PATH: &str = "./config/policy.yaml";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let policy_path = env::var("SHIFT_LEDGER_POLICY").unwrap_or_else(|_| DEFAULT_POLICY_PATH.to_string());
    let addr = env::var("SHIFT_LEDGER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let config = ConfigLoader::load(&policy_path)?;
    let router = create_router(AppState::in_memory(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, policy = %policy_path, "shift-ledger listening");

    axum::serve(listener, router).await?;
    Ok(())
}

pub mod constants;
pub mod error;
mod gateway;
mod models;
mod modules;
mod utils;

use modules::logger;
use std::sync::Arc;
use tracing::{error, info, warn};

fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn resolve_data_dir() -> String {
    std::env::var("SUBGATE_DATA_DIR")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| "./data".to_string())
}

async fn start_gateway_runtime() -> Result<(), String> {
    let data_dir = resolve_data_dir();

    let port: u16 = match std::env::var("SUBGATE_PORT") {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("invalid_port_value: {}", raw))?,
        Err(_) => 8080,
    };

    let allow_lan = std::env::var("SUBGATE_ALLOW_LAN")
        .ok()
        .and_then(|v| {
            let parsed = parse_env_bool(&v);
            if parsed.is_none() {
                warn!("Ignoring invalid LAN access value: {}", v);
            }
            parsed
        })
        .unwrap_or(false);

    let host = if allow_lan {
        warn!("LAN access is enabled (bind address will be 0.0.0.0)");
        "0.0.0.0"
    } else {
        info!("LAN access is disabled (bind address will be 127.0.0.1)");
        "127.0.0.1"
    };

    info!(
        "Starting subscription gateway on port {} (data dir: {})",
        port, data_dir
    );

    let store = Arc::new(modules::storage::FileStore::new(&data_dir));
    gateway::server::start(host, port, store)
        .await
        .map_err(|e| format!("failed_to_start_gateway: {}", e))?;

    Ok(())
}

pub fn run() {
    let data_dir = resolve_data_dir();
    logger::init_logger(&data_dir);

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    runtime.block_on(async {
        if let Err(e) = start_gateway_runtime().await {
            error!("{}", e);
            std::process::exit(1);
        }

        info!("Gateway service is running. Press Ctrl+C to exit.");
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutting down gateway service");
    });
}

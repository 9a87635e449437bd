use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use payroll_api::api::{AppState, create_router};
use payroll_api::config::{ConfigLoader, ServiceConfig};
use payroll_api::extractor::CommandExtractor;
use payroll_api::telemetry::{init_tracing, resolve_filter};

#[derive(Parser, Debug)]
#[command(name = "payroll-api", version, about = "Payroll PDF extraction API")]
struct Cli {
    /// YAML configuration file. Built-in defaults are used when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to bind, overriding the configuration.
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to bind, overriding the configuration.
    #[arg(long)]
    port: Option<u16>,

    /// Request log file, overriding the configuration.
    #[arg(long, value_name = "FILE")]
    request_log: Option<PathBuf>,

    /// Tracing filter, e.g. `debug` or `payroll_api=trace`.
    #[arg(long)]
    log_filter: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load(path)?.into_config(),
            None => ServiceConfig::default(),
        };

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.request_log {
            config.logging.request_log = path.clone();
        }

        Ok(ConfigLoader::from_config(config)?.into_config())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_tracing(&resolve_filter(
        cli.log_filter.as_deref(),
        &config.logging.filter,
    ))?;

    let addr = config.socket_addr();
    let extractor = CommandExtractor::from_config(&config.extractor);
    info!(
        extractor = %extractor.program(),
        request_log = %config.logging.request_log.display(),
        "Starting payroll API"
    );

    let router = create_router(AppState::new(config, extractor));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, "payroll API listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

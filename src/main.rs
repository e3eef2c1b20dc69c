//! maxify: un-minifying HTTP response filter proxy
//!
//! This is the main entry point for the maxify binary. It parses CLI
//! arguments, initializes tracing and audit telemetry, loads the
//! configuration and library catalog, and runs the proxy loop.
//!
//! Startup is the only place where errors are fatal: without a valid
//! catalog the filter cannot do its job, so catalog and config problems
//! abort with a clear message. Everything after startup fails open per
//! exchange.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use maxify::{
    catalog::Catalog,
    cli::{Cli, Commands},
    config::ConfigLoader,
    interceptor::{Fetcher, ProxyServer, ResponseInterceptor},
    telemetry::{AuditEvent, AuditLogger},
};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before any other initialization)
    let cli = Cli::parse();

    // Initialize tracing subscriber for debug logging (stderr)
    init_tracing(cli.verbose)?;

    debug!("Parsed CLI arguments: {:?}", cli);

    // The validate subcommand exits before any proxy machinery is built
    if let Some(Commands::Validate { catalog }) = cli.command {
        return validate_catalog(&catalog);
    }

    // Connect audit telemetry (syslog) - this never touches stdout/stderr.
    // One logger instance is shared by startup logging and the interceptor.
    let audit = Arc::new(AuditLogger::new().context("Failed to connect audit logger")?);

    // Load configuration with hierarchy merging
    let config_loader = ConfigLoader::new();
    let config = config_loader
        .load(&cli)
        .context("Failed to load configuration")?;

    debug!("Loaded configuration: {:?}", config);

    // Load the library catalog - fatal on any error, no partial catalog
    let catalog_path = Path::new(&config.catalog.path);
    let catalog = Catalog::load_file(catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog.path))?;

    info!(
        path = %config.catalog.path,
        entries = catalog.len(),
        "Catalog loaded"
    );
    audit.log(AuditEvent::CatalogLoaded {
        path: config.catalog.path.clone(),
        entries: catalog.len(),
    });

    // Build the per-exchange filter
    let fetcher = Fetcher::new(
        Duration::from_secs(config.fetch.timeout_secs),
        &config.fetch.user_agent,
    )
    .context("Failed to build outbound HTTP client")?;

    let interceptor = Arc::new(ResponseInterceptor::new(Arc::new(catalog), fetcher, audit));

    // Run the proxy with Ctrl+C driving graceful shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    let server = ProxyServer::new(config.listener.bind_address.clone(), interceptor, shutdown_rx);
    server.run().await.context("Proxy server failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load a catalog file and report what it contains.
fn validate_catalog(path: &Path) -> Result<()> {
    let catalog = Catalog::load_file(path)
        .with_context(|| format!("Catalog validation failed for {}", path.display()))?;

    println!(
        "{}: {} tracked asset(s)",
        path.display(),
        catalog.len()
    );
    let mut names: Vec<&str> = catalog.filenames().collect();
    names.sort_unstable();
    for name in names {
        println!("  {}", name);
    }
    Ok(())
}

/// Initialize the tracing subscriber for debug/development logging.
///
/// This is separate from the audit telemetry which goes to syslog.
///
/// # Verbosity Levels
/// - 0 (default): Only warnings and errors
/// - 1 (-v): Info level
/// - 2 (-vv): Debug level
/// - 3+ (-vvv): Trace level
fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

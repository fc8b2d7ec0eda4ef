//! MNDP Daemon - Main entry point
//!
//! Listens for MNDP broadcasts and reports discovered neighbors.

mod config;

use anyhow::Result;
use clap::Parser;
use mndp_listener::{MndpListener, NeighborEvent};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "mndpd")]
#[command(about = "MikroTik neighbor discovery (MNDP) listener daemon")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "mndp.toml")]
    config: PathBuf,

    /// Bind address for the UDP socket
    #[arg(short, long)]
    bind: Option<IpAddr>,

    /// UDP port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Listen for this many seconds, print the neighbor table, and exit
    #[arg(long)]
    oneshot: Option<u64>,

    /// Print the oneshot neighbor table as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("mndpd v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // CLI overrides
    if let Some(bind) = args.bind {
        config.listener.bind = bind;
    }
    if let Some(port) = args.port {
        config.listener.port = port;
    }

    let listener = Arc::new(MndpListener::new(config.to_listener_config()));

    if let Some(secs) = args.oneshot {
        // Capture mode: listen for a fixed window, then report
        info!(secs = secs, "Running oneshot capture");
        let capture = listener.clone();
        let handle = tokio::spawn(async move { capture.run().await });
        tokio::time::sleep(Duration::from_secs(secs)).await;
        handle.abort();

        let neighbors = listener.neighbors().await;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&neighbors)?);
        } else {
            println!("Heard {} neighbors:", neighbors.len());
            for neighbor in neighbors {
                println!(
                    "  - {} ({}) from {}",
                    neighbor.identity.as_deref().unwrap_or("<unknown>"),
                    neighbor.mac.as_deref().unwrap_or("no mac"),
                    neighbor.source
                );
                if let Some(board) = &neighbor.board {
                    println!("    Board: {}", board);
                }
                if let Some(version) = &neighbor.version {
                    println!("    Version: {}", version);
                }
                for addr in &neighbor.addresses {
                    println!("    Address: {}", addr);
                }
            }
        }
        return Ok(());
    }

    // Daemon mode: run the listener and log registry events
    let receiver = listener.clone();
    tokio::spawn(async move {
        if let Err(e) = receiver.run().await {
            error!(error = %e, "Listener stopped");
            std::process::exit(1);
        }
    });

    let mut events = listener.subscribe();
    loop {
        match events.recv().await {
            Ok(NeighborEvent::Discovered(neighbor)) => {
                info!(
                    identity = neighbor.identity.as_deref().unwrap_or("<unknown>"),
                    mac = neighbor.mac.as_deref().unwrap_or("no mac"),
                    source = %neighbor.source,
                    "New neighbor"
                );
            }
            Ok(NeighborEvent::Updated(_)) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped = skipped, "Event stream lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }

    Ok(())
}

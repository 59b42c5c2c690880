//! filewire Server Binary
//!
//! Serves files over the filewire protocol.

use std::sync::Arc;
use clap::Parser;
use filewire::fs::DiskSource;
use filewire::{Server, ServerConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// filewire Server
#[derive(Parser, Debug)]
#[command(name = "filewire-server")]
#[command(about = "Serve files by name over TCP")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = filewire::config::DEFAULT_ADDR)]
    listen: String,

    /// Largest accepted request line in bytes
    #[arg(long, default_value = "1024")]
    max_request_size: usize,

    /// Per-connection read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Per-connection write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,filewire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("filewire server v{}", filewire::VERSION);

    let config = ServerConfig::builder()
        .listen_addr(&args.listen)
        .max_request_size(args.max_request_size)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let server = match Server::bind(config, Arc::new(DiskSource)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

//! filewire Client Binary
//!
//! Requests every file in a list, optionally several times over.

use std::path::PathBuf;
use clap::Parser;
use filewire::client::{load_filename_list, run_batch};
use filewire::ClientConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// filewire Client
#[derive(Parser, Debug)]
#[command(name = "filewire-client")]
#[command(about = "Fetch files from a filewire server")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = filewire::config::DEFAULT_ADDR)]
    connect: String,

    /// Logical host sent in each request
    #[arg(long, default_value = filewire::config::DEFAULT_HOST)]
    host: String,

    /// File containing the newline-delimited list of filenames to request
    #[arg(short, long)]
    filename: Option<PathBuf>,

    /// Number of passes over the filename list
    #[arg(short = 'l', long = "loop", default_value = "1")]
    iterations: usize,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,filewire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let mut builder = ClientConfig::builder()
        .connect_addr(&args.connect)
        .host(&args.host)
        .iterations(args.iterations);
    if let Some(path) = &args.filename {
        builder = builder.filename_list(path);
    }
    let config = builder.build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("Connecting to {}", config.connect_addr);

    let Some(list_path) = config.filename_list.as_deref() else {
        tracing::error!("--filename is required");
        std::process::exit(1);
    };
    let filenames = match load_filename_list(list_path) {
        Ok(names) => names,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    match run_batch(&config, &filenames, |_, _, _| {}) {
        Ok(summary) => {
            tracing::info!(
                "Done: {} requests, {} succeeded, {} failed, {} bytes",
                summary.requests, summary.succeeded, summary.failed, summary.bytes_received
            );
        }
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

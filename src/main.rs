// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use openscan::constants::timing;
use openscan::errors::AppError;

mod cli;

#[derive(Parser)]
#[command(name = "openscan")]
#[command(about = "Offline QR code scanner for the terminal")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Scan a single code and print it to stdout
    Scan {
        /// Camera device path (default: first available camera)
        #[arg(short, long)]
        device: Option<String>,

        /// Give up after this many seconds (0 waits forever)
        #[arg(short, long, default_value_t = timing::DEFAULT_SCAN_TIMEOUT_SECS)]
        timeout: u64,

        /// Print the result as a JSON object
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=openscan=debug, RUST_LOG=info
    // Logs go to stderr so scan output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Scan {
            device,
            timeout,
            json,
        }) => cli::scan(device, timeout, json),
        None => openscan::app::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(match e {
            AppError::Timeout(_) => 2,
            AppError::Interrupted => 130,
            _ => 1,
        });
    }
}

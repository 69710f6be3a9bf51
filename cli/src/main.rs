//! CIPHERBOARD CLI
//!
//! Local-mode driver for the privacy-preserving score ledger.
//!
//! # Usage
//!
//! ```bash
//! # Write a default configuration
//! cipherboard init
//!
//! # Run the scripted demo round (submit, rank, reveal)
//! cipherboard demo
//!
//! # Submit and reveal as one player
//! cipherboard play --player alice --score 50
//!
//! # Show configuration and cached sessions
//! cipherboard status
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;
mod signer;

use commands::{DemoCommand, InitCommand, PlayCommand, StatusCommand};

/// cipherboard score ledger
#[derive(Parser)]
#[command(name = "cipherboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Privacy-preserving arcade score ledger", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory
    #[arg(short, long, global = true, env = "CIPHERBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration
    Init(InitCommand),

    /// Run a scripted multi-player round against the local co-processor
    Demo(DemoCommand),

    /// Submit a score and reveal it back through the decryption pipeline
    Play(PlayCommand),

    /// Show configuration and session cache state
    Status(StatusCommand),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, cli.json_logs)?;

    match cli.command {
        Commands::Init(cmd) => cmd.execute(cli.config, cli.data_dir),
        Commands::Demo(cmd) => cmd.execute(cli.config, cli.data_dir).await,
        Commands::Play(cmd) => cmd.execute(cli.config, cli.data_dir).await,
        Commands::Status(cmd) => cmd.execute(cli.config, cli.data_dir),
        Commands::Version => {
            println!("cipherboard {}", env!("CARGO_PKG_VERSION"));
            println!("Ledger: encrypted scores, recency-ranked leaderboard");
            Ok(())
        }
    }
}

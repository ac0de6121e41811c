//! Strata grid command-line interface
//!
//! Exports layered geological models to FLAC3D `.f3grid` files.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Layered FLAC3D grid exporter
#[derive(Parser)]
#[command(name = "strata-grid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export layered geological models to FLAC3D grids", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a layer stack to .f3grid
    Export(commands::export::ExportArgs),
    /// Summarize a layer stack
    Inspect(commands::inspect::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Export(args) => commands::export::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
    }
}

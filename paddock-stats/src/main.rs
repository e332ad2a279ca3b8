//! Point d'entrée CLI pour paddock-stats

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

mod aggregate;
mod cli;
mod report;

use cli::Commands;

/// Ingérer des paddocks GeoJSON et produire des statistiques par projet
#[derive(Parser)]
#[command(name = "paddock-stats")]
#[command(version)]
#[command(about = "Ingérer des paddocks GeoJSON et produire des statistiques par projet")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Ingest {
            path,
            batch,
            report,
            records,
            stats,
            jobs,
        } => cli::cmd_ingest(
            &path,
            batch,
            report.as_deref(),
            records.as_deref(),
            stats,
            jobs,
        )?,
        Commands::Stats { path, global } => cli::cmd_stats(&path, global)?,
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}

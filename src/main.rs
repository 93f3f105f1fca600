mod cli {
    pub(crate) mod clean;
    pub(crate) mod combine;
    pub(crate) mod master;
    pub(crate) mod split;
}

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{error, Level};

/// Extract torsion-angle tables from nucleic-acid conformational analysis reports
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity of the program:
    /// -v for debug and -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert every torsion report in a directory to a clean table, plus one combined table
    Clean(cli::clean::Args),
    /// Stack cleaned CSV tables into one file with a source_file column
    Combine(cli::combine::Args),
    /// Build one master table of backbone angles indexed by position in chain
    Master(cli::master::Args),
    /// Split a multi-model structure file into one file per model
    Split(cli::split::Args),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Clean(args) => cli::clean::run(args),
        Commands::Combine(args) => cli::combine::run(args),
        Commands::Master(args) => cli::master::run(args),
        Commands::Split(args) => cli::split::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

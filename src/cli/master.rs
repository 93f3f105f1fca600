use clap::Parser;
use std::path::PathBuf;
use torsionkit::{master_df, master_dir, write_df_to_file, DataFrameFileType, TableError};
use tracing::{debug, error, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Directory containing the torsion reports
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Glob patterns selecting the reports; files matched by several patterns are read once
    #[arg(
        short,
        long = "pattern",
        default_values_t = [String::from("*-torsions"), String::from("*-torsions.*")]
    )]
    patterns: Vec<String>,

    /// Output CSV file, relative to the root directory unless absolute
    #[arg(short, long, default_value = "master_torsions.csv")]
    output: PathBuf,

    /// Number of threads to use for parallel processing
    #[arg(short = 'j', long = "num-threads", default_value_t = 1)]
    num_threads: usize,
}

pub(crate) fn run(args: &Args) -> Result<(), TableError> {
    trace!("{args:?}");

    let patterns: Vec<&str> = args.patterns.iter().map(String::as_str).collect();
    let outcomes = match master_dir(&args.root, &patterns, args.num_threads) {
        Ok(outcomes) => outcomes,
        Err(e @ TableError::NoInputFound { .. }) => {
            warn!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    info!(
        "Found {} torsion file(s) in {}",
        outcomes.len(),
        args.root.display()
    );

    let mut tables = Vec::new();
    for (path, result) in outcomes {
        match result {
            Ok(table) => {
                debug!("{}: {} rows", path.display(), table.len());
                tables.push(table);
            }
            Err(e) => error!("× Problem with {}: {e}", path.display()),
        }
    }

    let mut df = match master_df(&tables) {
        Ok(df) => df,
        Err(e @ TableError::EmptyInput) => {
            warn!("{e}; no master table written");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let output_file = args.root.join(&args.output);
    write_df_to_file(&mut df, &output_file, DataFrameFileType::Csv)?;
    info!(
        "✓ Master torsion table written to {} ({} rows)",
        output_file.display(),
        df.height()
    );
    Ok(())
}

use clap::Parser;
use std::path::PathBuf;
use torsionkit::{clean_dir, write_combined, DataFrameFileType, ReportKind, TableError};
use tracing::{error, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Directory containing the torsion reports
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Report flavour, which decides the input file names and output naming
    #[arg(short, long, default_value_t = ReportKind::Torsion360)]
    kind: ReportKind,

    /// Output directory (default: the input directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Do not write the combined table of all reports
    #[arg(long = "no-combined", default_value_t = false)]
    no_combined: bool,

    /// Number of threads to use for parallel processing
    #[arg(short = 'j', long = "num-threads", default_value_t = 1)]
    num_threads: usize,
}

pub(crate) fn run(args: &Args) -> Result<(), TableError> {
    trace!("{args:?}");

    let output_dir = args.output.clone().unwrap_or_else(|| args.root.clone());
    let outcomes = match clean_dir(
        &args.root,
        args.kind,
        &output_dir,
        args.output_format,
        args.num_threads,
    ) {
        Ok(outcomes) => outcomes,
        Err(e @ TableError::NoInputFound { .. }) => {
            warn!("{e}. Run this in the folder with those files or pass --root.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    info!("Processed {} {} report(s)", outcomes.len(), args.kind);

    let mut tables = Vec::new();
    for (path, result) in outcomes {
        match result {
            Ok(cleaned) => {
                info!(
                    "✓ {}: {} rows -> {}",
                    cleaned.label,
                    cleaned.table.len(),
                    cleaned.output.display()
                );
                tables.push(cleaned.table);
            }
            Err(e) => error!("× Problem with {}: {e}", path.display()),
        }
    }

    if args.no_combined {
        return Ok(());
    }

    match write_combined(tables, args.kind, &output_dir, args.output_format) {
        Ok((path, rows)) => info!("Combined -> {} ({rows} total rows)", path.display()),
        Err(e @ TableError::EmptyInput) => warn!("{e}; no combined table written"),
        Err(e) => return Err(e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_without_reports_succeeds_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            root: dir.path().to_path_buf(),
            kind: ReportKind::Torsion360,
            output: Some(dir.path().join("out")),
            output_format: DataFrameFileType::Csv,
            no_combined: false,
            num_threads: 1,
        };

        assert!(run(&args).is_ok());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn run_with_only_broken_reports_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x-torsions.txt"), "no table\n").unwrap();
        let args = Args {
            root: dir.path().to_path_buf(),
            kind: ReportKind::Torsions,
            output: None,
            output_format: DataFrameFileType::Csv,
            no_combined: false,
            num_threads: 1,
        };

        assert!(run(&args).is_ok());
        assert!(!dir.path().join("all_torsions_clean.csv").exists());
        assert!(!dir.path().join("x-torsions_clean.csv").exists());
    }
}

use clap::Parser;
use std::path::PathBuf;
use torsionkit::{concat_csv_files, find_inputs, write_df_to_file, DataFrameFileType, TableError};
use tracing::{info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Directory containing the cleaned tables
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Glob pattern selecting the cleaned CSV files
    #[arg(short, long, default_value_t = String::from("*.torsion360_clean.csv"))]
    pattern: String,

    /// Output CSV file, relative to the root directory unless absolute
    #[arg(short, long, default_value = "master_torsion360.csv")]
    output: PathBuf,
}

pub(crate) fn run(args: &Args) -> Result<(), TableError> {
    trace!("{args:?}");

    let files = match find_inputs(&args.root, &[args.pattern.as_str()]) {
        Ok(files) => files,
        Err(e @ TableError::NoInputFound { .. }) => {
            warn!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut df = concat_csv_files(&files, "source_file")?;
    let output_file = args.root.join(&args.output);
    write_df_to_file(&mut df, &output_file, DataFrameFileType::Csv)?;

    info!(
        "Combined {} files ({} rows) into {}",
        files.len(),
        df.height(),
        output_file.display()
    );
    Ok(())
}

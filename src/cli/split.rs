use clap::Parser;
use std::path::PathBuf;
use torsionkit::{read_report, split_models, write_models, TableError};
use tracing::{info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Path to the multi-model PDB file, e.g. an NMR ensemble
    input: PathBuf,

    /// Output directory for the per-model files
    #[arg(short, long, default_value = "models")]
    output: PathBuf,
}

pub(crate) fn run(args: &Args) -> Result<(), TableError> {
    trace!("{args:?}");

    let text = read_report(&args.input)?;
    let blocks = split_models(&text)?;

    let base = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("structure"));
    let written = write_models(&blocks, &base, &args.output)?;
    for path in &written {
        info!("wrote {}", path.display());
    }

    info!(
        "Done. Wrote {} model files to {}",
        written.len(),
        args.output.display()
    );
    Ok(())
}

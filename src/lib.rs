#![warn(missing_docs)]

//! # torsionkit
//!
//! Extract nucleic-acid torsion-angle tables from conformational analysis
//! reports (DSSR `*-torsions.txt` and `*.torsion360.txt` output) and split
//! multi-model structure files into one file per model.
//!
//! The pipeline for a report is always the same: [`locate`] the table between
//! its header line and the next terminator, [`parse`] its whitespace-aligned
//! rows into [`TorsionRow`]s with optional angle fields, and render the
//! resulting [`TorsionTable`] as a Polars DataFrame. Several tables can be
//! stacked with [`combine`].

mod batch;
mod errors;
mod extract;
mod models;
mod nucleotides;
mod reports;
mod rows;
mod table;
mod utils;

// Re-export key public types
pub use batch::{clean_dir, master_dir, write_combined, CleanedFile, FileOutcome};
pub use errors::TableError;
pub use extract::{locate, TableRegion, TABLE_END, TORSION_HEADER};
pub use models::{split_models, write_models, ModelBlock};
pub use nucleotides::{parse_nt, Base, NucleotideId};
pub use reports::ReportKind;
pub use rows::{clean_number, parse, split_fields, Angles, Column, ParsedTable, TorsionRow};
pub use table::{combine, master_df, TorsionTable};
pub use utils::{
    concat_csv_files, find_inputs, output_path, read_report, run_with_threads, write_df_to_file,
    DataFrameFileType,
};

use std::path::Path;
use tracing::debug;

/// Extract the main-chain torsion table from the text of one report.
///
/// Every row is labelled with `source`.
///
/// # Errors
///
/// [`TableError::TableNotFound`] if the report has no torsion table header.
///
/// # Example
///
/// ```
/// use torsionkit::clean_report;
///
/// let report = "\
/// Main chain conformational parameters:
///         nt               alpha    beta   gamma   delta  epsilon   zeta     chi
///  1     C A.C19          -68.5(anti)  170.2     55.1    80.3  -154.1   -70.9   -160.1(anti)
/// ****************************************************************************
/// ";
/// let table = clean_report(report, "1anr").unwrap();
/// let row = &table.rows[0];
/// assert_eq!(row.nt.chain.as_deref(), Some("A"));
/// assert_eq!(row.nt.resi, Some(19));
/// assert_eq!(row.angles.alpha, Some(-68.5));
/// ```
pub fn clean_report(text: &str, source: &str) -> Result<TorsionTable, TableError> {
    let region = locate(text, &TORSION_HEADER, Some(&TABLE_END))?;
    debug!(
        "{source}: table spans bytes {}..{} ({} lines)",
        region.start,
        region.end,
        region.text.lines().count()
    );
    Ok(parse(region.text, &Column::ALL, source).into())
}

/// Read a report file and extract its torsion table, labelling rows with the
/// provenance label `kind` derives from the file name.
pub fn clean_file(path: &Path, kind: ReportKind) -> Result<TorsionTable, TableError> {
    let text = read_report(path)?;
    clean_report(&text, &kind.source_label(path))
}

/// Read a report file for a master table, labelling rows with the file name
/// minus its final extension.
pub fn master_file(path: &Path) -> Result<TorsionTable, TableError> {
    let text = read_report(path)?;
    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    clean_report(&text, &label)
}

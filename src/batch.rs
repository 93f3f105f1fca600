//! Directory-level runs that keep one outcome per input file, so a report
//! that fails to convert never stops the others.

use crate::errors::TableError;
use crate::reports::ReportKind;
use crate::table::{combine, TorsionTable};
use crate::utils::{
    find_inputs, output_path, run_with_threads, write_df_to_file, DataFrameFileType,
};
use crate::{clean_file, master_file};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An input file and what became of it.
pub type FileOutcome<T> = (PathBuf, Result<T, TableError>);

/// A report that was cleaned and written to disk.
#[derive(Debug, Clone)]
pub struct CleanedFile {
    /// Provenance label carried by every row
    pub label: String,
    /// Rows extracted from the report
    pub table: TorsionTable,
    /// Where the cleaned table was written
    pub output: PathBuf,
}

/// Clean every report of `kind` under `root`, writing one table per report
/// into `output_dir`.
///
/// Outcomes come back in input order whatever `num_threads` is.
///
/// # Errors
///
/// [`TableError::NoInputFound`] if `root` holds no report of this kind; the
/// output directory is not created in that case. Failures of single reports
/// are returned in their outcome instead.
pub fn clean_dir(
    root: &Path,
    kind: ReportKind,
    output_dir: &Path,
    format: DataFrameFileType,
    num_threads: usize,
) -> Result<Vec<FileOutcome<CleanedFile>>, TableError> {
    let files = find_inputs(root, &[kind.file_pattern()])?;
    std::fs::create_dir_all(output_dir)?;

    let results = run_with_threads(num_threads, || {
        debug!("Using {} thread(s)", rayon::current_num_threads());
        files
            .par_iter()
            .map(|path| clean_one(path, kind, output_dir, format))
            .collect::<Vec<_>>()
    })?;
    Ok(files.into_iter().zip(results).collect())
}

fn clean_one(
    path: &Path,
    kind: ReportKind,
    output_dir: &Path,
    format: DataFrameFileType,
) -> Result<CleanedFile, TableError> {
    let table = clean_file(path, kind)?;
    let label = kind.source_label(path);
    let output = output_path(output_dir, &kind.output_stem(&label), format);

    let mut df = table.to_df(kind.provenance_column())?;
    write_df_to_file(&mut df, &output, format)?;
    Ok(CleanedFile {
        label,
        table,
        output,
    })
}

/// Write the rows of all `tables` as the combined table of `kind`.
///
/// Returns the written path and the number of rows.
///
/// # Errors
///
/// [`TableError::EmptyInput`] when `tables` is empty; nothing is written.
pub fn write_combined(
    tables: Vec<TorsionTable>,
    kind: ReportKind,
    output_dir: &Path,
    format: DataFrameFileType,
) -> Result<(PathBuf, usize), TableError> {
    let combined = combine(tables)?;
    let path = output_path(output_dir, kind.combined_stem(), format);
    let mut df = combined.to_df(kind.provenance_column())?;
    write_df_to_file(&mut df, &path, format)?;
    Ok((path, combined.len()))
}

/// Read every file under `root` matching `patterns` for a master table.
///
/// # Errors
///
/// [`TableError::NoInputFound`] if nothing matches.
pub fn master_dir(
    root: &Path,
    patterns: &[&str],
    num_threads: usize,
) -> Result<Vec<FileOutcome<TorsionTable>>, TableError> {
    let files = find_inputs(root, patterns)?;
    let results = run_with_threads(num_threads, || {
        debug!("Using {} thread(s)", rayon::current_num_threads());
        files
            .par_iter()
            .map(|path| master_file(path))
            .collect::<Vec<_>>()
    })?;
    Ok(files.into_iter().zip(results).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::master_df;
    use polars::prelude::{CsvReadOptions, SerReader};

    fn test_data(name: &str) -> PathBuf {
        let root = env!("CARGO_MANIFEST_DIR");
        Path::new(root).join("test-data").join(name)
    }

    #[test]
    fn failing_report_does_not_stop_the_others() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::copy(
            test_data("1anr_model01.torsion360.txt"),
            dir.path().join("1anr_model01.torsion360.txt"),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("1anr_model02.torsion360.txt"),
            "Summary only\n*****\n",
        )
        .unwrap();
        let out = dir.path().join("clean");

        let outcomes = clean_dir(
            dir.path(),
            ReportKind::Torsion360,
            &out,
            DataFrameFileType::Csv,
            1,
        )
        .unwrap();
        assert_eq!(outcomes.len(), 2);

        let (good_path, good) = &outcomes[0];
        assert!(good_path.ends_with("1anr_model01.torsion360.txt"));
        let good = good.as_ref().unwrap();
        assert_eq!(good.label, "1anr_model01");
        assert!(good.output.ends_with("1anr_model01.torsion360_clean.csv"));
        assert!(matches!(
            outcomes[1].1,
            Err(TableError::TableNotFound { .. })
        ));

        let tables = outcomes
            .into_iter()
            .filter_map(|(_, result)| result.ok())
            .map(|cleaned| cleaned.table)
            .collect();
        let (combined, rows) =
            write_combined(tables, ReportKind::Torsion360, &out, DataFrameFileType::Csv).unwrap();
        assert_eq!(rows, 3);

        let mut written: Vec<String> = std::fs::read_dir(&out)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        written.sort();
        assert_eq!(
            written,
            vec![
                "1anr_model01.torsion360_clean.csv",
                "ALLMODELS_torsion360_clean.csv"
            ]
        );

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(combined))
            .unwrap()
            .finish()
            .unwrap();
        assert_eq!(df.height(), 3);
        let models = df.column("model").unwrap().str().unwrap();
        assert!(models.into_iter().all(|m| m == Some("1anr_model01")));
    }

    #[test]
    fn empty_directory_has_no_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clean");

        let err = clean_dir(dir.path(), ReportKind::Torsions, &out, DataFrameFileType::Csv, 1)
            .unwrap_err();
        assert!(matches!(err, TableError::NoInputFound { .. }));
        assert!(!out.exists());

        let err = master_dir(dir.path(), &["*-torsions", "*-torsions.*"], 1).unwrap_err();
        assert!(matches!(err, TableError::NoInputFound { .. }));
    }

    #[test]
    fn nothing_to_combine_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_combined(
            Vec::new(),
            ReportKind::Torsions,
            dir.path(),
            DataFrameFileType::Csv,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::EmptyInput));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn master_rows_are_numbered_per_file() {
        let dir = tempfile::tempdir().unwrap();
        // Same stem, so both files carry the same structure label
        for name in ["2kdq_model01-torsions", "2kdq_model01-torsions.txt"] {
            std::fs::copy(test_data("1ANR-torsions.txt"), dir.path().join(name)).unwrap();
        }

        let outcomes = master_dir(dir.path(), &["*-torsions", "*-torsions.*"], 2).unwrap();
        assert_eq!(outcomes.len(), 2);
        let tables: Vec<TorsionTable> = outcomes
            .into_iter()
            .map(|(_, result)| result.unwrap())
            .collect();
        assert_eq!(tables[0].sources(), vec!["2kdq_model01-torsions"]);
        assert_eq!(tables[0].sources(), tables[1].sources());

        let df = master_df(&tables).unwrap();
        let index = df.column("index_in_chain").unwrap().u32().unwrap();
        assert_eq!(
            index.into_no_null_iter().collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 1, 2, 3, 4]
        );
    }
}

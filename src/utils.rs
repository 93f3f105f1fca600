use crate::errors::TableError;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Run `op` on a dedicated rayon pool.
///
/// `num_threads` follows rayon's convention: 0 uses all available cores.
pub fn run_with_threads<R, F>(num_threads: usize, op: F) -> Result<R, TableError>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()?;
    Ok(pool.install(op))
}

/// Files under `root` matching any of `patterns`, sorted and deduplicated.
///
/// # Errors
///
/// [`TableError::NoInputFound`] when nothing matches.
pub fn find_inputs(root: &Path, patterns: &[&str]) -> Result<Vec<PathBuf>, TableError> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let full = Path::new(&escaped_root).join(pattern);
        for path in glob::glob(&full.to_string_lossy())?.filter_map(Result::ok) {
            if path.is_file() && !files.contains(&path) {
                files.push(path);
            }
        }
    }
    files.sort();
    debug!("Found {} file(s) matching {patterns:?} in {}", files.len(), root.display());

    if files.is_empty() {
        return Err(TableError::NoInputFound {
            pattern: patterns.join(", "),
            root: root.to_path_buf(),
        });
    }
    Ok(files)
}

/// Read a report as text, replacing bytes that are not valid UTF-8.
pub fn read_report(path: &Path) -> Result<String, TableError> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `dir/stem.<ext>`, keeping any dots already in `stem`.
pub fn output_path(dir: &Path, stem: &str, file_type: DataFrameFileType) -> PathBuf {
    dir.join(format!("{stem}.{file_type}"))
}

/// Write a DataFrame to `file_path` in the given format
pub fn write_df_to_file(
    df: &mut DataFrame,
    file_path: &Path,
    file_type: DataFrameFileType,
) -> Result<(), TableError> {
    let mut file = std::fs::File::create(file_path)?;
    match file_type {
        DataFrameFileType::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Json => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(df)?;
        }
        DataFrameFileType::NDJson => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::JsonLines)
                .finish(df)?;
        }
    }
    Ok(())
}

/// Read CSV files and stack them, prepending a `label_column` holding each
/// file's base name.
///
/// Files with different column sets are stacked diagonally: columns missing
/// from a file are null for its rows.
pub fn concat_csv_files(files: &[PathBuf], label_column: &str) -> Result<DataFrame, TableError> {
    if files.is_empty() {
        return Err(TableError::EmptyInput);
    }

    let frames = files
        .iter()
        .map(|path| {
            let mut df = CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(path.clone()))?
                .finish()?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let labels = Series::new(label_column.into(), vec![name; df.height()]);
            df.insert_column(0, labels)?;
            Ok(df.lazy())
        })
        .collect::<Result<Vec<LazyFrame>, TableError>>()?;

    let args = UnionArgs {
        to_supertypes: true,
        ..Default::default()
    };
    Ok(concat_lf_diagonal(frames, args)?.collect()?)
}

/// File format for writing DataFrames.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum DataFrameFileType {
    /// Comma-separated values
    Csv,
    /// Parquet columnar storage
    Parquet,
    /// Standard JSON
    Json,
    /// Newline-delimited JSON
    NDJson,
}

impl std::fmt::Display for DataFrameFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataFrameFileType::Csv => write!(f, "csv"),
            DataFrameFileType::Parquet => write!(f, "parquet"),
            DataFrameFileType::Json => write!(f, "json"),
            DataFrameFileType::NDJson => write!(f, "ndjson"),
        }
    }
}

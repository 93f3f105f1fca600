use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a single report (or a whole run) from converting.
///
/// Malformed identifiers and angle tokens are not represented here: they become
/// missing values on the row instead.
#[derive(Error, Debug)]
pub enum TableError {
    /// The table header pattern matched nowhere in the report.
    #[error("couldn't find torsion table header matching `{pattern}`")]
    TableNotFound {
        /// The header pattern that failed
        pattern: String,
    },

    /// No file under the input root matched the naming convention.
    #[error("no files matching `{pattern}` found in {}", root.display())]
    NoInputFound {
        /// Glob pattern(s) that were tried
        pattern: String,
        /// Directory that was searched
        root: PathBuf,
    },

    /// A multi-model file without any `MODEL` record.
    #[error("no MODEL blocks found; is this an NMR ensemble file?")]
    NoModels,

    /// Asked to combine zero tables.
    #[error("nothing to combine: no tables were supplied")]
    EmptyInput,

    /// Reading a report or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An input pattern is not a valid glob.
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Building, reading or writing a DataFrame failed.
    #[error("failed to build DataFrame: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// The worker pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

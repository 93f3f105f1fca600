//! Splitting multi-model structure files (NMR ensembles) into one file per model.

use crate::errors::TableError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

static MODEL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^MODEL\b[ \t]*(?P<serial>-?\d+)?[^\n]*\n")
        .expect("Failed to compile MODEL_LINE")
});

static ENDMDL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^ENDMDL\b").expect("Failed to compile ENDMDL_LINE"));

/// The records of one model, without its `MODEL`/`ENDMDL` lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBlock<'a> {
    /// Position of the model in the file, starting at 1
    pub index: usize,
    /// Serial number printed on the `MODEL` line, if any
    pub serial: Option<i64>,
    /// Records between the markers, newline-terminated unless the file ended early
    pub text: &'a str,
}

impl ModelBlock<'_> {
    /// Output file name, e.g. `1anr_model01.pdb`.
    pub fn file_name(&self, base: &str) -> String {
        format!("{base}_model{:02}.pdb", self.index)
    }
}

/// Split a structure file into its models.
///
/// Everything before the first `MODEL` line is discarded. Each model runs up
/// to its `ENDMDL` line, or to the next `MODEL` line when `ENDMDL` is missing.
/// A `MODEL` line must end with a newline, so a marker on the unterminated
/// last line of the file opens no model.
///
/// # Errors
///
/// [`TableError::NoModels`] if the text holds no `MODEL` line.
pub fn split_models(text: &str) -> Result<Vec<ModelBlock<'_>>, TableError> {
    let markers: Vec<(usize, usize, Option<i64>)> = MODEL_LINE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let serial = caps.name("serial").and_then(|s| s.as_str().parse().ok());
            Some((whole.start(), whole.end(), serial))
        })
        .collect();

    if markers.is_empty() {
        return Err(TableError::NoModels);
    }

    let blocks = markers
        .iter()
        .enumerate()
        .map(|(i, &(_, body_start, serial))| {
            let next = markers.get(i + 1).map_or(text.len(), |m| m.0);
            let body = &text[body_start..next];
            let body = ENDMDL_LINE.find(body).map_or(body, |m| &body[..m.start()]);
            ModelBlock {
                index: i + 1,
                serial,
                text: body,
            }
        })
        .collect::<Vec<_>>();
    debug!("Found {} models", blocks.len());

    Ok(blocks)
}

/// Write every model to `output_dir` as `<base>_modelNN.pdb`.
///
/// The directory is created if needed; each file ends with a newline.
pub fn write_models(
    blocks: &[ModelBlock],
    base: &str,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, TableError> {
    std::fs::create_dir_all(output_dir)?;
    blocks
        .iter()
        .map(|block| {
            let path = output_dir.join(block.file_name(base));
            let mut content = block.text.to_string();
            if !content.ends_with('\n') {
                content.push('\n');
            }
            std::fs::write(&path, content)?;
            Ok(path)
        })
        .collect()
}

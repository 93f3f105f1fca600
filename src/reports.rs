//! Naming conventions of the supported torsion report files.

use std::path::Path;

/// Flavours of torsion report, distinguished by how their files are named.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Per-model reports named `<model>.torsion360.txt`
    Torsion360,
    /// Per-entry reports named `<pdb>-torsions.txt`
    Torsions,
}

impl ReportKind {
    /// Glob pattern matching report files of this kind.
    pub fn file_pattern(&self) -> &'static str {
        match self {
            ReportKind::Torsion360 => "*.torsion360.txt",
            ReportKind::Torsions => "*-torsions.txt",
        }
    }

    /// Name of the provenance column in cleaned output.
    pub fn provenance_column(&self) -> &'static str {
        match self {
            ReportKind::Torsion360 => "model",
            ReportKind::Torsions => "pdb",
        }
    }

    /// Provenance label derived from a report file name, e.g.
    /// `1anr_model01.torsion360.txt` gives `1anr_model01` and
    /// `1ANR-torsions.txt` gives `1anr`.
    pub fn source_label(&self, path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self {
            ReportKind::Torsion360 => name.replace(".torsion360.txt", ""),
            ReportKind::Torsions => name
                .split("-torsions")
                .next()
                .unwrap_or_default()
                .to_lowercase(),
        }
    }

    /// File stem of the cleaned per-report output (extension added by the writer).
    pub fn output_stem(&self, label: &str) -> String {
        match self {
            ReportKind::Torsion360 => format!("{label}.torsion360_clean"),
            ReportKind::Torsions => format!("{label}-torsions_clean"),
        }
    }

    /// File stem of the combined output.
    pub fn combined_stem(&self) -> &'static str {
        match self {
            ReportKind::Torsion360 => "ALLMODELS_torsion360_clean",
            ReportKind::Torsions => "all_torsions_clean",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ReportKind::Torsion360 => write!(f, "torsion360"),
            ReportKind::Torsions => write!(f, "torsions"),
        }
    }
}

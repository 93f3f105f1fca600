//! Parsing the rows of a located torsion table.

use crate::nucleotides::{parse_nt, NucleotideId};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::{trace, warn};

static FIELD_SEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("Failed to compile FIELD_SEP"));

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("Failed to compile NUMBER"));

/// Columns recognized in a torsion table header, in output order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Column {
    /// Nucleotide identifier
    Nt,
    /// Free-text index printed by some report variants
    Id,
    /// Free-text residue name printed by some report variants
    Res,
    /// O3'(i-1)-P-O5'-C5'
    Alpha,
    /// P-O5'-C5'-C4'
    Beta,
    /// O5'-C5'-C4'-C3'
    Gamma,
    /// C5'-C4'-C3'-O3'
    Delta,
    /// C4'-C3'-O3'-P(i+1)
    Epsilon,
    /// C3'-O3'-P(i+1)-O5'(i+1)
    Zeta,
    /// Glycosidic torsion
    Chi,
    /// Sugar pseudorotation phase angle
    PhaseAngle,
}

impl Column {
    /// Every recognized column.
    pub const ALL: [Column; 11] = [
        Column::Nt,
        Column::Id,
        Column::Res,
        Column::Alpha,
        Column::Beta,
        Column::Gamma,
        Column::Delta,
        Column::Epsilon,
        Column::Zeta,
        Column::Chi,
        Column::PhaseAngle,
    ];

    /// The backbone and glycosidic angles reported in master tables.
    pub const BACKBONE: [Column; 7] = [
        Column::Alpha,
        Column::Beta,
        Column::Gamma,
        Column::Delta,
        Column::Epsilon,
        Column::Zeta,
        Column::Chi,
    ];

    /// Lower-case header name.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Nt => "nt",
            Column::Id => "id",
            Column::Res => "res",
            Column::Alpha => "alpha",
            Column::Beta => "beta",
            Column::Gamma => "gamma",
            Column::Delta => "delta",
            Column::Epsilon => "epsilon",
            Column::Zeta => "zeta",
            Column::Chi => "chi",
            Column::PhaseAngle => "phase-angle",
        }
    }

    /// Column for a header name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Column::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Whether the column holds an angle in degrees.
    pub fn is_angle(&self) -> bool {
        !matches!(self, Column::Nt | Column::Id | Column::Res)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Torsion angles of one nucleotide, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Angles {
    /// See [`Column::Alpha`]
    pub alpha: Option<f64>,
    /// See [`Column::Beta`]
    pub beta: Option<f64>,
    /// See [`Column::Gamma`]
    pub gamma: Option<f64>,
    /// See [`Column::Delta`]
    pub delta: Option<f64>,
    /// See [`Column::Epsilon`]
    pub epsilon: Option<f64>,
    /// See [`Column::Zeta`]
    pub zeta: Option<f64>,
    /// See [`Column::Chi`]
    pub chi: Option<f64>,
    /// See [`Column::PhaseAngle`]
    pub phase_angle: Option<f64>,
}

impl Angles {
    /// The value stored for an angle column; `None` for non-angle columns.
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Alpha => self.alpha,
            Column::Beta => self.beta,
            Column::Gamma => self.gamma,
            Column::Delta => self.delta,
            Column::Epsilon => self.epsilon,
            Column::Zeta => self.zeta,
            Column::Chi => self.chi,
            Column::PhaseAngle => self.phase_angle,
            Column::Nt | Column::Id | Column::Res => None,
        }
    }

    fn slot(&mut self, column: Column) -> Option<&mut Option<f64>> {
        match column {
            Column::Alpha => Some(&mut self.alpha),
            Column::Beta => Some(&mut self.beta),
            Column::Gamma => Some(&mut self.gamma),
            Column::Delta => Some(&mut self.delta),
            Column::Epsilon => Some(&mut self.epsilon),
            Column::Zeta => Some(&mut self.zeta),
            Column::Chi => Some(&mut self.chi),
            Column::PhaseAngle => Some(&mut self.phase_angle),
            Column::Nt | Column::Id | Column::Res => None,
        }
    }
}

/// One parsed table row
#[derive(Debug, Clone, PartialEq)]
pub struct TorsionRow {
    /// Provenance label of the report the row came from
    pub source: String,
    /// Decomposed `nt` column
    pub nt: NucleotideId,
    /// Raw `id` column, if the table has one
    pub id: Option<String>,
    /// Raw `res` column, if the table has one
    pub res: Option<String>,
    /// Cleaned angle columns
    pub angles: Angles,
}

impl TorsionRow {
    /// A row with no angles set.
    pub fn new(source: &str, nt: NucleotideId) -> Self {
        Self {
            source: source.to_string(),
            nt,
            id: None,
            res: None,
            angles: Angles::default(),
        }
    }
}

/// Rows of one table together with the columns its header declared.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    /// Recognized header columns, in canonical order, `nt` excluded
    pub columns: Vec<Column>,
    /// Rows in source order
    pub rows: Vec<TorsionRow>,
}

/// Extract the first signed decimal number from a token.
///
/// Annotations such as `(anti)` or `(C3'-endo)` are ignored; a token without
/// any digits (e.g. `---`) yields `None`.
pub fn clean_number(token: &str) -> Option<f64> {
    NUMBER
        .find(token)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Split a data line on runs of two or more spaces or tabs.
pub fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    FIELD_SEP.split(line).collect()
}

/// Parse a table whose first line is the header.
///
/// Only header columns listed in `expected` are kept. When a data line has
/// more fields than the header, the surplus leading fields are an unlabelled
/// row counter and are dropped; missing trailing fields are left empty.
/// Nothing in a row can fail the parse: unreadable values become `None`.
///
/// # Example
///
/// ```
/// use torsionkit::{parse, Base, Column};
///
/// let table = "nt  alpha  beta\nA.C19   -68.5(anti)  ---";
/// let parsed = parse(table, &Column::ALL, "1abc");
/// let row = &parsed.rows[0];
/// assert_eq!(row.nt.chain.as_deref(), Some("A"));
/// assert_eq!(row.nt.base, Some(Base::C));
/// assert_eq!(row.angles.alpha, Some(-68.5));
/// assert_eq!(row.angles.beta, None);
/// ```
pub fn parse(region_text: &str, expected: &[Column], source: &str) -> ParsedTable {
    let mut lines = region_text.lines();
    let header: Vec<Option<Column>> = lines
        .next()
        .unwrap_or("")
        .split_whitespace()
        .map(|name| Column::from_name(name).filter(|c| expected.contains(c)))
        .collect();

    let mut columns: Vec<Column> = header
        .iter()
        .flatten()
        .copied()
        .filter(|c| *c != Column::Nt)
        .collect();
    columns.sort();
    columns.dedup();

    let mut rows = Vec::new();
    for line in lines {
        let fields = split_fields(line);
        if fields.is_empty() {
            continue;
        }
        let surplus = fields.len().saturating_sub(header.len());
        let fields = &fields[surplus..];
        trace!("{source}: {fields:?}");

        let mut row = TorsionRow::new(source, NucleotideId::default());
        let mut nt_token = None;
        for (column, value) in header.iter().zip(fields.iter()) {
            match column {
                Some(Column::Nt) => nt_token = Some(*value),
                Some(Column::Id) => row.id = Some(value.to_string()),
                Some(Column::Res) => row.res = Some(value.to_string()),
                Some(c) => {
                    if let Some(slot) = row.angles.slot(*c) {
                        *slot = clean_number(value);
                    }
                }
                None => {}
            }
        }

        if let Some(token) = nt_token {
            row.nt = parse_nt(token);
        }
        if row.nt.is_missing() {
            warn!("{source}: skipping unrecognized nucleotide identifier in line '{line}'");
        }
        rows.push(row);
    }

    ParsedTable { columns, rows }
}

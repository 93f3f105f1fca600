//! Parsed torsion tables, their concatenation, and DataFrame rendering.

use crate::errors::TableError;
use crate::rows::{Column, ParsedTable, TorsionRow};
use polars::prelude::*;

/// Rows parsed from one or more reports, with the optional columns any of
/// those reports declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TorsionTable {
    /// Optional columns present in the source(s), in canonical order
    pub columns: Vec<Column>,
    /// Rows in source order
    pub rows: Vec<TorsionRow>,
}

impl From<ParsedTable> for TorsionTable {
    fn from(parsed: ParsedTable) -> Self {
        Self {
            columns: parsed.columns,
            rows: parsed.rows,
        }
    }
}

impl TorsionTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct provenance labels in order of first appearance.
    pub fn sources(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.source.as_str()) {
                seen.push(row.source.as_str());
            }
        }
        seen
    }

    fn angle_values(&self, column: Column) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.angles.get(column)).collect()
    }

    /// Render the table with one row per nucleotide.
    ///
    /// Columns: `provenance`, `chain`, `resn`, `resi`, followed by whichever of
    /// `id`, `res` and the angle columns the source table declared. Missing
    /// values are nulls.
    pub fn to_df(&self, provenance: &str) -> PolarsResult<DataFrame> {
        let mut columns: Vec<polars::prelude::Column> = vec![
            Series::new(
                provenance.into(),
                self.rows.iter().map(|r| r.source.clone()).collect::<Vec<String>>(),
            )
            .into(),
            Series::new(
                "chain".into(),
                self.rows.iter().map(|r| r.nt.chain.clone()).collect::<Vec<Option<String>>>(),
            )
            .into(),
            Series::new(
                "resn".into(),
                self.rows
                    .iter()
                    .map(|r| r.nt.base.map(|b| b.to_string()))
                    .collect::<Vec<Option<String>>>(),
            )
            .into(),
            Series::new(
                "resi".into(),
                self.rows.iter().map(|r| r.nt.resi).collect::<Vec<Option<i64>>>(),
            )
            .into(),
        ];

        for column in &self.columns {
            let series = match column {
                Column::Nt => continue,
                Column::Id => Series::new(
                    column.name().into(),
                    self.rows.iter().map(|r| r.id.clone()).collect::<Vec<Option<String>>>(),
                ),
                Column::Res => Series::new(
                    column.name().into(),
                    self.rows.iter().map(|r| r.res.clone()).collect::<Vec<Option<String>>>(),
                ),
                angle => Series::new(angle.name().into(), self.angle_values(*angle)),
            };
            columns.push(series.into());
        }

        DataFrame::new(columns)
    }

    /// Render the table as a master table: `structure`, `index_in_chain` and the
    /// seven backbone angles.
    ///
    /// `index_in_chain` counts rows from 1 in table order; use [`master_df`] to
    /// number several files independently. All seven angle columns are always
    /// present, even if no report declared them.
    pub fn to_master_df(&self) -> PolarsResult<DataFrame> {
        let index_in_chain = (1..=self.rows.len() as u32).collect::<Vec<u32>>();

        df!(
            "structure" => self.rows.iter().map(|r| r.source.clone()).collect::<Vec<String>>(),
            "index_in_chain" => index_in_chain,
            "alpha" => self.angle_values(Column::Alpha),
            "beta" => self.angle_values(Column::Beta),
            "gamma" => self.angle_values(Column::Gamma),
            "delta" => self.angle_values(Column::Delta),
            "epsilon" => self.angle_values(Column::Epsilon),
            "zeta" => self.angle_values(Column::Zeta),
            "chi" => self.angle_values(Column::Chi),
        )
    }
}

/// Concatenate tables in the order given.
///
/// Rows keep their own provenance labels. The result declares every column
/// declared by any input; rows from inputs without a column have it empty.
/// There is no sorting or deduplication.
///
/// # Errors
///
/// [`TableError::EmptyInput`] when `tables` is empty.
///
/// # Example
///
/// ```
/// use torsionkit::{combine, TableError};
///
/// assert!(matches!(combine(Vec::new()), Err(TableError::EmptyInput)));
/// ```
pub fn combine(tables: Vec<TorsionTable>) -> Result<TorsionTable, TableError> {
    if tables.is_empty() {
        return Err(TableError::EmptyInput);
    }

    let mut columns: Vec<Column> = tables.iter().flat_map(|t| t.columns.clone()).collect();
    columns.sort();
    columns.dedup();

    let rows = tables.into_iter().flat_map(|t| t.rows).collect();
    Ok(TorsionTable { columns, rows })
}

/// Stack the master tables of several files in order, restarting
/// `index_in_chain` at 1 for every file.
///
/// # Errors
///
/// [`TableError::EmptyInput`] when `tables` is empty.
pub fn master_df(tables: &[TorsionTable]) -> Result<DataFrame, TableError> {
    let (first, rest) = tables.split_first().ok_or(TableError::EmptyInput)?;
    let mut df = first.to_master_df()?;
    for table in rest {
        df.vstack_mut(&table.to_master_df()?)?;
    }
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nucleotides::{Base, NucleotideId};
    use crate::rows::{parse, Column};

    fn single_row(source: &str, resi: i64, alpha: f64) -> TorsionTable {
        let mut row = TorsionRow::new(source, NucleotideId::new(Some("A"), Base::G, resi));
        row.angles.alpha = Some(alpha);
        TorsionTable {
            columns: vec![Column::Alpha],
            rows: vec![row],
        }
    }

    #[test]
    fn combine_keeps_input_order_and_provenance() {
        let combined = combine(vec![
            single_row("m03", 1, 10.0),
            single_row("m01", 2, 20.0),
            single_row("m02", 3, 30.0),
        ])
        .unwrap();

        assert_eq!(combined.len(), 3);
        assert_eq!(combined.sources(), vec!["m03", "m01", "m02"]);
        let alphas: Vec<_> = combined.rows.iter().map(|r| r.angles.alpha).collect();
        assert_eq!(alphas, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn combine_unions_columns() {
        let a = TorsionTable::from(parse("nt  alpha  chi\nA.G1  1  2", &Column::ALL, "a"));
        let b = TorsionTable::from(parse("nt  id  beta\nA.C2  7  3", &Column::ALL, "b"));
        let combined = combine(vec![a, b]).unwrap();

        assert_eq!(
            combined.columns,
            vec![Column::Id, Column::Alpha, Column::Beta, Column::Chi]
        );
        assert_eq!(combined.rows[0].angles.beta, None);
        assert_eq!(combined.rows[1].angles.chi, None);
    }

    #[test]
    fn combine_of_nothing_is_an_error() {
        assert!(matches!(combine(Vec::new()), Err(TableError::EmptyInput)));
    }

    #[test]
    fn dataframe_has_identifier_and_declared_columns() {
        let table = TorsionTable::from(parse(
            "nt  id  res  alpha  beta\nA.G1  1  G  ---  170.2\nC2  2  C  -68.5  ---",
            &Column::ALL,
            "1abc_model01",
        ));
        let df = table.to_df("model").unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["model", "chain", "resn", "resi", "id", "res", "alpha", "beta"]
        );
        assert_eq!(df.height(), 2);

        let chain = df.column("chain").unwrap().str().unwrap();
        assert_eq!(chain.get(0), Some("A"));
        assert_eq!(chain.get(1), None);

        let alpha = df.column("alpha").unwrap().f64().unwrap();
        assert_eq!(alpha.get(0), None);
        assert_eq!(alpha.get(1), Some(-68.5));
        assert_eq!(alpha.null_count(), 1);
    }

    #[test]
    fn master_dataframe_counts_rows_per_table() {
        let a = TorsionTable::from(parse("nt  alpha\nA.G1  1\nA.C2  2", &Column::ALL, "s1"));
        let b = TorsionTable::from(parse("nt  alpha\nA.G1  3", &Column::ALL, "s2"));
        let df = master_df(&[a, b]).unwrap();

        assert_eq!(df.width(), 9);
        assert_eq!(df.height(), 3);
        let index = df.column("index_in_chain").unwrap().u32().unwrap();
        assert_eq!(index.into_no_null_iter().collect::<Vec<_>>(), vec![1, 2, 1]);
        // Undeclared angles are present but empty
        assert_eq!(df.column("chi").unwrap().null_count(), 3);
    }

    #[test]
    fn master_numbering_restarts_for_repeated_labels() {
        let text = "nt  alpha\nA.G1  1\nA.C2  2";
        let a = TorsionTable::from(parse(text, &Column::ALL, "2kdq_model01-torsions"));
        let b = a.clone();
        let df = master_df(&[a, b]).unwrap();

        let index = df.column("index_in_chain").unwrap().u32().unwrap();
        assert_eq!(index.into_no_null_iter().collect::<Vec<_>>(), vec![1, 2, 1, 2]);
        let structure = df.column("structure").unwrap().str().unwrap();
        assert_eq!(structure.get(3), Some("2kdq_model01-torsions"));
    }

    #[test]
    fn master_of_nothing_is_an_error() {
        assert!(matches!(master_df(&[]), Err(TableError::EmptyInput)));
    }
}

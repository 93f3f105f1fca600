//! Locating an aligned-column table inside a free-form text report.
//!
//! A table starts at the first line matching a header pattern and runs until
//! the first terminator line after it (a run of `*` or the next section title).
//! Without a terminator, the table runs to the end of the text.

use crate::errors::TableError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Header line of the main-chain torsion table, with or without the `id res`
/// columns that some report variants print after `nt`.
pub static TORSION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mi)^[ \t]*nt[ \t]+(?:id[ \t]+res[ \t]+)?alpha[ \t]+beta[ \t]+gamma[ \t]+delta[ \t]+epsilon[ \t]+zeta",
    )
    .expect("Failed to compile TORSION_HEADER")
});

/// A line of five or more asterisks, or the title of the section following
/// the main-chain table.
pub static TABLE_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mR)^[ \t]*(?:\*{5,}[ \t]*$|Virtual eta/theta)")
        .expect("Failed to compile TABLE_END")
});

/// A table located inside a report, borrowed from the report text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRegion<'a> {
    /// Trimmed table text, header line first
    pub text: &'a str,
    /// Byte offset of `text` in the report
    pub start: usize,
    /// Byte offset one past the end of `text` in the report
    pub end: usize,
}

impl<'a> TableRegion<'a> {
    /// The header line of the table.
    pub fn header(&self) -> &'a str {
        self.text.lines().next().unwrap_or("")
    }

    /// Lines following the header.
    pub fn body(&self) -> impl Iterator<Item = &'a str> {
        self.text.lines().skip(1)
    }
}

/// Find the table whose first line matches `header`.
///
/// The search for `end` starts on the line after the header, so the header can
/// never terminate its own table. The terminator line itself is excluded from
/// the region.
///
/// # Errors
///
/// [`TableError::TableNotFound`] if no line matches `header`.
///
/// # Example
///
/// ```
/// use torsionkit::{locate, TABLE_END, TORSION_HEADER};
///
/// let report = "intro\nnt  alpha  beta  gamma  delta  epsilon  zeta\nA.G1  1  2  3  4  5  6\n*****\nrest";
/// let region = locate(report, &TORSION_HEADER, Some(&TABLE_END)).unwrap();
/// assert!(region.text.starts_with("nt"));
/// assert!(region.text.ends_with("6"));
/// ```
pub fn locate<'a>(
    text: &'a str,
    header: &Regex,
    end: Option<&Regex>,
) -> Result<TableRegion<'a>, TableError> {
    let header_match = header
        .find(text)
        .ok_or_else(|| TableError::TableNotFound {
            pattern: header.as_str().to_string(),
        })?;

    // Unanchored header patterns may match mid-line
    let start = line_start(text, header_match.start());
    let body_start = text[header_match.end()..]
        .find('\n')
        .map_or(text.len(), |i| header_match.end() + i + 1);

    let stop = end
        .and_then(|re| re.find_at(text, body_start))
        .map_or(text.len(), |m| line_start(text, m.start()));

    let raw = &text[start..stop];
    let trimmed = raw.trim();
    let offset = start + (raw.len() - raw.trim_start().len());

    Ok(TableRegion {
        text: trimmed,
        start: offset,
        end: offset + trimmed.len(),
    })
}

fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
List of 3 nucleotides
****************************************************************************
Main chain conformational parameters:

        nt               alpha    beta   gamma   delta  epsilon   zeta
 1     G A.G1             ---     ---     51.6    81.9  -150.8   -77.4
 2     C A.C2           -68.5   170.2     55.1    80.3  -154.1   -70.9
****************************************************************************
Virtual eta/theta torsion angles:
";

    #[test]
    fn region_starts_at_header_and_excludes_terminator() {
        let region = locate(REPORT, &TORSION_HEADER, Some(&TABLE_END)).unwrap();

        assert!(region.header().starts_with("nt"));
        assert_eq!(region.body().count(), 2);
        assert!(!region.text.contains('*'));
        assert!(!region.text.contains("Virtual"));
        assert_eq!(&REPORT[region.start..region.end], region.text);
    }

    #[test]
    fn terminator_before_header_is_ignored() {
        // The first asterisk line precedes the header and must not end the table
        let region = locate(REPORT, &TORSION_HEADER, Some(&TABLE_END)).unwrap();
        assert!(region.text.ends_with("-70.9"));
    }

    #[test]
    fn section_title_terminates_without_asterisks() {
        let text = "nt  alpha  beta  gamma  delta  epsilon  zeta\nA.G1  1  2  3  4  5  6\nVirtual eta/theta torsion angles:\nA.G1  7  8\n";
        let region = locate(text, &TORSION_HEADER, Some(&TABLE_END)).unwrap();
        assert_eq!(region.body().collect::<Vec<_>>(), vec!["A.G1  1  2  3  4  5  6"]);
    }

    #[test]
    fn missing_terminator_runs_to_end_of_text() {
        let text = "nt  alpha  beta  gamma  delta  epsilon  zeta\nA.G1  1  2  3  4  5  6\nA.C2  1  2  3  4  5  6\n\n";
        let region = locate(text, &TORSION_HEADER, Some(&TABLE_END)).unwrap();
        assert_eq!(region.body().count(), 2);
        assert_eq!(region.end, text.trim_end().len());

        let no_end = locate(text, &TORSION_HEADER, None).unwrap();
        assert_eq!(region, no_end);
    }

    #[test]
    fn header_with_id_res_and_mixed_case() {
        let text = "NT  id  res  Alpha  beta  gamma  delta  epsilon  zeta  chi\n1  A.G1  G  1  2  3  4  5  6  7\n*****\n";
        let region = locate(text, &TORSION_HEADER, Some(&TABLE_END)).unwrap();
        assert!(region.header().starts_with("NT  id  res"));
        assert_eq!(region.body().count(), 1);
    }

    #[test]
    fn crlf_terminator_is_recognized() {
        let text = "nt  alpha  beta  gamma  delta  epsilon  zeta\r\nA.G1  1  2  3  4  5  6\r\n*******\r\ntrailer\r\n";
        let region = locate(text, &TORSION_HEADER, Some(&TABLE_END)).unwrap();
        assert!(!region.text.contains('*'));
        assert!(!region.text.contains("trailer"));
    }

    #[test]
    fn missing_header_is_reported() {
        let err = locate("no table here\n*****\n", &TORSION_HEADER, Some(&TABLE_END)).unwrap_err();
        match err {
            TableError::TableNotFound { pattern } => assert!(pattern.contains("alpha")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

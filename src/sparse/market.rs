//! Plain-text sparse coordinate format.
//!
//! ```text
//! % comment lines start with a percent sign
//! 3 3 2          <- rows cols nnz
//! 1 1 4.5        <- row col value, 1-indexed
//! 3 2 -1.0
//! ```

use super::csr::CsrMatrix;
use crate::error::{MatbenchError, Result};
use std::path::Path;
use std::str::FromStr;

/// Parses coordinate-format text into a CSR matrix.
///
/// Comment lines (`%`) and blank lines are skipped anywhere. The first
/// remaining line is the `rows cols nnz` header, followed by exactly `nnz`
/// entry lines.
///
/// # Errors
///
/// `MalformedInput` for an empty or all-comment input, a bad header (including
/// one declaring more entries than `rows * cols` cells), an unparsable or
/// zero-indexed entry, too few or too many entries.
/// `InvalidIndex` if an entry falls outside the declared shape. No partial
/// matrix is ever returned.
pub fn parse_market(text: &str) -> Result<CsrMatrix> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('%'));

    let (header_line, header) = lines.next().ok_or_else(|| MatbenchError::MalformedInput {
        line: 0,
        reason: "no header line".to_string(),
    })?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(malformed(
            header_line,
            format!("header needs `rows cols nnz`, got {} fields", fields.len()),
        ));
    }
    let rows: usize = field(&fields, 0, header_line)?;
    let cols: usize = field(&fields, 1, header_line)?;
    let nnz: usize = field(&fields, 2, header_line)?;
    if rows.checked_add(1).is_none() {
        return Err(malformed(header_line, format!("row count {} is too large", rows)));
    }
    match rows.checked_mul(cols) {
        Some(cells) if nnz <= cells => {}
        _ => {
            return Err(malformed(
                header_line,
                format!("{} entries cannot fit a {}x{} matrix", nnz, rows, cols),
            ));
        }
    }

    // Sized by what the text actually holds, not by the header's claim.
    let mut triplets = Vec::new();
    for (line_no, line) in lines {
        if triplets.len() == nnz {
            return Err(malformed(
                line_no,
                format!("more than the {} declared entries", nnz),
            ));
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(malformed(
                line_no,
                format!("entry needs `row col value`, got {} fields", fields.len()),
            ));
        }
        let row: usize = field(&fields, 0, line_no)?;
        let col: usize = field(&fields, 1, line_no)?;
        let value: f64 = field(&fields, 2, line_no)?;
        if row == 0 || col == 0 {
            return Err(malformed(line_no, "indices are 1-based".to_string()));
        }
        triplets.push((row - 1, col - 1, value));
    }

    if triplets.len() != nnz {
        return Err(malformed(
            text.lines().count(),
            format!("expected {} entries, found {}", nnz, triplets.len()),
        ));
    }

    CsrMatrix::build(rows, cols, &triplets)
}

/// Reads and parses a coordinate-format file.
pub fn load_market(path: impl AsRef<Path>) -> Result<CsrMatrix> {
    let text = std::fs::read_to_string(path)?;
    parse_market(&text)
}

fn field<T: FromStr>(fields: &[&str], idx: usize, line: usize) -> Result<T> {
    fields[idx]
        .parse()
        .map_err(|_| malformed(line, format!("cannot parse `{}`", fields[idx])))
}

fn malformed(line: usize, reason: String) -> MatbenchError {
    MatbenchError::MalformedInput { line, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let text = "%%MatrixMarket matrix coordinate real general\n\
                    % a comment\n\
                    3 3 3\n\
                    1 1 4.5\n\
                    3 2 -1.0\n\
                    2 3 2e-1\n";
        let m = parse_market(text).unwrap();
        assert_eq!((m.rows(), m.cols(), m.nnz()), (3, 3, 3));
        assert_eq!(
            m.to_dense(),
            vec![4.5, 0.0, 0.0, 0.0, 0.0, 0.2, 0.0, -1.0, 0.0]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            parse_market(""),
            Err(MatbenchError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_market("% only\n% comments\n"),
            Err(MatbenchError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(
            parse_market("3 three 1\n1 1 1.0\n"),
            Err(MatbenchError::MalformedInput { line: 1, .. })
        ));
        assert!(parse_market("3 3\n").is_err());
    }

    #[test]
    fn test_bad_entry_reports_line() {
        let err = parse_market("2 2 2\n1 1 1.0\n2 x 1.0\n").unwrap_err();
        assert!(matches!(err, MatbenchError::MalformedInput { line: 3, .. }));
    }

    #[test]
    fn test_entry_count_mismatch() {
        assert!(parse_market("2 2 2\n1 1 1.0\n").is_err());
        assert!(parse_market("2 2 1\n1 1 1.0\n2 2 1.0\n").is_err());
    }

    #[test]
    fn test_zero_index() {
        assert!(matches!(
            parse_market("2 2 1\n0 1 1.0\n"),
            Err(MatbenchError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_huge_nnz_in_header() {
        assert!(matches!(
            parse_market("3 3 18446744073709551615\n1 1 1.0\n"),
            Err(MatbenchError::MalformedInput { line: 1, .. })
        ));
        assert!(matches!(
            parse_market("2 2 5\n1 1 1.0\n"),
            Err(MatbenchError::MalformedInput { line: 1, .. })
        ));
    }

    #[test]
    fn test_huge_dimensions_in_header() {
        assert!(matches!(
            parse_market("18446744073709551615 3 1\n1 1 1.0\n"),
            Err(MatbenchError::MalformedInput { line: 1, .. })
        ));
        assert!(matches!(
            parse_market("4294967296 4294967296 1\n1 1 1.0\n"),
            Err(MatbenchError::MalformedInput { line: 1, .. })
        ));
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(matches!(
            parse_market("2 2 1\n3 1 1.0\n"),
            Err(MatbenchError::InvalidIndex { .. })
        ));
    }
}

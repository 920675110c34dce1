use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use super::Cell;

/// How a short row is padded out to the widest row's length.
///
/// Either way the last cell of a padded row is `Cell::Empty`; the modes only
/// differ in what goes between the row's old end and that last cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    /// Intermediate cells are left as `Cell::Hole`. Matches files produced
    /// by the older spreadsheet scripts.
    #[default]
    Holes,
    /// Every missing cell becomes `Cell::Empty`.
    Fill,
}

impl FromStr for Padding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "holes" | "hole" => Ok(Padding::Holes),
            "fill" => Ok(Padding::Fill),
            other => anyhow::bail!("unknown padding mode {:?} (expected `holes` or `fill`)", other),
        }
    }
}

/// Pads jagged matrices so every row has the same length.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    padding: Padding,
}

impl Normalizer {
    pub fn new(padding: Padding) -> Self {
        Self { padding }
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Pad every row of `rows` in place to the current maximum row length.
    /// An empty matrix, or one that is already rectangular, is left as is.
    pub fn normalize_in_place(&self, rows: &mut [Vec<Cell>]) {
        let max = max_row_len(rows);
        let gap = match self.padding {
            Padding::Holes => Cell::Hole,
            Padding::Fill => Cell::Empty,
        };

        let mut padded = 0usize;
        for row in rows.iter_mut().filter(|r| r.len() < max) {
            row.resize(max - 1, gap.clone());
            row.push(Cell::Empty);
            padded += 1;
        }
        if padded > 0 {
            debug!(padded, width = max, padding = ?self.padding, "normalized jagged rows");
        }
    }

    /// Non-mutating variant: returns a padded copy of `rows`.
    pub fn normalized(&self, rows: &[Vec<Cell>]) -> Vec<Vec<Cell>> {
        let mut out = rows.to_vec();
        self.normalize_in_place(&mut out);
        out
    }

    /// Absent rows (`None`) become empty rows, then the result is padded.
    pub fn normalize_sparse(&self, rows: Vec<Option<Vec<Cell>>>) -> Vec<Vec<Cell>> {
        let mut out: Vec<Vec<Cell>> = rows.into_iter().map(Option::unwrap_or_default).collect();
        self.normalize_in_place(&mut out);
        out
    }
}

/// Length of the longest row, `0` for an empty matrix.
pub fn max_row_len<T>(rows: &[Vec<T>]) -> usize {
    rows.iter().map(Vec::len).max().unwrap_or(0)
}

/// `true` when all rows share one length. Vacuously true for no rows.
pub fn is_rectangular<T>(rows: &[Vec<T>]) -> bool {
    match rows.first() {
        Some(first) => rows.iter().all(|r| r.len() == first.len()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_rows(rows: &[&[&str]]) -> Vec<Vec<Cell>> {
        rows.iter()
            .map(|r| r.iter().map(|s| Cell::from(*s)).collect())
            .collect()
    }

    #[test]
    fn test_rectangular_is_unchanged() {
        let original = text_rows(&[&["a", "b"], &["c", "d"]]);
        for padding in [Padding::Holes, Padding::Fill] {
            let mut m = original.clone();
            Normalizer::new(padding).normalize_in_place(&mut m);
            assert_eq!(m, original);
        }
    }

    #[test]
    fn test_hole_padding_sets_only_last_cell() {
        let mut m = text_rows(&[&["a"], &["b", "c", "d"], &[]]);
        Normalizer::new(Padding::Holes).normalize_in_place(&mut m);
        assert_eq!(m[0], vec![Cell::from("a"), Cell::Hole, Cell::Empty]);
        assert_eq!(m[1], text_rows(&[&["b", "c", "d"]])[0]);
        assert_eq!(m[2], vec![Cell::Hole, Cell::Hole, Cell::Empty]);
    }

    #[test]
    fn test_fill_padding_fills_every_gap() {
        let m = text_rows(&[&["a"], &["b", "c", "d"]]);
        let out = Normalizer::new(Padding::Fill).normalized(&m);
        assert_eq!(out[0], vec![Cell::from("a"), Cell::Empty, Cell::Empty]);
        // non-mutating variant leaves the input alone
        assert_eq!(m[0].len(), 1);
    }

    #[test]
    fn test_every_row_reaches_previous_max() {
        let m = text_rows(&[&["a", "b"], &["c"], &["d", "e", "f", "g"], &[]]);
        let before = max_row_len(&m);
        let out = Normalizer::default().normalized(&m);
        assert!(is_rectangular(&out));
        assert!(out.iter().all(|r| r.len() == before));
    }

    #[test]
    fn test_sparse_rows() {
        let rows = vec![None, Some(vec![Cell::from("x"), Cell::from("y")]), None];
        let out = Normalizer::new(Padding::Fill).normalize_sparse(rows);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], vec![Cell::Empty, Cell::Empty]);
        assert_eq!(out[2], vec![Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn test_empty_inputs_are_noops() {
        let mut none: Vec<Vec<Cell>> = Vec::new();
        Normalizer::default().normalize_in_place(&mut none);
        assert!(none.is_empty());

        let all_absent = Normalizer::default().normalize_sparse(vec![None, None]);
        assert_eq!(all_absent, vec![Vec::<Cell>::new(), Vec::new()]);
    }

    #[test]
    fn test_padding_from_str() {
        assert_eq!("fill".parse::<Padding>().unwrap(), Padding::Fill);
        assert_eq!(" Holes ".parse::<Padding>().unwrap(), Padding::Holes);
        assert!("zeros".parse::<Padding>().is_err());
    }
}

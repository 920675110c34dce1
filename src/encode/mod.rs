use std::{
    fmt::Display,
    io::{self, Write},
};
use tracing::debug;

use crate::matrix::HOLE_PLACEHOLDER;

pub const DEFAULT_DELIMITER: char = ',';

/// Delimiter-and-newline text encoder.
///
/// Each cell is written as its `Display` form followed by the delimiter, so
/// every line ends in `<last cell>,\n`. Nothing is quoted or escaped: a
/// cell containing the delimiter or a newline produces a corrupt line.
#[derive(Debug, Clone, Copy)]
pub struct CsvEncoder {
    delimiter: char,
}

impl Default for CsvEncoder {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl CsvEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Encode `rows` into a single string.
    ///
    /// No rows, or a first row with no cells, gives `""`. The first row's
    /// length fixes the column count: extra cells in later rows are dropped
    /// and missing ones are written as `undefined`.
    pub fn encode<T: Display>(&self, rows: &[Vec<T>]) -> String {
        let Some(width) = column_count(rows) else {
            return String::new();
        };
        rows.iter().map(|row| self.line(row, width)).collect()
    }

    /// Same output as [`encode`](Self::encode), written line by line to `out`.
    /// Returns the number of lines written.
    pub fn encode_to<T: Display, W: Write>(&self, mut out: W, rows: &[Vec<T>]) -> io::Result<usize> {
        let Some(width) = column_count(rows) else {
            return Ok(0);
        };
        for row in rows {
            out.write_all(self.line(row, width).as_bytes())?;
        }
        out.flush()?;
        debug!(lines = rows.len(), width, "encoded rows");
        Ok(rows.len())
    }

    fn line<T: Display>(&self, row: &[T], width: usize) -> String {
        let mut line = String::new();
        for idx in 0..width {
            match row.get(idx) {
                Some(cell) => line.push_str(&cell.to_string()),
                None => line.push_str(HOLE_PLACEHOLDER),
            }
            line.push(self.delimiter);
        }
        line.push('\n');
        line
    }
}

/// Encode with the default `,` delimiter.
pub fn encode<T: Display>(rows: &[Vec<T>]) -> String {
    CsvEncoder::default().encode(rows)
}

fn column_count<T>(rows: &[Vec<T>]) -> Option<usize> {
    rows.first().map(Vec::len).filter(|&n| n > 0)
}

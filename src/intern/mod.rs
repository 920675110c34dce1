// src/intern/mod.rs
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::{collections::HashMap, fmt::Display};
use tracing::trace;

use crate::error::{assert_or_die, AssertionFailure};

/// Dense integer id of an interned value. The first distinct value gets 1.
pub type Code = u32;

/// Canonical string form → code, plus the reverse direction.
///
/// Serializes as a JSON object whose keys appear in code order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: HashMap<String, Code>,
    /// `values[code - 1]` is the string that owns `code`.
    values: Vec<String>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn code_of(&self, value: &str) -> Option<Code> {
        self.codes.get(value).copied()
    }

    pub fn value_of(&self, code: Code) -> Option<&str> {
        let idx = (code as usize).checked_sub(1)?;
        self.values.get(idx).map(String::as_str)
    }

    /// `(value, code)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Code)> {
        self.values
            .iter()
            .zip(1..)
            .map(|(value, code)| (value.as_str(), code))
    }
}

impl Serialize for CodeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (value, code) in self.iter() {
            map.serialize_entry(value, &code)?;
        }
        map.end()
    }
}

/// Assigns codes in first-occurrence order.
///
/// One `Interner` is one interning run: codes are never reused or
/// reassigned while it lives. [`intern`] creates a fresh one per call; keep
/// your own to intern several matrices against a shared table.
#[derive(Debug, Clone)]
pub struct Interner {
    table: CodeTable,
    next_code: Code,
}

impl Default for Interner {
    fn default() -> Self {
        Self {
            table: CodeTable::new(),
            next_code: 1,
        }
    }
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code for `value`'s canonical (`Display`) form, minting one if unseen.
    pub fn intern_value<T: Display + ?Sized>(&mut self, value: &T) -> Result<Code, AssertionFailure> {
        let key = value.to_string();
        if !self.table.codes.contains_key(&key) {
            trace!(code = self.next_code, value = %key, "new code");
            self.table.codes.insert(key.clone(), self.next_code);
            self.table.values.push(key.clone());
            self.next_code += 1;
        }

        let code = self
            .table
            .code_of(&key)
            .ok_or_else(|| AssertionFailure::new(format!("no code for {:?} after insertion", key)))?;
        assert_or_die(
            self.table.value_of(code) == Some(key.as_str()),
            Some("code table and reverse table disagree"),
        )?;
        Ok(code)
    }

    /// Row-major pass over `rows`; the result has the same shape.
    pub fn intern_matrix<T: Display>(&mut self, rows: &[Vec<T>]) -> Result<Vec<Vec<Code>>, AssertionFailure> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|cell| self.intern_value(cell))
                    .collect::<Result<Vec<Code>, _>>()
            })
            .collect()
    }

    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    pub fn into_table(self) -> CodeTable {
        self.table
    }
}

/// Result of [`intern`]: the code matrix and the table that explains it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Interned {
    pub codes: Vec<Vec<Code>>,
    pub table: CodeTable,
}

impl Interned {
    /// Map every code back to its canonical string.
    pub fn decode(&self) -> Result<Vec<Vec<&str>>, AssertionFailure> {
        self.codes
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&code| {
                        self.table
                            .value_of(code)
                            .ok_or_else(|| AssertionFailure::new(format!("code {} has no table entry", code)))
                    })
                    .collect::<Result<Vec<&str>, _>>()
            })
            .collect()
    }
}

/// Replace every cell of `rows` by a dense code.
///
/// Two cells share a code iff their `Display` output is identical, so
/// `Cell::Number(5.0)` and `Cell::Text("5")` merge. Empty input gives an
/// empty table and a code matrix of the same (empty) shape.
pub fn intern<T: Display>(rows: &[Vec<T>]) -> Result<Interned, AssertionFailure> {
    let mut interner = Interner::new();
    let codes = interner.intern_matrix(rows)?;
    Ok(Interned {
        codes,
        table: interner.into_table(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Cell;
    use std::collections::BTreeSet;

    #[test]
    fn test_intern_example() {
        let out = intern(&[vec!["a", "b"], vec!["b", "a"]]).unwrap();
        assert_eq!(out.codes, vec![vec![1, 2], vec![2, 1]]);
        assert_eq!(out.table.code_of("a"), Some(1));
        assert_eq!(out.table.code_of("b"), Some(2));
        assert_eq!(out.table.len(), 2);
    }

    #[test]
    fn test_number_and_text_with_same_form_share_a_code() {
        let out = intern(&[vec![Cell::from(5_i32), Cell::from("5")]]).unwrap();
        assert_eq!(out.codes, vec![vec![1, 1]]);
        assert_eq!(out.table.len(), 1);
    }

    #[test]
    fn test_exponent_form_numbers_merge_with_matching_text() {
        let out = intern(&[vec![
            Cell::Number(1e-7),
            Cell::from("1e-7"),
            Cell::Number(1e21),
            Cell::from("1e+21"),
        ]])
        .unwrap();
        assert_eq!(out.codes, vec![vec![1, 1, 2, 2]]);
    }

    #[test]
    fn test_empty_inputs() {
        let none: Vec<Vec<Cell>> = Vec::new();
        let out = intern(&none).unwrap();
        assert!(out.codes.is_empty());
        assert!(out.table.is_empty());

        let blank_rows: Vec<Vec<Cell>> = vec![vec![], vec![]];
        let out = intern(&blank_rows).unwrap();
        assert_eq!(out.codes, vec![Vec::<Code>::new(), Vec::new()]);
        assert!(out.table.is_empty());
    }

    #[test]
    fn test_deterministic_across_calls() {
        let m = vec![
            vec![Cell::from("x"), Cell::from(1.5), Cell::Empty],
            vec![Cell::from(true), Cell::from("x"), Cell::Hole],
        ];
        assert_eq!(intern(&m).unwrap(), intern(&m).unwrap());
    }

    #[test]
    fn test_codes_are_injective_and_dense() {
        let m = vec![
            vec!["red", "green", "red", "blue"],
            vec!["blue", "blue", "cyan", "green"],
        ];
        let out = intern(&m).unwrap();

        for (r, row) in m.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                for (r2, row2) in m.iter().enumerate() {
                    for (c2, value2) in row2.iter().enumerate() {
                        assert_eq!(value == value2, out.codes[r][c] == out.codes[r2][c2]);
                    }
                }
            }
        }

        let distinct: BTreeSet<Code> = out.codes.iter().flatten().copied().collect();
        assert_eq!(distinct, (1..=4).collect::<BTreeSet<Code>>());
        // first-occurrence order, row-major
        assert_eq!(
            out.table.iter().collect::<Vec<_>>(),
            vec![("red", 1), ("green", 2), ("blue", 3), ("cyan", 4)]
        );
    }

    #[test]
    fn test_decode_restores_canonical_strings() {
        let m = vec![vec![Cell::from(2.0), Cell::Hole], vec![Cell::Empty, Cell::from("2")]];
        let out = intern(&m).unwrap();
        assert_eq!(out.decode().unwrap(), vec![vec!["2", "undefined"], vec!["", "2"]]);
    }

    #[test]
    fn test_decode_unknown_code_is_assertion_failure() {
        let out = Interned {
            codes: vec![vec![7]],
            table: CodeTable::new(),
        };
        assert!(out.decode().is_err());
    }

    #[test]
    fn test_shared_interner_keeps_counting() {
        let mut interner = Interner::new();
        let first = interner.intern_matrix(&[vec!["a", "b"]]).unwrap();
        let second = interner.intern_matrix(&[vec!["b", "c"]]).unwrap();
        assert_eq!(first, vec![vec![1, 2]]);
        assert_eq!(second, vec![vec![2, 3]]);
        assert_eq!(interner.table().value_of(3), Some("c"));
        assert_eq!(interner.table().value_of(0), None);
    }

    #[test]
    fn test_table_serializes_in_code_order() {
        let out = intern(&[vec!["b", "a", "b"]]).unwrap();
        assert_eq!(serde_json::to_string(&out.table).unwrap(), r#"{"b":1,"a":2}"#);
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            r#"{"codes":[[1,2,1]],"table":{"b":1,"a":2}}"#
        );
    }
}

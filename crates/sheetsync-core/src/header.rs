use std::collections::HashMap;

use crate::error::{Result, SyncError};

/// A named column of the header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// Header text
    pub name: String,
    /// 0-based column of the header cell on the wire
    pub source_col: usize,
}

/// Mapping between dense field positions, wire columns and header names.
///
/// Blank header cells are not fields, but they still count towards `width`;
/// such a column is "reserved": every row carries a cell for it and nothing
/// ever projects or writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    fields: Vec<HeaderField>,
    by_name: HashMap<String, usize>,
    width: usize,
}

impl HeaderIndex {
    /// Build the index from a header row, scanning left to right.
    ///
    /// An all-blank row gives an empty index. Repeated names are rejected.
    pub fn parse<S: AsRef<str>>(row: &[S]) -> Result<Self> {
        let mut fields: Vec<HeaderField> = Vec::with_capacity(row.len());
        let mut by_name: HashMap<String, usize> = HashMap::with_capacity(row.len());

        for (col, cell) in row.iter().enumerate() {
            let name = cell.as_ref();
            if name.is_empty() {
                continue;
            }
            if let Some(&pos) = by_name.get(name) {
                return Err(SyncError::DuplicateHeader {
                    name: name.to_string(),
                    first: fields[pos].source_col,
                    second: col,
                });
            }
            by_name.insert(name.to_string(), fields.len());
            fields.push(HeaderField {
                name: name.to_string(),
                source_col: col,
            });
        }

        Ok(HeaderIndex {
            fields,
            by_name,
            width: row.len(),
        })
    }

    /// Number of cells in the header row, named or not
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of named fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[HeaderField] {
        &self.fields
    }

    /// Field names in header order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Wire column of the field at a dense position
    pub fn source_col(&self, pos: usize) -> Option<usize> {
        self.fields.get(pos).map(|f| f.source_col)
    }

    /// Dense position of a field name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Whether a column lies inside the header width but has a blank header
    pub fn is_reserved(&self, source_col: usize) -> bool {
        source_col < self.width
            && self
                .fields
                .binary_search_by_key(&source_col, |f| f.source_col)
                .is_err()
    }
}

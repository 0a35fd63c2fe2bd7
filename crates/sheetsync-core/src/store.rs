use std::sync::Arc;

use crate::diff::PendingWrite;
use crate::error::Result;
use crate::header::HeaderIndex;
use crate::record::Record;

/// Last-known remote rows plus the editable projection derived from them.
///
/// Every snapshot row is exactly `header.width()` cells wide. Projection row
/// `i` is built from snapshot row `i`.
#[derive(Debug, Clone)]
pub struct RowStore {
    header: Arc<HeaderIndex>,
    snapshot: Vec<Vec<String>>,
    projection: Vec<Record>,
}

impl RowStore {
    /// Build a store from a header row and the data rows below it.
    ///
    /// Data rows are cut or padded with empty strings to the header width.
    pub fn new<S: AsRef<str>>(header_row: &[S], data_rows: &[Vec<S>]) -> Result<Self> {
        let header = HeaderIndex::parse(header_row)?;
        let width = header.width();

        let snapshot = data_rows
            .iter()
            .map(|row| {
                let mut cells: Vec<String> = row
                    .iter()
                    .take(width)
                    .map(|c| c.as_ref().to_string())
                    .collect();
                cells.resize(width, String::new());
                cells
            })
            .collect();

        let mut store = RowStore {
            header: Arc::new(header),
            snapshot,
            projection: Vec::new(),
        };
        store.discard_changes();
        Ok(store)
    }

    pub fn header(&self) -> &HeaderIndex {
        &self.header
    }

    pub fn snapshot(&self) -> &[Vec<String>] {
        &self.snapshot
    }

    pub fn rows(&self) -> &[Record] {
        &self.projection
    }

    pub fn rows_mut(&mut self) -> &mut [Record] {
        &mut self.projection
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Rebuild the projection from the snapshot, dropping unsent edits
    pub fn discard_changes(&mut self) {
        self.projection = self
            .snapshot
            .iter()
            .map(|row| {
                let values = self
                    .header
                    .fields()
                    .iter()
                    .map(|f| row.get(f.source_col).cloned().unwrap_or_default())
                    .collect();
                Record::new(Arc::clone(&self.header), values)
            })
            .collect();
    }

    /// Lay out a partial record as a full-width wire row.
    ///
    /// Missing fields stay empty and names outside the header are ignored.
    pub fn align_row<I, K, V>(&self, fields: I) -> Vec<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut row = vec![String::new(); self.header.width()];
        for (name, value) in fields {
            if let Some(col) = self
                .header
                .position(name.as_ref())
                .and_then(|pos| self.header.source_col(pos))
            {
                row[col] = value.into();
            }
        }
        row
    }

    /// Add rows that are now known to exist remotely and rebuild the projection
    pub fn extend(&mut self, rows: Vec<Vec<String>>) {
        self.snapshot.extend(rows);
        self.discard_changes();
    }

    /// Projection cells that differ from the snapshot
    pub fn pending_writes(&self) -> Result<Vec<PendingWrite>> {
        crate::diff::pending_writes(&self.header, &self.snapshot, &self.projection)
    }

    /// Fold confirmed writes into the snapshot
    pub fn apply(&mut self, writes: &[PendingWrite]) {
        for write in writes {
            if let Some(cell) = self
                .snapshot
                .get_mut(write.row)
                .and_then(|row| row.get_mut(write.col))
            {
                cell.clone_from(&write.value);
            }
        }
    }
}

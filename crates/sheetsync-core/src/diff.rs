use std::sync::Arc;

use crate::error::{Result, SyncError};
use crate::header::HeaderIndex;
use crate::model::{MajorDimension, ValueRange};
use crate::range::{CellRef, RangeAddress};
use crate::record::Record;

/// A projection cell whose value differs from the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    /// 0-based data row
    pub row: usize,
    /// 0-based wire column
    pub col: usize,
    pub value: String,
}

impl PendingWrite {
    pub fn cell(&self) -> CellRef {
        CellRef::data_cell(self.row, self.col)
    }

    /// The single-cell range this write targets, e.g. `Sheet1!B2:B2`
    pub fn range(&self, sheet: &str) -> RangeAddress {
        RangeAddress::single_cell(sheet, self.cell())
    }

    pub fn to_value_range(&self, sheet: &str, major_dimension: MajorDimension) -> ValueRange {
        ValueRange {
            range: Some(self.range(sheet).to_string()),
            major_dimension: Some(major_dimension),
            values: vec![vec![self.value.clone()]],
        }
    }
}

/// Compare every projected field against the snapshot.
///
/// Writes come out row by row and, within a row, in header order, so the same
/// edits always produce the same batch.
pub fn pending_writes(
    header: &Arc<HeaderIndex>,
    snapshot: &[Vec<String>],
    projection: &[Record],
) -> Result<Vec<PendingWrite>> {
    let mut writes = Vec::new();

    for (row, (cells, record)) in snapshot.iter().zip(projection).enumerate() {
        if !Arc::ptr_eq(header, record.header()) && **header != **record.header() {
            return Err(SyncError::StaleRecord { row });
        }

        for (pos, field) in header.fields().iter().enumerate() {
            let current = cells.get(field.source_col).map(String::as_str).unwrap_or("");
            let edited = record.value_at(pos);
            if edited != current {
                writes.push(PendingWrite {
                    row,
                    col: field.source_col,
                    value: edited.to_string(),
                });
            }
        }
    }

    Ok(writes)
}

//! Named-column view of a remote spreadsheet tab with minimal write-back.
//!
//! A [`Worksheet`] reads a tab once, exposes each data row as a [`Record`]
//! keyed by the header row, and on [`Worksheet::update`] sends only the cells
//! whose values changed since the last known remote state.

pub mod diff;
pub mod error;
pub mod header;
pub mod model;
pub mod range;
pub mod record;
pub mod service;
pub mod spreadsheet;
pub mod store;
pub mod worksheet;

#[cfg(test)]
mod testing;

pub use diff::PendingWrite;
pub use error::{BoxError, Result, SyncError};
pub use header::{HeaderField, HeaderIndex};
pub use model::{MajorDimension, ValueInputOption, ValueRange};
pub use range::{column_letter, column_ordinal, CellRef, RangeAddress};
pub use record::Record;
pub use service::SheetValuesService;
pub use spreadsheet::Spreadsheet;
pub use store::RowStore;
pub use worksheet::Worksheet;

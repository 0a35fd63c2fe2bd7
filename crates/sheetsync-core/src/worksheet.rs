use std::sync::Arc;

use crate::diff::PendingWrite;
use crate::error::{Result, SyncError};
use crate::header::HeaderIndex;
use crate::model::{BatchUpdateValuesRequest, MajorDimension, ValueInputOption, ValueRange};
use crate::range::{CellRef, RangeAddress};
use crate::record::Record;
use crate::service::SheetValuesService;
use crate::store::RowStore;

/// A local, editable copy of one sheet tab, synced against the service.
///
/// The first row of the tab is the header. Edit records through
/// [`rows_mut`](Self::rows_mut) and push them with [`update`](Self::update);
/// only cells that differ from the last-known remote state are sent.
///
/// Every operation is one blocking round trip. A failed call leaves the local
/// rows exactly as they were.
pub struct Worksheet<S> {
    service: Arc<S>,
    sheet_key: String,
    sheet_name: String,
    store: RowStore,
    /// Layout of written value blocks
    pub major_dimension: MajorDimension,
    /// How the service parses written strings
    pub value_input_option: ValueInputOption,
}

impl<S: SheetValuesService> Worksheet<S> {
    /// Fetch a sheet tab and build its local rows
    pub fn open(
        service: Arc<S>,
        sheet_key: impl Into<String>,
        sheet_name: impl Into<String>,
    ) -> Result<Self> {
        let sheet_key = sheet_key.into();
        let sheet_name = sheet_name.into();
        let store = fetch(&*service, &sheet_key, &sheet_name)?;

        Ok(Worksheet {
            service,
            sheet_key,
            sheet_name,
            store,
            major_dimension: MajorDimension::default(),
            value_input_option: ValueInputOption::default(),
        })
    }

    pub fn sheet_key(&self) -> &str {
        &self.sheet_key
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn header(&self) -> &HeaderIndex {
        self.store.header()
    }

    /// Non-blank header names, left to right
    pub fn headers(&self) -> Vec<&str> {
        self.store.header().names().collect()
    }

    /// Copy of the last-known remote rows, header excluded
    pub fn values(&self) -> Vec<Vec<String>> {
        self.store.snapshot().to_vec()
    }

    pub fn rows(&self) -> &[Record] {
        self.store.rows()
    }

    pub fn rows_mut(&mut self) -> &mut [Record] {
        self.store.rows_mut()
    }

    /// Re-read the whole tab, replacing header, rows and any unsent edits
    pub fn refresh(&mut self) -> Result<()> {
        let store = fetch(&*self.service, &self.sheet_key, &self.sheet_name)?;
        self.store = store;
        Ok(())
    }

    /// Drop unsent edits
    pub fn discard_changes(&mut self) {
        self.store.discard_changes();
    }

    /// Append records below the last known row in a single request.
    ///
    /// Each record may name any subset of the header fields; missing fields
    /// are written empty and unknown names are ignored. On success the rows
    /// join the local snapshot without a re-fetch, and unsent edits to
    /// existing rows are discarded.
    pub fn append<I, R, K, V>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let rows: Vec<Vec<String>> = records
            .into_iter()
            .map(|record| self.store.align_row(record))
            .collect();

        let anchor = RangeAddress::anchor(
            self.sheet_name.as_str(),
            CellRef::data_cell(self.store.len(), 0),
        )
        .to_string();
        let body = ValueRange {
            range: None,
            major_dimension: Some(self.major_dimension),
            values: rows,
        };

        tracing::debug!(
            sheet = %self.sheet_name,
            anchor = %anchor,
            rows = body.values.len(),
            "appending rows"
        );
        self.service
            .append_values(&self.sheet_key, &anchor, &body, self.value_input_option)
            .map_err(SyncError::remote)?;

        self.store.extend(body.values);
        Ok(())
    }

    /// Cells that [`update`](Self::update) would send right now
    pub fn pending_changes(&self) -> Result<Vec<PendingWrite>> {
        self.store.pending_writes()
    }

    /// Push edited cells in one batch request and return how many were sent.
    ///
    /// The request is made even when nothing changed; an empty batch is a
    /// valid write and keeps the round-trip count of `update` fixed.
    pub fn update(&mut self) -> Result<usize> {
        let writes = self.store.pending_writes()?;
        let body = BatchUpdateValuesRequest {
            value_input_option: self.value_input_option,
            data: writes
                .iter()
                .map(|w| w.to_value_range(&self.sheet_name, self.major_dimension))
                .collect(),
        };

        tracing::debug!(sheet = %self.sheet_name, cells = writes.len(), "updating cells");
        self.service
            .batch_update_values(&self.sheet_key, &body)
            .map_err(SyncError::remote)?;

        self.store.apply(&writes);
        Ok(writes.len())
    }
}

fn fetch<S: SheetValuesService>(service: &S, key: &str, sheet: &str) -> Result<RowStore> {
    let range = service.get_values(key, sheet).map_err(SyncError::remote)?;

    let Some((header, data)) = range.values.split_first() else {
        return Err(SyncError::EmptyRange {
            key: key.to_string(),
            range: sheet.to_string(),
        });
    };

    let store = RowStore::new(header, data)?;
    tracing::debug!(
        sheet = %sheet,
        fields = store.header().len(),
        rows = store.len(),
        "fetched range"
    );
    Ok(store)
}

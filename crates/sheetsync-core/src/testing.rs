//! In-memory service double that records every call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use thiserror::Error;

use crate::model::{
    AppendValuesResponse, BatchUpdateSpreadsheetRequest, BatchUpdateSpreadsheetResponse,
    BatchUpdateValuesRequest, BatchUpdateValuesResponse, SheetInfo, SheetProperties,
    SpreadsheetMetadata, ValueInputOption, ValueRange,
};
use crate::service::SheetValuesService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    GetValues {
        key: String,
        range: String,
    },
    AppendValues {
        key: String,
        range: String,
        body: ValueRange,
        input: ValueInputOption,
    },
    BatchUpdateValues {
        key: String,
        body: BatchUpdateValuesRequest,
    },
    GetSpreadsheet {
        key: String,
    },
    BatchUpdateSpreadsheet {
        key: String,
        body: BatchUpdateSpreadsheetRequest,
    },
}

#[derive(Debug, Error)]
#[error("service unavailable")]
pub(crate) struct Unavailable;

/// Serves a fixed grid and sheet list; writes are recorded, not applied
#[derive(Default)]
pub(crate) struct FakeService {
    grid: Mutex<Vec<Vec<String>>>,
    sheets: Mutex<Vec<(String, i64)>>,
    calls: Mutex<Vec<Call>>,
    fail: AtomicBool,
}

impl FakeService {
    pub(crate) fn with_grid(rows: &[&[&str]]) -> Self {
        let service = FakeService::default();
        service.set_grid(rows);
        service
    }

    pub(crate) fn with_sheets(sheets: &[(&str, i64)]) -> Self {
        let service = FakeService::default();
        *service.sheets.lock().unwrap() = sheets
            .iter()
            .map(|(title, id)| (title.to_string(), *id))
            .collect();
        service
    }

    pub(crate) fn set_grid(&self, rows: &[&[&str]]) {
        *self.grid.lock().unwrap() = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
    }

    /// Make the next call fail without being recorded
    pub(crate) fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub(crate) fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn record(&self, call: Call) -> Result<(), Unavailable> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(Unavailable);
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl SheetValuesService for FakeService {
    type Error = Unavailable;

    fn get_values(&self, key: &str, range: &str) -> Result<ValueRange, Unavailable> {
        self.record(Call::GetValues {
            key: key.to_string(),
            range: range.to_string(),
        })?;
        Ok(ValueRange {
            range: Some(range.to_string()),
            major_dimension: None,
            values: self.grid.lock().unwrap().clone(),
        })
    }

    fn append_values(
        &self,
        key: &str,
        range: &str,
        body: &ValueRange,
        input: ValueInputOption,
    ) -> Result<AppendValuesResponse, Unavailable> {
        self.record(Call::AppendValues {
            key: key.to_string(),
            range: range.to_string(),
            body: body.clone(),
            input,
        })?;
        Ok(AppendValuesResponse::default())
    }

    fn batch_update_values(
        &self,
        key: &str,
        body: &BatchUpdateValuesRequest,
    ) -> Result<BatchUpdateValuesResponse, Unavailable> {
        self.record(Call::BatchUpdateValues {
            key: key.to_string(),
            body: body.clone(),
        })?;
        Ok(BatchUpdateValuesResponse::default())
    }

    fn get_spreadsheet(&self, key: &str) -> Result<SpreadsheetMetadata, Unavailable> {
        self.record(Call::GetSpreadsheet {
            key: key.to_string(),
        })?;
        let sheets = self
            .sheets
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(index, (title, id))| SheetInfo {
                properties: SheetProperties {
                    sheet_id: *id,
                    title: title.clone(),
                    index: index as i64,
                },
            })
            .collect();
        Ok(SpreadsheetMetadata {
            spreadsheet_id: Some(key.to_string()),
            properties: None,
            sheets,
        })
    }

    fn batch_update_spreadsheet(
        &self,
        key: &str,
        body: &BatchUpdateSpreadsheetRequest,
    ) -> Result<BatchUpdateSpreadsheetResponse, Unavailable> {
        self.record(Call::BatchUpdateSpreadsheet {
            key: key.to_string(),
            body: body.clone(),
        })?;
        Ok(BatchUpdateSpreadsheetResponse::default())
    }
}

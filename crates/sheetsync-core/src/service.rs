use crate::error::BoxError;
use crate::model::{
    AppendValuesResponse, BatchUpdateSpreadsheetRequest, BatchUpdateSpreadsheetResponse,
    BatchUpdateValuesRequest, BatchUpdateValuesResponse, SpreadsheetMetadata, ValueInputOption,
    ValueRange,
};

/// The remote spreadsheet service.
///
/// Each method is one blocking round trip. Implementations decide on
/// transport, authentication and timeouts; their errors reach callers wrapped
/// in [`SyncError::RemoteCall`](crate::SyncError::RemoteCall).
pub trait SheetValuesService {
    type Error: Into<BoxError>;

    /// Read a range. Row 0 of the returned values is the header row.
    fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange, Self::Error>;

    /// Append a block of rows after the table found at `range`
    fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        body: &ValueRange,
        input: ValueInputOption,
    ) -> Result<AppendValuesResponse, Self::Error>;

    /// Write several ranges in one request
    fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateValuesRequest,
    ) -> Result<BatchUpdateValuesResponse, Self::Error>;

    fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<SpreadsheetMetadata, Self::Error>;

    /// Apply structural edits (duplicate or delete a tab)
    fn batch_update_spreadsheet(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateSpreadsheetRequest,
    ) -> Result<BatchUpdateSpreadsheetResponse, Self::Error>;
}

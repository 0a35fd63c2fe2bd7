use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, SyncError};
use crate::model::{
    BatchUpdateSpreadsheetRequest, DeleteSheetRequest, DuplicateSheetRequest, SheetRequest,
};
use crate::service::SheetValuesService;
use crate::worksheet::Worksheet;

/// Entry point over a shared service handle.
///
/// Opens worksheets and performs tab-level edits. These tab edits are plain
/// pass-through calls with no local state.
pub struct Spreadsheet<S> {
    service: Arc<S>,
}

impl<S> Clone for Spreadsheet<S> {
    fn clone(&self) -> Self {
        Spreadsheet {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: SheetValuesService> Spreadsheet<S> {
    pub fn new(service: S) -> Self {
        Self::from_arc(Arc::new(service))
    }

    pub fn from_arc(service: Arc<S>) -> Self {
        Spreadsheet { service }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Open a tab of the spreadsheet `key` as a [`Worksheet`]
    pub fn get_worksheet(&self, key: &str, sheet_name: &str) -> Result<Worksheet<S>> {
        Worksheet::open(Arc::clone(&self.service), key, sheet_name)
    }

    /// Map of tab title to sheet id
    pub fn sheet_ids(&self, key: &str) -> Result<HashMap<String, i64>> {
        let meta = self
            .service
            .get_spreadsheet(key)
            .map_err(SyncError::remote)?;

        Ok(meta
            .sheets
            .into_iter()
            .map(|s| (s.properties.title, s.properties.sheet_id))
            .collect())
    }

    /// Duplicate the tab `src` as `dst`, placed after every existing tab
    pub fn copy_sheet(&self, key: &str, src: &str, dst: &str) -> Result<()> {
        let ids = self.sheet_ids(key)?;
        let source_sheet_id = lookup(&ids, key, src)?;

        let body = BatchUpdateSpreadsheetRequest {
            requests: vec![SheetRequest::DuplicateSheet(DuplicateSheetRequest {
                source_sheet_id,
                insert_sheet_index: Some(ids.len() as i64),
                new_sheet_name: Some(dst.to_string()),
            })],
        };

        tracing::debug!(key, src, dst, "duplicating sheet");
        self.service
            .batch_update_spreadsheet(key, &body)
            .map_err(SyncError::remote)?;
        Ok(())
    }

    /// Delete the tab titled `name`
    pub fn delete_sheet(&self, key: &str, name: &str) -> Result<()> {
        let ids = self.sheet_ids(key)?;
        let sheet_id = lookup(&ids, key, name)?;

        let body = BatchUpdateSpreadsheetRequest {
            requests: vec![SheetRequest::DeleteSheet(DeleteSheetRequest { sheet_id })],
        };

        tracing::debug!(key, name, "deleting sheet");
        self.service
            .batch_update_spreadsheet(key, &body)
            .map_err(SyncError::remote)?;
        Ok(())
    }
}

fn lookup(ids: &HashMap<String, i64>, key: &str, title: &str) -> Result<i64> {
    ids.get(title)
        .copied()
        .ok_or_else(|| SyncError::SheetNotFound {
            key: key.to_string(),
            title: title.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeService};

    fn spreadsheet() -> Spreadsheet<FakeService> {
        Spreadsheet::new(FakeService::with_sheets(&[("シート1", 0), ("シート2", 9999)]))
    }

    #[test]
    fn test_sheet_ids() {
        let ss = spreadsheet();
        let ids = ss.sheet_ids("XXXXXX").unwrap();

        assert_eq!(ids.len(), 2);
        assert_eq!(ids["シート1"], 0);
        assert_eq!(ids["シート2"], 9999);
        assert_eq!(
            ss.service().take_calls(),
            vec![Call::GetSpreadsheet {
                key: "XXXXXX".to_string()
            }]
        );
    }

    #[test]
    fn test_copy_sheet() {
        let ss = spreadsheet();
        ss.copy_sheet("XXXXXX", "シート1", "_シート1").unwrap();

        let calls = ss.service().take_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            Call::BatchUpdateSpreadsheet {
                key: "XXXXXX".to_string(),
                body: BatchUpdateSpreadsheetRequest {
                    requests: vec![SheetRequest::DuplicateSheet(DuplicateSheetRequest {
                        source_sheet_id: 0,
                        insert_sheet_index: Some(2),
                        new_sheet_name: Some("_シート1".to_string()),
                    })],
                },
            }
        );
    }

    #[test]
    fn test_delete_sheet() {
        let ss = Spreadsheet::new(FakeService::with_sheets(&[
            ("シート1", 0),
            ("シート2", 9999),
            ("_シート1", 1234),
        ]));
        ss.delete_sheet("XXXXXX", "_シート1").unwrap();

        let calls = ss.service().take_calls();
        assert_eq!(
            calls[1],
            Call::BatchUpdateSpreadsheet {
                key: "XXXXXX".to_string(),
                body: BatchUpdateSpreadsheetRequest {
                    requests: vec![SheetRequest::DeleteSheet(DeleteSheetRequest {
                        sheet_id: 1234
                    })],
                },
            }
        );
    }

    #[test]
    fn test_missing_sheet() {
        let ss = spreadsheet();

        let err = ss.delete_sheet("XXXXXX", "nope").unwrap_err();
        assert!(matches!(err, SyncError::SheetNotFound { ref title, .. } if title == "nope"));

        let err = ss.copy_sheet("XXXXXX", "nope", "copy").unwrap_err();
        assert!(matches!(err, SyncError::SheetNotFound { .. }));

        // Only the metadata reads went out
        let calls = ss.service().take_calls();
        assert!(calls
            .iter()
            .all(|c| matches!(c, Call::GetSpreadsheet { .. })));
    }

    #[test]
    fn test_get_worksheet_shares_service() {
        let ss = spreadsheet();
        ss.service().set_grid(&[&["name"], &["a"]]);

        let ws = ss.get_worksheet("XXXXXX", "シート1").unwrap();
        assert_eq!(ws.sheet_key(), "XXXXXX");
        assert_eq!(ws.sheet_name(), "シート1");
        assert_eq!(ws.headers(), vec!["name"]);
        assert_eq!(Arc::strong_count(ss.service()), 2);
    }
}

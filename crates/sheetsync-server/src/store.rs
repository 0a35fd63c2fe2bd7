use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::SpreadsheetDoc;
use crate::error::AppError;

/// Store for managing multiple emulated spreadsheets
pub struct SpreadsheetStore {
    documents: RwLock<HashMap<String, Arc<RwLock<SpreadsheetDoc>>>>,
}

impl SpreadsheetStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Create a spreadsheet under a fresh id
    pub async fn create(&self, title: &str, sheet_titles: &[String]) -> Arc<RwLock<SpreadsheetDoc>> {
        let id = Uuid::new_v4().simple().to_string();
        let doc = Arc::new(RwLock::new(SpreadsheetDoc::new(id.clone(), title, sheet_titles)));

        let mut docs = self.documents.write().await;
        docs.insert(id, Arc::clone(&doc));
        doc
    }

    /// Get a spreadsheet by id
    pub async fn get(&self, id: &str) -> Result<Arc<RwLock<SpreadsheetDoc>>, AppError> {
        let docs = self.documents.read().await;
        docs.get(id)
            .map(Arc::clone)
            .ok_or_else(|| AppError::NotFound("Requested entity was not found.".to_string()))
    }

    /// Get spreadsheet count
    pub async fn count(&self) -> usize {
        self.documents.read().await.len()
    }
}

impl Default for SpreadsheetStore {
    fn default() -> Self {
        Self::new()
    }
}

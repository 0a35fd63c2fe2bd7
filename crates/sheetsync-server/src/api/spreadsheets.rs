use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use sheetsync_core::model::{
    BatchUpdateSpreadsheetRequest, BatchUpdateSpreadsheetResponse, SpreadsheetMetadata,
};

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::AppState;

/// Create a spreadsheet from the tabs listed in the body
async fn create_spreadsheet(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SpreadsheetMetadata>,
) -> Result<Json<SpreadsheetMetadata>, AppError> {
    let title = req
        .properties
        .map(|p| p.title)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled spreadsheet".to_string());

    let mut sheet_titles: Vec<String> = Vec::with_capacity(req.sheets.len());
    for sheet in req.sheets {
        let title = sheet.properties.title;
        if sheet_titles.contains(&title) {
            return Err(AppError::BadRequest(format!(
                "A sheet with the name \"{title}\" already exists"
            )));
        }
        sheet_titles.push(title);
    }

    let doc = state.store.create(&title, &sheet_titles).await;
    let meta = doc.read().await.metadata();
    tracing::info!(id = ?meta.spreadsheet_id, "created spreadsheet");
    Ok(Json(meta))
}

async fn get_spreadsheet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SpreadsheetMetadata>, AppError> {
    let doc = state.store.get(&id).await?;
    let meta = doc.read().await.metadata();
    Ok(Json(meta))
}

/// `POST /v4/spreadsheets/{id}:batchUpdate`
async fn spreadsheet_command(
    State(state): State<AppState>,
    Path(target): Path<String>,
    ApiJson(req): ApiJson<BatchUpdateSpreadsheetRequest>,
) -> Result<Json<BatchUpdateSpreadsheetResponse>, AppError> {
    let Some(id) = target.strip_suffix(":batchUpdate") else {
        return Err(AppError::NotFound(format!("Unknown method: {target}")));
    };

    let doc = state.store.get(id).await?;
    let mut doc = doc.write().await;
    let replies = doc.apply_all(&req.requests)?;
    tracing::debug!(id, requests = req.requests.len(), "applied sheet requests");

    Ok(Json(BatchUpdateSpreadsheetResponse {
        spreadsheet_id: Some(doc.id.clone()),
        replies,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v4/spreadsheets", post(create_spreadsheet))
        .route(
            "/v4/spreadsheets/{id}",
            get(get_spreadsheet).post(spreadsheet_command),
        )
}

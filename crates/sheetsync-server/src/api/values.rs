use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use sheetsync_core::model::{
    AppendValuesResponse, BatchUpdateValuesRequest, BatchUpdateValuesResponse, ValueInputOption,
    ValueRange,
};

use crate::error::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendParams {
    value_input_option: Option<ValueInputOption>,
}

async fn get_values(
    State(state): State<AppState>,
    Path((id, range)): Path<(String, String)>,
) -> Result<Json<ValueRange>, AppError> {
    let doc = state.store.get(&id).await?;
    let values = doc.read().await.read(&range)?;
    Ok(Json(values))
}

/// `POST /v4/spreadsheets/{id}/values/{range}:append`
async fn values_command(
    State(state): State<AppState>,
    Path((id, target)): Path<(String, String)>,
    ApiQuery(params): ApiQuery<AppendParams>,
    ApiJson(body): ApiJson<ValueRange>,
) -> Result<Json<AppendValuesResponse>, AppError> {
    let Some(range) = target.strip_suffix(":append") else {
        return Err(AppError::NotFound(format!("Unknown method: {target}")));
    };
    if params.value_input_option.is_none() {
        return Err(AppError::BadRequest(
            "'valueInputOption' is required but not specified".to_string(),
        ));
    }

    let doc = state.store.get(&id).await?;
    let response = doc.write().await.append(range, &body)?;
    tracing::debug!(%id, range, rows = body.values.len(), "appended rows");
    Ok(Json(response))
}

async fn batch_update_values(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<BatchUpdateValuesRequest>,
) -> Result<Json<BatchUpdateValuesResponse>, AppError> {
    let doc = state.store.get(&id).await?;
    let response = doc.write().await.write_all(&req.data)?;
    tracing::debug!(%id, cells = response.total_updated_cells, "batch updated values");
    Ok(Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v4/spreadsheets/{id}/values/{range}",
            get(get_values).post(values_command),
        )
        .route(
            "/v4/spreadsheets/{id}/values:batchUpdate",
            post(batch_update_values),
        )
}

#[cfg(test)]
mod tests {
    use crate::test_support::{call, create_spreadsheet};
    use crate::{app, AppState};
    use axum::http::StatusCode;
    use axum::Router;
    use serde_json::{json, Value};

    async fn seed(app: &Router, id: &str) {
        let (status, body) = call(
            app,
            "POST",
            &format!("/v4/spreadsheets/{id}/values:batchUpdate"),
            Some(json!({
                "valueInputOption": "RAW",
                "data": [{
                    "range": "Data!A1",
                    "values": [["id", "name"], ["1", "alice"], ["2", "bob"]],
                }],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalUpdatedCells"], 6);
    }

    fn rows(body: &Value) -> Vec<Vec<String>> {
        serde_json::from_value(body["values"].clone()).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_batch_update_then_get() {
        let app = app(AppState::default());
        let id = create_spreadsheet(&app, &["Data"]).await;
        seed(&app, &id).await;

        let (status, body) =
            call(&app, "GET", &format!("/v4/spreadsheets/{id}/values/Data"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["majorDimension"], "ROWS");
        assert_eq!(
            rows(&body),
            vec![vec!["id", "name"], vec!["1", "alice"], vec!["2", "bob"]]
        );

        let (_, body) = call(
            &app,
            "GET",
            &format!("/v4/spreadsheets/{id}/values/Data!B3:B3"),
            None,
        )
        .await;
        assert_eq!(rows(&body), vec![vec!["bob"]]);
    }

    #[tokio::test]
    async fn test_append_after_last_row() {
        let app = app(AppState::default());
        let id = create_spreadsheet(&app, &["Data"]).await;
        seed(&app, &id).await;

        let (status, body) = call(
            &app,
            "POST",
            &format!("/v4/spreadsheets/{id}/values/Data!A4:append?valueInputOption=USER_ENTERED"),
            Some(json!({ "values": [["3", "carol"]] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updates"]["updatedRange"], "Data!A4:B4");

        let (_, body) =
            call(&app, "GET", &format!("/v4/spreadsheets/{id}/values/Data"), None).await;
        assert_eq!(rows(&body)[3], vec!["3", "carol"]);
    }

    #[tokio::test]
    async fn test_append_requires_input_option() {
        let app = app(AppState::default());
        let id = create_spreadsheet(&app, &["Data"]).await;

        let (status, body) = call(
            &app,
            "POST",
            &format!("/v4/spreadsheets/{id}/values/Data!A2:append"),
            Some(json!({ "values": [["x"]] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 400);
    }

    #[tokio::test]
    async fn test_malformed_bodies_use_error_envelope() {
        let app = app(AppState::default());
        let id = create_spreadsheet(&app, &["Data"]).await;

        // valueInputOption is required in the batch body
        let (status, body) = call(
            &app,
            "POST",
            &format!("/v4/spreadsheets/{id}/values:batchUpdate"),
            Some(json!({ "data": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 400);
        assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("valueInputOption"));

        // No JSON body at all
        let (status, body) = call(
            &app,
            "POST",
            &format!("/v4/spreadsheets/{id}/values/Data!A1:append?valueInputOption=RAW"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_unknown_input_option_uses_error_envelope() {
        let app = app(AppState::default());
        let id = create_spreadsheet(&app, &["Data"]).await;

        let (status, body) = call(
            &app,
            "POST",
            &format!("/v4/spreadsheets/{id}/values/Data!A1:append?valueInputOption=BOGUS"),
            Some(json!({ "values": [["x"]] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 400);
    }

    #[tokio::test]
    async fn test_range_past_grid_limits() {
        let app = app(AppState::default());
        let id = create_spreadsheet(&app, &["Data"]).await;

        let (status, body) = call(
            &app,
            "POST",
            &format!("/v4/spreadsheets/{id}/values/Data!A3000000:append?valueInputOption=RAW"),
            Some(json!({ "values": [["x"]] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("exceeds grid limits"));
    }

    #[tokio::test]
    async fn test_unknown_sheet_is_bad_request() {
        let app = app(AppState::default());
        let id = create_spreadsheet(&app, &["Data"]).await;

        let (status, body) =
            call(&app, "GET", &format!("/v4/spreadsheets/{id}/values/Nope"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Unable to parse range: Nope");
    }

    #[tokio::test]
    async fn test_empty_sheet_has_no_values() {
        let app = app(AppState::default());
        let id = create_spreadsheet(&app, &["Data"]).await;

        let (status, body) =
            call(&app, "GET", &format!("/v4/spreadsheets/{id}/values/Data"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("values").is_none());
    }
}

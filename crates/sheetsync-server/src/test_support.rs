use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Send one request through the router and decode the JSON reply
pub(crate) async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Create a spreadsheet with the given tabs and return its id
pub(crate) async fn create_spreadsheet(app: &Router, sheets: &[&str]) -> String {
    let sheets: Vec<Value> = sheets
        .iter()
        .map(|title| json!({ "properties": { "title": title } }))
        .collect();
    let (status, body) = call(
        app,
        "POST",
        "/v4/spreadsheets",
        Some(json!({ "properties": { "title": "Test" }, "sheets": sheets })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["spreadsheetId"].as_str().unwrap().to_string()
}

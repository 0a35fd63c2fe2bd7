mod health;
mod spreadsheets;
mod values;

use axum::Router;

use crate::AppState;

/// Create the API router
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(spreadsheets::router())
        .merge(values::router())
}

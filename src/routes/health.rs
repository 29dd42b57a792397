use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::types::activity::FileFormat;

pub fn router() -> Router<crate::state::AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<Value> {
    let formats: Vec<&str> = [FileFormat::Gpx, FileFormat::Fit, FileFormat::Tcx]
        .iter()
        .map(FileFormat::as_str)
        .collect();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "formats": formats
    }))
}

use axum::extract::Multipart;
use axum::{extract::State, routing::post, Json, Router};

use crate::error::AppError;
use crate::pipeline::import::ImportFile;
use crate::state::AppState;
use crate::types::activity::Activity;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/upload", post(upload))
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Activity>, AppError> {
    let mut file: Option<ImportFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;
        let media_type = field.content_type().map(|s| s.to_string());
        let bytes = field.bytes().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read file bytes: {}", e))
        })?;

        file = Some(ImportFile::new(name, media_type.as_deref(), bytes.to_vec()));
    }

    let file = file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let importer_state = state.clone();
    let activity = tokio::task::spawn_blocking(move || importer_state.importer().import_file(&file))
        .await
        .map_err(|e| AppError::Internal(format!("Import task failed: {}", e)))??;

    state.insert(activity.clone());
    Ok(Json(activity))
}

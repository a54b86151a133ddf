use axum::{
    Router,
    extract::{Multipart, State},
    response::Json as ResponseJson,
    routing::post,
};
use serde::Serialize;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize, TS)]
pub struct UploadResponse {
    pub asset_key: String,
    pub url: String,
}

/// Accepts a multipart `file` field and stores it under a fresh, collision-free key.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<UploadResponse>>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.bin").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        if data.is_empty() {
            return Err(ApiError::BadRequest("uploaded file is empty".to_string()));
        }

        let asset_key = format!("achievements/{}-{}", Uuid::new_v4(), sanitize(&file_name));
        state.assets.put(&asset_key, data).await?;

        let url = format!("/assets/{asset_key}");
        return Ok(ResponseJson(ApiResponse::success(UploadResponse {
            asset_key,
            url,
        })));
    }
    Err(ApiError::BadRequest("missing file field".to_string()))
}

/// Keeps the original file name recognizable while making it key-safe.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

pub fn router() -> Router<AppState> {
    Router::new().route("/assets", post(upload))
}

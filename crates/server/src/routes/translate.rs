use axum::{Router, extract::State, response::Json as ResponseJson, routing::post};
use serde::{Deserialize, Serialize};
use services::services::translation::Lang;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize, TS)]
pub struct TranslateRequest {
    pub text: String,
    pub source: Lang,
    pub target: Lang,
}

#[derive(Debug, Serialize, TS)]
pub struct TranslateResponse {
    pub translated: String,
}

/// Admin helper: fill the other language's field from the one already written.
pub async fn translate(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<TranslateRequest>,
) -> Result<ResponseJson<ApiResponse<TranslateResponse>>, ApiError> {
    if payload.source == payload.target {
        return Err(ApiError::BadRequest(
            "source and target language are the same".to_string(),
        ));
    }
    let translator = state
        .translator
        .as_ref()
        .ok_or(ApiError::TranslatorUnavailable)?;

    let translated = translator
        .translate(&payload.text, payload.source, payload.target)
        .await?;
    Ok(ResponseJson(ApiResponse::success(TranslateResponse {
        translated,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/translate", post(translate))
}

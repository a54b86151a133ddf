use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::ReorderError;
use services::services::{
    achievements::AchievementServiceError, auth::AuthError, storage::AssetStoreError,
    translation::TranslationError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Reorder(#[from] ReorderError),
    #[error(transparent)]
    Achievement(#[from] AchievementServiceError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    AssetStore(#[from] AssetStoreError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("translation service not configured")]
    TranslatorUnavailable,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Reorder(ReorderError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Reorder(ReorderError::DuplicateId)
            | ApiError::Reorder(ReorderError::InvalidPosition(_)) => StatusCode::BAD_REQUEST,
            ApiError::Reorder(ReorderError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Achievement(AchievementServiceError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Achievement(AchievementServiceError::Reorder(ReorderError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Achievement(AchievementServiceError::Reorder(
                ReorderError::DuplicateId | ReorderError::InvalidPosition(_),
            )) => StatusCode::BAD_REQUEST,
            ApiError::Achievement(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(AuthError::InvalidCredentials) | ApiError::Auth(AuthError::Unauthorized) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Auth(AuthError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Translation(_) => StatusCode::BAD_GATEWAY,
            ApiError::AssetStore(AssetStoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::AssetStore(AssetStoreError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            ApiError::AssetStore(AssetStoreError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::TranslatorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

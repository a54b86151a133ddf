use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete as delete_route, get, post},
};
use db::models::category::{Category, CreateCategory};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = Category::find_all(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(categories)))
}

pub async fn create(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateCategory>,
) -> Result<ResponseJson<ApiResponse<Category>>, ApiError> {
    let category = Category::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Category::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("category not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/categories", get(list))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create))
        .route("/categories/{id}", delete_route(delete))
}

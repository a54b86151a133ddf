//! Routes for the achievement catalogue: public listing plus the admin CRUD and
//! reordering surface.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::achievement::{
    Achievement, AchievementDetail, CreateAchievement, SaveOrder, UpdateAchievement,
};
use db::models::achievement_image::{AchievementImage, ImageInput};
use db::models::achievement_link::{AchievementLink, LinkInput};
use serde::{Deserialize, Serialize};
use services::services::achievements::AchievementService;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Single-item move: the 1-based position the item should end up at.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ReorderRequest {
    pub position: i64,
}

/// Edit-save payload: achievement fields plus the full replacement of both child
/// collections, in their final order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateAchievementRequest {
    #[serde(flatten)]
    #[ts(flatten)]
    pub fields: UpdateAchievement,
    pub images: Vec<ImageInput>,
    pub links: Vec<LinkInput>,
}

pub async fn list_published(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Achievement>>>, ApiError> {
    let achievements = Achievement::find_published(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(achievements)))
}

pub async fn get_published(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<AchievementDetail>>, ApiError> {
    let detail = AchievementService::detail(&state.db.pool, id)
        .await?
        .filter(|detail| detail.published)
        .ok_or_else(|| ApiError::NotFound("achievement not found".to_string()))?;
    Ok(ResponseJson(ApiResponse::success(detail)))
}

pub async fn list_all(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Achievement>>>, ApiError> {
    let achievements = Achievement::find_all(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(achievements)))
}

pub async fn create(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateAchievement>,
) -> Result<ResponseJson<ApiResponse<Achievement>>, ApiError> {
    let achievement = Achievement::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(achievement)))
}

pub async fn get_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<AchievementDetail>>, ApiError> {
    let detail = AchievementService::detail(&state.db.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("achievement not found".to_string()))?;
    Ok(ResponseJson(ApiResponse::success(detail)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateAchievementRequest>,
) -> Result<ResponseJson<ApiResponse<AchievementDetail>>, ApiError> {
    let detail = AchievementService::update_with_collections(
        &state.db.pool,
        state.assets.as_ref(),
        id,
        &payload.fields,
        &payload.images,
        &payload.links,
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(detail)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    AchievementService::delete(&state.db.pool, state.assets.as_ref(), id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// Move one achievement to a new position in the global order. Responds with the
/// refreshed full order so the client can reconcile its optimistic state.
pub async fn reorder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<ReorderRequest>,
) -> Result<ResponseJson<ApiResponse<Vec<Achievement>>>, ApiError> {
    let achievements = Achievement::reorder(&state.db.pool, id, payload.position).await?;
    Ok(ResponseJson(ApiResponse::success(achievements)))
}

/// Persist a complete drag-and-drop result: every achievement id in final order.
pub async fn save_order(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<SaveOrder>,
) -> Result<ResponseJson<ApiResponse<Vec<Achievement>>>, ApiError> {
    let achievements = Achievement::save_order(&state.db.pool, &payload.ordered_ids).await?;
    Ok(ResponseJson(ApiResponse::success(achievements)))
}

pub async fn reorder_image(
    State(state): State<AppState>,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
    axum::Json(payload): axum::Json<ReorderRequest>,
) -> Result<ResponseJson<ApiResponse<Vec<AchievementImage>>>, ApiError> {
    let images =
        AchievementImage::reorder(&state.db.pool, id, image_id, payload.position).await?;
    Ok(ResponseJson(ApiResponse::success(images)))
}

pub async fn reorder_link(
    State(state): State<AppState>,
    Path((id, link_id)): Path<(Uuid, Uuid)>,
    axum::Json(payload): axum::Json<ReorderRequest>,
) -> Result<ResponseJson<ApiResponse<Vec<AchievementLink>>>, ApiError> {
    let links = AchievementLink::reorder(&state.db.pool, id, link_id, payload.position).await?;
    Ok(ResponseJson(ApiResponse::success(links)))
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/achievements", get(list_published))
        .route("/achievements/{id}", get(get_published))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/achievements", get(list_all).post(create))
        .route("/achievements/order", put(save_order))
        .route(
            "/achievements/{id}",
            get(get_detail).put(update).delete(delete),
        )
        .route("/achievements/{id}/reorder", post(reorder))
        .route(
            "/achievements/{id}/images/{image_id}/reorder",
            post(reorder_image),
        )
        .route(
            "/achievements/{id}/links/{link_id}/reorder",
            post(reorder_link),
        )
}

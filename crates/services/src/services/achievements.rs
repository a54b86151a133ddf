//! Orchestration of achievement writes that touch both the database and the blob store.
//!
//! Asset release is best effort and happens after the metadata transaction commits: a
//! failed blob removal is logged and the orphaned file accepted, never rolled back or
//! retried.

use db::models::{
    ReorderError,
    achievement::{Achievement, AchievementDetail, UpdateAchievement},
    achievement_image::{AchievementImage, ImageInput},
    achievement_link::{AchievementLink, LinkInput},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use super::storage::AssetStore;

#[derive(Debug, Error)]
pub enum AchievementServiceError {
    #[error("achievement not found")]
    NotFound,
    #[error(transparent)]
    Reorder(#[from] ReorderError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct AchievementService;

impl AchievementService {
    pub async fn detail(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<Option<AchievementDetail>, sqlx::Error> {
        let Some(achievement) = Achievement::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let images = AchievementImage::find_by_achievement_id(pool, id).await?;
        let links = AchievementLink::find_by_achievement_id(pool, id).await?;
        Ok(Some(AchievementDetail {
            achievement,
            images,
            links,
        }))
    }

    /// Edit-save: updates the achievement's fields and replaces both child collections,
    /// then releases blobs for any images the save dropped.
    pub async fn update_with_collections(
        pool: &SqlitePool,
        store: &dyn AssetStore,
        id: Uuid,
        data: &UpdateAchievement,
        images: &[ImageInput],
        links: &[LinkInput],
    ) -> Result<AchievementDetail, AchievementServiceError> {
        let achievement = Achievement::update(pool, id, data)
            .await?
            .ok_or(AchievementServiceError::NotFound)?;

        let (images, removed_keys) =
            AchievementImage::replace_for_achievement(pool, id, images).await?;
        // The dropped rows are already committed; release their blobs now so a
        // failure in the link replace cannot strand them unlogged.
        release_assets(store, removed_keys).await;

        let links = AchievementLink::replace_for_achievement(pool, id, links).await?;

        Ok(AchievementDetail {
            achievement,
            images,
            links,
        })
    }

    /// Deletes an achievement, compacting the global order, then releases its image
    /// blobs.
    pub async fn delete(
        pool: &SqlitePool,
        store: &dyn AssetStore,
        id: Uuid,
    ) -> Result<(), AchievementServiceError> {
        let images = AchievementImage::find_by_achievement_id(pool, id).await?;

        let deleted = Achievement::delete(pool, id).await?;
        if deleted == 0 {
            return Err(AchievementServiceError::NotFound);
        }

        release_assets(store, images.into_iter().map(|img| img.asset_key).collect()).await;
        Ok(())
    }
}

async fn release_assets(store: &dyn AssetStore, keys: Vec<String>) {
    for key in keys {
        if let Err(e) = store.remove(&key).await {
            warn!(asset_key = %key, error = %e, "failed to release asset, orphan accepted");
        }
    }
}

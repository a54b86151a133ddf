use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use utils::ordering::{Positioned, plan_move};
use uuid::Uuid;

use super::ReorderError;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct AchievementImage {
    pub id: Uuid,
    pub achievement_id: Uuid,
    pub asset_key: String,
    pub alt_text: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

impl Positioned for AchievementImage {
    fn position(&self) -> i64 {
        self.sort_order
    }
    fn set_position(&mut self, position: i64) {
        self.sort_order = position;
    }
}

/// One image in a full-collection replace. `id = None` means a newly attached image.
/// Position is implied by the payload order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ImageInput {
    pub id: Option<Uuid>,
    pub asset_key: String,
    pub alt_text: Option<String>,
}

impl AchievementImage {
    pub async fn find_by_achievement_id(
        pool: &SqlitePool,
        achievement_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AchievementImage>(
            "SELECT * FROM achievement_images WHERE achievement_id = $1 ORDER BY sort_order ASC",
        )
        .bind(achievement_id)
        .fetch_all(pool)
        .await
    }

    /// Moves one image within its achievement's order. The image must belong to
    /// `achievement_id`; other achievements' image orders are untouched.
    pub async fn reorder(
        pool: &SqlitePool,
        achievement_id: Uuid,
        image_id: Uuid,
        new_position: i64,
    ) -> Result<Vec<Self>, ReorderError> {
        let mut tx = pool.begin().await?;

        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT sort_order FROM achievement_images WHERE id = $1 AND achievement_id = $2",
        )
        .bind(image_id)
        .bind(achievement_id)
        .fetch_optional(&mut *tx)
        .await?;
        let old_position = row.ok_or(ReorderError::NotFound)?.0;

        let (len,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM achievement_images WHERE achievement_id = $1")
                .bind(achievement_id)
                .fetch_one(&mut *tx)
                .await?;

        if let Some(shift) = plan_move(old_position, new_position, len)? {
            sqlx::query(
                "UPDATE achievement_images SET sort_order = sort_order + $1
                 WHERE achievement_id = $2 AND sort_order BETWEEN $3 AND $4",
            )
            .bind(shift.delta)
            .bind(achievement_id)
            .bind(shift.lo)
            .bind(shift.hi)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE achievement_images SET sort_order = $2 WHERE id = $1")
                .bind(image_id)
                .bind(new_position)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Self::find_by_achievement_id(pool, achievement_id)
            .await
            .map_err(Into::into)
    }

    /// Replaces the full image collection of one achievement: rows absent from the
    /// payload are deleted, rows with ids are updated, id-less rows inserted, and
    /// positions reassigned `1..=n` by payload order, all in one transaction.
    ///
    /// Returns the refreshed collection plus the asset keys of deleted rows so the
    /// caller can release the underlying blobs.
    pub async fn replace_for_achievement(
        pool: &SqlitePool,
        achievement_id: Uuid,
        items: &[ImageInput],
    ) -> Result<(Vec<Self>, Vec<String>), ReorderError> {
        let mut tx = pool.begin().await?;

        let existing: Vec<Self> = sqlx::query_as::<_, AchievementImage>(
            "SELECT * FROM achievement_images WHERE achievement_id = $1",
        )
        .bind(achievement_id)
        .fetch_all(&mut *tx)
        .await?;

        // A payload id that is not in this achievement's scope is stale, and a
        // repeated id would collapse two slots onto one row, leaving a gap.
        let mut seen = HashSet::new();
        for item in items {
            if let Some(id) = item.id {
                if !existing.iter().any(|img| img.id == id) {
                    return Err(ReorderError::NotFound);
                }
                if !seen.insert(id) {
                    return Err(ReorderError::DuplicateId);
                }
            }
        }

        let mut removed_keys = Vec::new();
        for image in &existing {
            if !items.iter().any(|item| item.id == Some(image.id)) {
                sqlx::query("DELETE FROM achievement_images WHERE id = $1")
                    .bind(image.id)
                    .execute(&mut *tx)
                    .await?;
                removed_keys.push(image.asset_key.clone());
            }
        }

        for (index, item) in items.iter().enumerate() {
            let position = index as i64 + 1;
            match item.id {
                Some(id) => {
                    sqlx::query(
                        "UPDATE achievement_images
                         SET asset_key = $2, alt_text = $3, sort_order = $4
                         WHERE id = $1",
                    )
                    .bind(id)
                    .bind(&item.asset_key)
                    .bind(&item.alt_text)
                    .bind(position)
                    .execute(&mut *tx)
                    .await?;
                }
                None => {
                    sqlx::query(
                        "INSERT INTO achievement_images
                             (id, achievement_id, asset_key, alt_text, sort_order)
                         VALUES ($1, $2, $3, $4, $5)",
                    )
                    .bind(Uuid::new_v4())
                    .bind(achievement_id)
                    .bind(&item.asset_key)
                    .bind(&item.alt_text)
                    .bind(position)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        let images = Self::find_by_achievement_id(pool, achievement_id).await?;
        Ok((images, removed_keys))
    }
}

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use utils::ordering::{Positioned, plan_move};
use uuid::Uuid;

use super::ReorderError;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct AchievementLink {
    pub id: Uuid,
    pub achievement_id: Uuid,
    pub url: String,
    pub label_en: Option<String>,
    pub label_th: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

impl Positioned for AchievementLink {
    fn position(&self) -> i64 {
        self.sort_order
    }
    fn set_position(&mut self, position: i64) {
        self.sort_order = position;
    }
}

/// One link in a full-collection replace; position is implied by payload order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct LinkInput {
    pub id: Option<Uuid>,
    pub url: String,
    pub label_en: Option<String>,
    pub label_th: Option<String>,
}

impl AchievementLink {
    pub async fn find_by_achievement_id(
        pool: &SqlitePool,
        achievement_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AchievementLink>(
            "SELECT * FROM achievement_links WHERE achievement_id = $1 ORDER BY sort_order ASC",
        )
        .bind(achievement_id)
        .fetch_all(pool)
        .await
    }

    /// Moves one link within its achievement's order.
    pub async fn reorder(
        pool: &SqlitePool,
        achievement_id: Uuid,
        link_id: Uuid,
        new_position: i64,
    ) -> Result<Vec<Self>, ReorderError> {
        let mut tx = pool.begin().await?;

        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT sort_order FROM achievement_links WHERE id = $1 AND achievement_id = $2",
        )
        .bind(link_id)
        .bind(achievement_id)
        .fetch_optional(&mut *tx)
        .await?;
        let old_position = row.ok_or(ReorderError::NotFound)?.0;

        let (len,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM achievement_links WHERE achievement_id = $1")
                .bind(achievement_id)
                .fetch_one(&mut *tx)
                .await?;

        if let Some(shift) = plan_move(old_position, new_position, len)? {
            sqlx::query(
                "UPDATE achievement_links SET sort_order = sort_order + $1
                 WHERE achievement_id = $2 AND sort_order BETWEEN $3 AND $4",
            )
            .bind(shift.delta)
            .bind(achievement_id)
            .bind(shift.lo)
            .bind(shift.hi)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE achievement_links SET sort_order = $2 WHERE id = $1")
                .bind(link_id)
                .bind(new_position)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Self::find_by_achievement_id(pool, achievement_id)
            .await
            .map_err(Into::into)
    }

    /// Replaces the full link collection of one achievement; see
    /// [`super::achievement_image::AchievementImage::replace_for_achievement`] for the
    /// contract. Links own no external assets, so nothing needs releasing.
    pub async fn replace_for_achievement(
        pool: &SqlitePool,
        achievement_id: Uuid,
        items: &[LinkInput],
    ) -> Result<Vec<Self>, ReorderError> {
        let mut tx = pool.begin().await?;

        let existing: Vec<Self> = sqlx::query_as::<_, AchievementLink>(
            "SELECT * FROM achievement_links WHERE achievement_id = $1",
        )
        .bind(achievement_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut seen = HashSet::new();
        for item in items {
            if let Some(id) = item.id {
                if !existing.iter().any(|link| link.id == id) {
                    return Err(ReorderError::NotFound);
                }
                if !seen.insert(id) {
                    return Err(ReorderError::DuplicateId);
                }
            }
        }

        for link in &existing {
            if !items.iter().any(|item| item.id == Some(link.id)) {
                sqlx::query("DELETE FROM achievement_links WHERE id = $1")
                    .bind(link.id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        for (index, item) in items.iter().enumerate() {
            let position = index as i64 + 1;
            match item.id {
                Some(id) => {
                    sqlx::query(
                        "UPDATE achievement_links
                         SET url = $2, label_en = $3, label_th = $4, sort_order = $5
                         WHERE id = $1",
                    )
                    .bind(id)
                    .bind(&item.url)
                    .bind(&item.label_en)
                    .bind(&item.label_th)
                    .bind(position)
                    .execute(&mut *tx)
                    .await?;
                }
                None => {
                    sqlx::query(
                        "INSERT INTO achievement_links
                             (id, achievement_id, url, label_en, label_th, sort_order)
                         VALUES ($1, $2, $3, $4, $5, $6)",
                    )
                    .bind(Uuid::new_v4())
                    .bind(achievement_id)
                    .bind(&item.url)
                    .bind(&item.label_en)
                    .bind(&item.label_th)
                    .bind(position)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        Self::find_by_achievement_id(pool, achievement_id)
            .await
            .map_err(Into::into)
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use utils::ordering::{Positioned, plan_move};
use uuid::Uuid;

use super::ReorderError;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Achievement {
    pub id: Uuid,
    pub title_en: String,
    pub title_th: String,
    pub description_en: Option<String>,
    pub description_th: Option<String>,
    pub awarded_by_en: Option<String>,
    pub awarded_by_th: Option<String>,
    pub awarded_at: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub published: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Positioned for Achievement {
    fn position(&self) -> i64 {
        self.sort_order
    }
    fn set_position(&mut self, position: i64) {
        self.sort_order = position;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateAchievement {
    pub title_en: String,
    pub title_th: String,
    pub description_en: Option<String>,
    pub description_th: Option<String>,
    pub awarded_by_en: Option<String>,
    pub awarded_by_th: Option<String>,
    pub awarded_at: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateAchievement {
    pub title_en: String,
    pub title_th: String,
    pub description_en: Option<String>,
    pub description_th: Option<String>,
    pub awarded_by_en: Option<String>,
    pub awarded_by_th: Option<String>,
    pub awarded_at: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub published: bool,
}

/// An achievement together with its ordered child collections.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct AchievementDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub achievement: Achievement,
    pub images: Vec<super::achievement_image::AchievementImage>,
    pub links: Vec<super::achievement_link::AchievementLink>,
}

impl std::ops::Deref for AchievementDetail {
    type Target = Achievement;
    fn deref(&self) -> &Self::Target {
        &self.achievement
    }
}

/// Bulk order payload: the complete set of achievement ids in their final order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SaveOrder {
    pub ordered_ids: Vec<Uuid>,
}

impl Achievement {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Achievement>(
            "SELECT * FROM achievements ORDER BY sort_order ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_published(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Achievement>(
            "SELECT * FROM achievements WHERE published = 1 ORDER BY sort_order ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Achievement>("SELECT * FROM achievements WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Inserts a new achievement at the end of the global order.
    pub async fn create(pool: &SqlitePool, data: &CreateAchievement) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let (len,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM achievements")
            .fetch_one(&mut *tx)
            .await?;

        let id = Uuid::new_v4();
        let published = data.published.unwrap_or(false);
        let achievement = sqlx::query_as::<_, Achievement>(
            r#"INSERT INTO achievements
                   (id, title_en, title_th, description_en, description_th,
                    awarded_by_en, awarded_by_th, awarded_at, category_id, published, sort_order)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.title_en)
        .bind(&data.title_th)
        .bind(&data.description_en)
        .bind(&data.description_th)
        .bind(&data.awarded_by_en)
        .bind(&data.awarded_by_th)
        .bind(data.awarded_at)
        .bind(data.category_id)
        .bind(published)
        .bind(len + 1)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(achievement)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateAchievement,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Achievement>(
            r#"UPDATE achievements
               SET title_en = $2, title_th = $3, description_en = $4, description_th = $5,
                   awarded_by_en = $6, awarded_by_th = $7, awarded_at = $8, category_id = $9,
                   published = $10, updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.title_en)
        .bind(&data.title_th)
        .bind(&data.description_en)
        .bind(&data.description_th)
        .bind(&data.awarded_by_en)
        .bind(&data.awarded_by_th)
        .bind(data.awarded_at)
        .bind(data.category_id)
        .bind(data.published)
        .fetch_optional(pool)
        .await
    }

    /// Deletes an achievement and closes the gap it leaves in the global order, in one
    /// transaction. Returns the number of rows deleted (0 when the id is unknown).
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(i64,)> =
            sqlx::query_as("SELECT sort_order FROM achievements WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((old_pos,)) = row else {
            return Ok(0);
        };

        sqlx::query("DELETE FROM achievements WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE achievements SET sort_order = sort_order - 1 WHERE sort_order > $1")
            .bind(old_pos)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(1)
    }

    /// Moves one achievement to `new_position` (1-based), range-shifting everything in
    /// between, all inside one transaction. Returns the refreshed global order.
    pub async fn reorder(
        pool: &SqlitePool,
        id: Uuid,
        new_position: i64,
    ) -> Result<Vec<Self>, ReorderError> {
        let mut tx = pool.begin().await?;

        let row: Option<(i64,)> =
            sqlx::query_as("SELECT sort_order FROM achievements WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let old_position = row.ok_or(ReorderError::NotFound)?.0;

        let (len,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM achievements")
            .fetch_one(&mut *tx)
            .await?;

        if let Some(shift) = plan_move(old_position, new_position, len)? {
            sqlx::query(
                "UPDATE achievements SET sort_order = sort_order + $1
                 WHERE sort_order BETWEEN $2 AND $3",
            )
            .bind(shift.delta)
            .bind(shift.lo)
            .bind(shift.hi)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE achievements SET sort_order = $2, updated_at = CURRENT_TIMESTAMP
                 WHERE id = $1",
            )
            .bind(id)
            .bind(new_position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Self::find_all(pool).await.map_err(Into::into)
    }

    /// Persists a complete order: `ordered_ids` must be exactly the current membership.
    /// Positions `1..=n` are assigned by list order in one transaction.
    pub async fn save_order(
        pool: &SqlitePool,
        ordered_ids: &[Uuid],
    ) -> Result<Vec<Self>, ReorderError> {
        let mut tx = pool.begin().await?;

        let current: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM achievements")
            .fetch_all(&mut *tx)
            .await?;
        if current.len() != ordered_ids.len()
            || !current.iter().all(|(id,)| ordered_ids.contains(id))
        {
            return Err(ReorderError::NotFound);
        }

        for (index, id) in ordered_ids.iter().enumerate() {
            sqlx::query("UPDATE achievements SET sort_order = $2 WHERE id = $1")
                .bind(id)
                .bind(index as i64 + 1)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Self::find_all(pool).await.map_err(Into::into)
    }
}

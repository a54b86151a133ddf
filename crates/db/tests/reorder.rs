//! Integration tests for the ordered-collection persistence gateway, against an
//! in-memory SQLite database.

use std::str::FromStr;

use db::models::{
    ReorderError,
    achievement::{Achievement, CreateAchievement},
    achievement_image::{AchievementImage, ImageInput},
    achievement_link::{AchievementLink, LinkInput},
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use uuid::Uuid;

async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    // A single connection so every query sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    db::MIGRATOR.run(&pool).await.unwrap();
    pool
}

fn new_achievement(title: &str) -> CreateAchievement {
    CreateAchievement {
        title_en: title.to_string(),
        title_th: format!("{title}-th"),
        description_en: None,
        description_th: None,
        awarded_by_en: None,
        awarded_by_th: None,
        awarded_at: None,
        category_id: None,
        published: Some(true),
    }
}

async fn seed_achievements(pool: &SqlitePool, titles: &[&str]) -> Vec<Achievement> {
    let mut created = Vec::new();
    for title in titles {
        created.push(
            Achievement::create(pool, &new_achievement(title))
                .await
                .unwrap(),
        );
    }
    created
}

fn titles(list: &[Achievement]) -> Vec<String> {
    list.iter().map(|a| a.title_en.clone()).collect()
}

fn assert_contiguous_order(positions: &[i64]) {
    let expected: Vec<i64> = (1..=positions.len() as i64).collect();
    assert_eq!(positions, expected.as_slice());
}

async fn add_image(pool: &SqlitePool, achievement_id: Uuid, key: &str) -> Vec<AchievementImage> {
    let mut items: Vec<ImageInput> = AchievementImage::find_by_achievement_id(pool, achievement_id)
        .await
        .unwrap()
        .into_iter()
        .map(|img| ImageInput {
            id: Some(img.id),
            asset_key: img.asset_key,
            alt_text: img.alt_text,
        })
        .collect();
    items.push(ImageInput {
        id: None,
        asset_key: key.to_string(),
        alt_text: None,
    });
    let (images, removed) = AchievementImage::replace_for_achievement(pool, achievement_id, &items)
        .await
        .unwrap();
    assert!(removed.is_empty());
    images
}

#[tokio::test]
async fn create_appends_to_the_end_of_the_order() {
    let pool = test_pool().await;
    seed_achievements(&pool, &["a", "b", "c"]).await;

    let all = Achievement::find_all(&pool).await.unwrap();
    assert_eq!(titles(&all), vec!["a", "b", "c"]);
    assert_contiguous_order(&all.iter().map(|a| a.sort_order).collect::<Vec<_>>());
}

#[tokio::test]
async fn reorder_moves_an_item_later() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["a", "b", "c", "d"]).await;

    let after = Achievement::reorder(&pool, seeded[0].id, 3).await.unwrap();
    assert_eq!(titles(&after), vec!["b", "c", "a", "d"]);
    assert_contiguous_order(&after.iter().map(|a| a.sort_order).collect::<Vec<_>>());
}

#[tokio::test]
async fn reorder_moves_an_item_earlier() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["a", "b", "c", "d"]).await;

    let after = Achievement::reorder(&pool, seeded[3].id, 1).await.unwrap();
    assert_eq!(titles(&after), vec!["d", "a", "b", "c"]);
    assert_contiguous_order(&after.iter().map(|a| a.sort_order).collect::<Vec<_>>());
}

#[tokio::test]
async fn reorder_to_same_position_changes_nothing() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["a", "b", "c"]).await;

    let after = Achievement::reorder(&pool, seeded[1].id, 2).await.unwrap();
    assert_eq!(titles(&after), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn reorder_rejects_out_of_range_positions() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["x", "y", "z"]).await;

    let err = Achievement::reorder(&pool, seeded[0].id, 0).await.unwrap_err();
    assert!(matches!(err, ReorderError::InvalidPosition(_)));

    let err = Achievement::reorder(&pool, seeded[0].id, 4).await.unwrap_err();
    assert!(matches!(err, ReorderError::InvalidPosition(_)));

    // Collection left unmodified.
    let all = Achievement::find_all(&pool).await.unwrap();
    assert_eq!(titles(&all), vec!["x", "y", "z"]);
    assert_contiguous_order(&all.iter().map(|a| a.sort_order).collect::<Vec<_>>());
}

#[tokio::test]
async fn reorder_unknown_id_is_not_found() {
    let pool = test_pool().await;
    seed_achievements(&pool, &["a", "b"]).await;

    let err = Achievement::reorder(&pool, Uuid::new_v4(), 1).await.unwrap_err();
    assert!(matches!(err, ReorderError::NotFound));
}

#[tokio::test]
async fn save_order_round_trips_a_permutation() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["a", "b", "c", "d"]).await;

    let ordered_ids = vec![seeded[2].id, seeded[0].id, seeded[3].id, seeded[1].id];
    let after = Achievement::save_order(&pool, &ordered_ids).await.unwrap();
    assert_eq!(titles(&after), vec!["c", "a", "d", "b"]);
    assert_contiguous_order(&after.iter().map(|a| a.sort_order).collect::<Vec<_>>());

    // Reading back yields the saved sequence exactly.
    let read_back = Achievement::find_all(&pool).await.unwrap();
    assert_eq!(
        read_back.iter().map(|a| a.id).collect::<Vec<_>>(),
        ordered_ids
    );
}

#[tokio::test]
async fn save_order_rejects_membership_mismatch() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["a", "b", "c"]).await;

    // Missing one id.
    let err = Achievement::save_order(&pool, &[seeded[0].id, seeded[1].id])
        .await
        .unwrap_err();
    assert!(matches!(err, ReorderError::NotFound));

    // Foreign id swapped in.
    let err = Achievement::save_order(&pool, &[seeded[0].id, seeded[1].id, Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, ReorderError::NotFound));

    let all = Achievement::find_all(&pool).await.unwrap();
    assert_eq!(titles(&all), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn drag_session_result_persists_through_bulk_save() {
    let pool = test_pool().await;
    seed_achievements(&pool, &["a", "b", "c", "d"]).await;

    // Drive the interactive reorder the way the admin list does: drag "a" past "c",
    // commit, then persist the committed order.
    let mut session =
        utils::ordering::DragSession::new(Achievement::find_all(&pool).await.unwrap());
    session.begin(0).unwrap();
    session.hover(1).unwrap();
    session.hover(2).unwrap();
    let final_order: Vec<Uuid> = session.commit().unwrap().iter().map(|a| a.id).collect();

    let saved = Achievement::save_order(&pool, &final_order).await.unwrap();
    assert_eq!(titles(&saved), vec!["b", "c", "a", "d"]);
    assert_contiguous_order(&saved.iter().map(|a| a.sort_order).collect::<Vec<_>>());
}

#[tokio::test]
async fn delete_closes_the_gap_in_the_order() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["a", "b", "c"]).await;

    assert_eq!(Achievement::delete(&pool, seeded[1].id).await.unwrap(), 1);

    let all = Achievement::find_all(&pool).await.unwrap();
    assert_eq!(titles(&all), vec!["a", "c"]);
    assert_contiguous_order(&all.iter().map(|a| a.sort_order).collect::<Vec<_>>());
}

#[tokio::test]
async fn image_reorder_is_isolated_to_its_achievement() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["first", "second"]).await;

    add_image(&pool, seeded[0].id, "one/a.jpg").await;
    add_image(&pool, seeded[0].id, "one/b.jpg").await;
    let first_images = add_image(&pool, seeded[0].id, "one/c.jpg").await;

    add_image(&pool, seeded[1].id, "two/a.jpg").await;
    let second_images = add_image(&pool, seeded[1].id, "two/b.jpg").await;

    let after = AchievementImage::reorder(&pool, seeded[0].id, first_images[0].id, 3)
        .await
        .unwrap();
    assert_eq!(
        after.iter().map(|i| i.asset_key.clone()).collect::<Vec<_>>(),
        vec!["one/b.jpg", "one/c.jpg", "one/a.jpg"]
    );
    assert_contiguous_order(&after.iter().map(|i| i.sort_order).collect::<Vec<_>>());

    // The sibling achievement's images are untouched.
    let other = AchievementImage::find_by_achievement_id(&pool, seeded[1].id)
        .await
        .unwrap();
    assert_eq!(
        other.iter().map(|i| i.id).collect::<Vec<_>>(),
        second_images.iter().map(|i| i.id).collect::<Vec<_>>()
    );
    assert_contiguous_order(&other.iter().map(|i| i.sort_order).collect::<Vec<_>>());
}

#[tokio::test]
async fn image_reorder_rejects_an_image_from_another_achievement() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["first", "second"]).await;

    add_image(&pool, seeded[0].id, "one/a.jpg").await;
    let foreign = add_image(&pool, seeded[1].id, "two/a.jpg").await;

    let err = AchievementImage::reorder(&pool, seeded[0].id, foreign[0].id, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ReorderError::NotFound));
}

#[tokio::test]
async fn replace_images_deletes_missing_rows_and_renumbers() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["only"]).await;

    add_image(&pool, seeded[0].id, "a.jpg").await;
    add_image(&pool, seeded[0].id, "b.jpg").await;
    let images = add_image(&pool, seeded[0].id, "c.jpg").await;

    // Drop the middle image, keep the others in order.
    let keep: Vec<ImageInput> = [&images[0], &images[2]]
        .iter()
        .map(|img| ImageInput {
            id: Some(img.id),
            asset_key: img.asset_key.clone(),
            alt_text: img.alt_text.clone(),
        })
        .collect();
    let (after, removed) = AchievementImage::replace_for_achievement(&pool, seeded[0].id, &keep)
        .await
        .unwrap();

    assert_eq!(
        after.iter().map(|i| i.asset_key.clone()).collect::<Vec<_>>(),
        vec!["a.jpg", "c.jpg"]
    );
    assert_contiguous_order(&after.iter().map(|i| i.sort_order).collect::<Vec<_>>());
    assert_eq!(removed, vec!["b.jpg".to_string()]);
}

#[tokio::test]
async fn replace_images_updates_survivors_and_inserts_new_rows() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["only"]).await;
    let images = add_image(&pool, seeded[0].id, "a.jpg").await;

    let payload = vec![
        ImageInput {
            id: None,
            asset_key: "new.jpg".to_string(),
            alt_text: Some("fresh".to_string()),
        },
        ImageInput {
            id: Some(images[0].id),
            asset_key: "a.jpg".to_string(),
            alt_text: Some("updated alt".to_string()),
        },
    ];
    let (after, removed) = AchievementImage::replace_for_achievement(&pool, seeded[0].id, &payload)
        .await
        .unwrap();

    assert!(removed.is_empty());
    assert_eq!(
        after.iter().map(|i| i.asset_key.clone()).collect::<Vec<_>>(),
        vec!["new.jpg", "a.jpg"]
    );
    assert_eq!(after[1].alt_text.as_deref(), Some("updated alt"));
    assert_contiguous_order(&after.iter().map(|i| i.sort_order).collect::<Vec<_>>());
}

#[tokio::test]
async fn replace_images_rejects_stale_ids() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["only"]).await;
    add_image(&pool, seeded[0].id, "a.jpg").await;

    let payload = vec![ImageInput {
        id: Some(Uuid::new_v4()),
        asset_key: "ghost.jpg".to_string(),
        alt_text: None,
    }];
    let err = AchievementImage::replace_for_achievement(&pool, seeded[0].id, &payload)
        .await
        .unwrap_err();
    assert!(matches!(err, ReorderError::NotFound));

    // Nothing was deleted or inserted.
    let images = AchievementImage::find_by_achievement_id(&pool, seeded[0].id)
        .await
        .unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].asset_key, "a.jpg");
}

#[tokio::test]
async fn replace_images_rejects_duplicate_ids() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["only"]).await;
    let images = add_image(&pool, seeded[0].id, "a.jpg").await;

    // Repeating an id would write one row twice and leave a hole in the order.
    let entry = ImageInput {
        id: Some(images[0].id),
        asset_key: "a.jpg".to_string(),
        alt_text: None,
    };
    let err =
        AchievementImage::replace_for_achievement(&pool, seeded[0].id, &[entry.clone(), entry])
            .await
            .unwrap_err();
    assert!(matches!(err, ReorderError::DuplicateId));

    // Collection unchanged and still contiguous.
    let after = AchievementImage::find_by_achievement_id(&pool, seeded[0].id)
        .await
        .unwrap();
    assert_eq!(after.len(), 1);
    assert_contiguous_order(&after.iter().map(|i| i.sort_order).collect::<Vec<_>>());
}

#[tokio::test]
async fn replace_links_rejects_duplicate_ids() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["only"]).await;

    let links = AchievementLink::replace_for_achievement(
        &pool,
        seeded[0].id,
        &[LinkInput {
            id: None,
            url: "https://example.com".to_string(),
            label_en: None,
            label_th: None,
        }],
    )
    .await
    .unwrap();

    let entry = LinkInput {
        id: Some(links[0].id),
        url: "https://example.com".to_string(),
        label_en: None,
        label_th: None,
    };
    let err =
        AchievementLink::replace_for_achievement(&pool, seeded[0].id, &[entry.clone(), entry])
            .await
            .unwrap_err();
    assert!(matches!(err, ReorderError::DuplicateId));

    let after = AchievementLink::find_by_achievement_id(&pool, seeded[0].id)
        .await
        .unwrap();
    assert_eq!(after.len(), 1);
    assert_contiguous_order(&after.iter().map(|l| l.sort_order).collect::<Vec<_>>());
}

#[tokio::test]
async fn replace_links_follows_payload_order() {
    let pool = test_pool().await;
    let seeded = seed_achievements(&pool, &["only"]).await;

    let payload = vec![
        LinkInput {
            id: None,
            url: "https://example.com/one".to_string(),
            label_en: Some("one".to_string()),
            label_th: None,
        },
        LinkInput {
            id: None,
            url: "https://example.com/two".to_string(),
            label_en: Some("two".to_string()),
            label_th: None,
        },
    ];
    let links = AchievementLink::replace_for_achievement(&pool, seeded[0].id, &payload)
        .await
        .unwrap();
    assert_eq!(
        links.iter().map(|l| l.url.clone()).collect::<Vec<_>>(),
        vec!["https://example.com/one", "https://example.com/two"]
    );
    assert_contiguous_order(&links.iter().map(|l| l.sort_order).collect::<Vec<_>>());

    // Reverse via reorder and confirm the refreshed list comes back reordered.
    let after = AchievementLink::reorder(&pool, seeded[0].id, links[1].id, 1)
        .await
        .unwrap();
    assert_eq!(
        after.iter().map(|l| l.url.clone()).collect::<Vec<_>>(),
        vec!["https://example.com/two", "https://example.com/one"]
    );
}

pub mod achievement;
pub mod achievement_image;
pub mod achievement_link;
pub mod admin_session;
pub mod category;

use thiserror::Error;
use utils::ordering::PositionError;

/// Failures of the ordered-collection persistence gateway. All variants leave the
/// stored collection unmodified.
#[derive(Debug, Error)]
pub enum ReorderError {
    #[error("item not found in scope")]
    NotFound,
    #[error("duplicate item id in payload")]
    DuplicateId,
    #[error(transparent)]
    InvalidPosition(#[from] PositionError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

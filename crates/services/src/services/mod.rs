pub mod achievements;
pub mod auth;
pub mod storage;
pub mod translation;

pub mod artists;
pub mod availability;
pub mod search;
pub mod shows;
pub mod venues;

use axum::http::StatusCode;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

/// Outcome reported by the DELETE endpoints. Deleting an id that is already
/// gone reports `deleted: false` rather than failing opaquely.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Map a storage failure to a generic response; the detail stays in the log.
pub fn db_err(e: DbErr) -> (StatusCode, String) {
    tracing::error!("database error: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, "database error".to_string())
}

/// Like [`db_err`], but surfaces a unique-key violation on `field` as a
/// conflict the caller can correct.
pub fn constraint_err(e: DbErr, field: &str) -> (StatusCode, String) {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            (StatusCode::CONFLICT, format!("{field} is already taken"))
        }
        _ => db_err(e),
    }
}

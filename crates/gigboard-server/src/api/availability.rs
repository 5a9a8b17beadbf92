use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use gigboard_db::entities::{artist, available_time};
use gigboard_db::AppState;

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Display name for a 0-6 (Monday = 0) weekday index.
pub fn day_name(day_of_week: i16) -> Option<&'static str> {
    usize::try_from(day_of_week)
        .ok()
        .and_then(|d| DAY_NAMES.get(d).copied())
}

fn window_range_valid(start: chrono::NaiveTime, end: chrono::NaiveTime) -> bool {
    // A zero-length window is accepted; only an inverted range is rejected.
    end >= start
}

#[derive(Debug, Serialize)]
pub struct WindowResponse {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub day_of_week: i16,
    pub day_name: Option<&'static str>,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
}

impl From<available_time::Model> for WindowResponse {
    fn from(w: available_time::Model) -> Self {
        Self {
            id: w.id,
            artist_id: w.artist_id,
            day_of_week: w.day_of_week,
            day_name: day_name(w.day_of_week),
            start_time: w.start_time,
            end_time: w.end_time,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddWindowRequest {
    pub day_of_week: i16,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
}

/// GET /api/artists/:id/availability
pub async fn list_windows(
    State(state): State<Arc<AppState>>,
    Path(artist_id): Path<Uuid>,
) -> Result<Json<Vec<WindowResponse>>, (StatusCode, String)> {
    artist::Entity::find_by_id(artist_id)
        .one(&state.db)
        .await
        .map_err(super::db_err)?
        .ok_or((
            StatusCode::NOT_FOUND,
            format!("Artist {artist_id} not found"),
        ))?;

    let windows = available_time::Entity::find()
        .filter(available_time::Column::ArtistId.eq(artist_id))
        .order_by_asc(available_time::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    Ok(Json(windows.into_iter().map(WindowResponse::from).collect()))
}

/// POST /api/artists/:id/availability
pub async fn add_window(
    State(state): State<Arc<AppState>>,
    Path(artist_id): Path<Uuid>,
    Json(body): Json<AddWindowRequest>,
) -> Result<(StatusCode, Json<WindowResponse>), (StatusCode, String)> {
    artist::Entity::find_by_id(artist_id)
        .one(&state.db)
        .await
        .map_err(super::db_err)?
        .ok_or((
            StatusCode::NOT_FOUND,
            format!("Artist {artist_id} not found"),
        ))?;

    if day_name(body.day_of_week).is_none() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "day_of_week must be between 0 (Monday) and 6 (Sunday)".to_string(),
        ));
    }

    if !window_range_valid(body.start_time, body.end_time) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "end time must not be before start time".to_string(),
        ));
    }

    let new_window = available_time::ActiveModel {
        id: Set(Uuid::new_v4()),
        artist_id: Set(artist_id),
        day_of_week: Set(body.day_of_week),
        start_time: Set(body.start_time),
        end_time: Set(body.end_time),
        created_at: Set(chrono::Utc::now().fixed_offset()),
    };

    let created = new_window.insert(&state.db).await.map_err(super::db_err)?;

    Ok((StatusCode::CREATED, Json(WindowResponse::from(created))))
}

/// DELETE /api/availability/:id
pub async fn delete_window(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<super::DeleteResponse>), (StatusCode, String)> {
    let result = available_time::Entity::delete_by_id(id)
        .exec(&state.db)
        .await
        .map_err(super::db_err)?;

    if result.rows_affected == 0 {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(super::DeleteResponse { deleted: false }),
        ));
    }

    Ok((
        StatusCode::OK,
        Json(super::DeleteResponse { deleted: true }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_day_name_bounds() {
        assert_eq!(day_name(0), Some("Monday"));
        assert_eq!(day_name(6), Some("Sunday"));
        assert_eq!(day_name(7), None);
        assert_eq!(day_name(-1), None);
    }

    #[test]
    fn test_zero_length_window_is_valid() {
        let t = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        assert!(window_range_valid(t, t));
    }

    #[test]
    fn test_inverted_window_is_invalid() {
        let start = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        assert!(!window_range_valid(start, end));
    }

    #[test]
    fn test_add_window_request_deserialization() {
        let json = r#"{"day_of_week": 4, "start_time": "18:00:00", "end_time": "23:30:00"}"#;
        let req: AddWindowRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.day_of_week, 4);
        assert_eq!(req.start_time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn test_window_response_carries_day_name() {
        let resp = WindowResponse::from(available_time::Model {
            id: Uuid::new_v4(),
            artist_id: Uuid::new_v4(),
            day_of_week: 5,
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            created_at: chrono::Utc::now().fixed_offset(),
        });
        assert_eq!(resp.day_name, Some("Saturday"));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["day_name"], "Saturday");
        assert_eq!(json["start_time"], "18:00:00");
    }
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use gigboard_db::entities::{artist, show, venue};
use gigboard_db::AppState;

#[derive(Debug, Serialize)]
pub struct ShowListEntry {
    pub venue_id: Uuid,
    pub venue_name: Option<String>,
    pub artist_id: Uuid,
    pub artist_name: Option<String>,
    pub artist_image_url: Option<String>,
    pub start_time: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub venue_id: Uuid,
    pub artist_id: Uuid,
    pub start_time: chrono::NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub created: bool,
    pub show_id: Option<Uuid>,
    pub errors: Vec<String>,
}

/// GET /api/shows — every show with both endpoint names resolved
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShowListEntry>>, (StatusCode, String)> {
    let shows = show::Entity::find()
        .order_by_asc(show::Column::StartTime)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    let venues: HashMap<Uuid, venue::Model> = venue::Entity::find()
        .all(&state.db)
        .await
        .map_err(super::db_err)?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();

    let artists: HashMap<Uuid, artist::Model> = artist::Entity::find()
        .all(&state.db)
        .await
        .map_err(super::db_err)?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    Ok(Json(
        shows
            .into_iter()
            .map(|s| {
                let venue = venues.get(&s.venue_id);
                let artist = artists.get(&s.artist_id);
                ShowListEntry {
                    venue_id: s.venue_id,
                    venue_name: venue.map(|v| v.name.clone()),
                    artist_id: s.artist_id,
                    artist_name: artist.map(|a| a.name.clone()),
                    artist_image_url: artist.and_then(|a| a.image_url.clone()),
                    start_time: s.start_time,
                }
            })
            .collect(),
    ))
}

/// POST /api/shows — the booking flow
///
/// Both references are checked before anything is written, and every failed
/// reference is reported, not just the first. The start time is not bounded
/// against the clock: past-dated bookings backfill history. Availability
/// windows are advisory and not consulted here.
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), (StatusCode, String)> {
    let venue = venue::Entity::find_by_id(body.venue_id)
        .one(&state.db)
        .await
        .map_err(super::db_err)?;

    let artist = artist::Entity::find_by_id(body.artist_id)
        .one(&state.db)
        .await
        .map_err(super::db_err)?;

    let mut errors = Vec::new();
    if venue.is_none() {
        errors.push(format!("venue {} does not exist", body.venue_id));
    }
    if artist.is_none() {
        errors.push(format!("artist {} does not exist", body.artist_id));
    }
    if !errors.is_empty() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(BookingResponse {
                created: false,
                show_id: None,
                errors,
            }),
        ));
    }

    let new_show = show::ActiveModel {
        id: Set(Uuid::new_v4()),
        venue_id: Set(body.venue_id),
        artist_id: Set(body.artist_id),
        start_time: Set(body.start_time),
        created_at: Set(chrono::Utc::now().fixed_offset()),
    };

    let created = new_show.insert(&state.db).await.map_err(super::db_err)?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            created: true,
            show_id: Some(created.id),
            errors: Vec::new(),
        }),
    ))
}

/// DELETE /api/shows/:id
pub async fn delete_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<super::DeleteResponse>), (StatusCode, String)> {
    let result = show::Entity::delete_by_id(id)
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

    #[test]
    fn test_booking_request_deserialization() {
        let json = r#"{
            "venue_id": "550e8400-e29b-41d4-a716-446655440000",
            "artist_id": "660e8400-e29b-41d4-a716-446655440001",
            "start_time": "2035-04-01T20:00:00"
        }"#;
        let req: BookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            req.start_time,
            chrono::NaiveDate::from_ymd_opt(2035, 4, 1)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_booking_response_success_serialization() {
        let resp = BookingResponse {
            created: true,
            show_id: Some(Uuid::new_v4()),
            errors: Vec::new(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["created"], true);
        assert!(json["show_id"].is_string());
        assert!(json["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_booking_response_reports_every_failed_reference() {
        let resp = BookingResponse {
            created: false,
            show_id: None,
            errors: vec![
                "venue 550e8400-e29b-41d4-a716-446655440000 does not exist".into(),
                "artist 660e8400-e29b-41d4-a716-446655440001 does not exist".into(),
            ],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["created"], false);
        assert!(json["show_id"].is_null());
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
    }
}

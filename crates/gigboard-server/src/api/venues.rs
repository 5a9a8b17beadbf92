use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::schedule;
use gigboard_db::entities::{artist, show, venue};
use gigboard_db::genres::{join_genres, split_genres};
use gigboard_db::AppState;

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub facebook_url: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub genres: Vec<String>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<venue::Model> for VenueResponse {
    fn from(v: venue::Model) -> Self {
        Self {
            id: v.id,
            name: v.name,
            city: v.city,
            state: v.state,
            address: v.address,
            phone: v.phone,
            image_url: v.image_url,
            facebook_url: v.facebook_url,
            website: v.website,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
            genres: split_genres(&v.genres),
            created_at: v.created_at,
        }
    }
}

/// A show on the venue page; the artist is the counterpart.
#[derive(Debug, Serialize)]
pub struct VenueShowEntry {
    pub start_time: chrono::NaiveDateTime,
    pub artist_id: Uuid,
    pub artist_name: Option<String>,
    pub artist_image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VenueDetailResponse {
    #[serde(flatten)]
    pub venue: VenueResponse,
    pub past_shows: Vec<VenueShowEntry>,
    pub upcoming_shows: Vec<VenueShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Create and edit share one shape: edits are a full replace, not a patch.
#[derive(Debug, Deserialize)]
pub struct VenuePayload {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub facebook_url: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NameEntry {
    pub id: Uuid,
    pub name: String,
}

/// GET /api/venues — directory listing grouped by (city, state)
pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<schedule::CityGroup>>, (StatusCode, String)> {
    let venues = venue::Entity::find()
        .order_by_asc(venue::Column::Name)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    let shows = show::Entity::find()
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    let now = chrono::Utc::now().naive_utc();
    Ok(Json(schedule::group_by_city(venues, &shows, now)))
}

/// GET /api/venues/recent — the 10 most recently listed venues
pub async fn recent_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NameEntry>>, (StatusCode, String)> {
    let venues = venue::Entity::find()
        .order_by_desc(venue::Column::CreatedAt)
        .limit(10)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    Ok(Json(
        venues
            .into_iter()
            .map(|v| NameEntry {
                id: v.id,
                name: v.name,
            })
            .collect(),
    ))
}

fn to_entries(
    shows: Vec<show::Model>,
    artists: &HashMap<Uuid, artist::Model>,
) -> Vec<VenueShowEntry> {
    shows
        .into_iter()
        .map(|s| {
            let counterpart = artists.get(&s.artist_id);
            VenueShowEntry {
                start_time: s.start_time,
                artist_id: s.artist_id,
                artist_name: counterpart.map(|a| a.name.clone()),
                artist_image_url: counterpart.and_then(|a| a.image_url.clone()),
            }
        })
        .collect()
}

/// GET /api/venues/:id
pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<VenueDetailResponse>, (StatusCode, String)> {
    let venue_model = venue::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(super::db_err)?
        .ok_or((StatusCode::NOT_FOUND, format!("Venue {id} not found")))?;

    let shows = show::Entity::find()
        .filter(show::Column::VenueId.eq(id))
        .order_by_asc(show::Column::StartTime)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    let artist_ids: Vec<Uuid> = shows.iter().map(|s| s.artist_id).collect();
    let artists: HashMap<Uuid, artist::Model> = if artist_ids.is_empty() {
        HashMap::new()
    } else {
        artist::Entity::find()
            .filter(artist::Column::Id.is_in(artist_ids))
            .all(&state.db)
            .await
            .map_err(super::db_err)?
            .into_iter()
            .map(|a| (a.id, a))
            .collect()
    };

    let split = schedule::classify(shows, chrono::Utc::now().naive_utc());
    let past_shows = to_entries(split.past, &artists);
    let upcoming_shows = to_entries(split.upcoming, &artists);

    Ok(Json(VenueDetailResponse {
        venue: VenueResponse::from(venue_model),
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    }))
}

/// POST /api/venues
pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VenuePayload>,
) -> Result<(StatusCode, Json<VenueResponse>), (StatusCode, String)> {
    if body.name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "name must not be empty".to_string(),
        ));
    }

    let new_venue = venue::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(body.name.trim().to_string()),
        city: Set(body.city),
        state: Set(body.state),
        address: Set(body.address),
        phone: Set(body.phone),
        image_url: Set(body.image_url),
        facebook_url: Set(body.facebook_url),
        website: Set(body.website),
        seeking_talent: Set(body.seeking_talent),
        seeking_description: Set(body.seeking_description),
        genres: Set(join_genres(&body.genres)),
        created_at: Set(chrono::Utc::now().fixed_offset()),
    };

    let created = new_venue
        .insert(&state.db)
        .await
        .map_err(|e| super::constraint_err(e, "venue name"))?;

    Ok((StatusCode::CREATED, Json(VenueResponse::from(created))))
}

/// PUT /api/venues/:id — full replace of the mutable fields
pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<VenuePayload>,
) -> Result<Json<VenueResponse>, (StatusCode, String)> {
    if body.name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "name must not be empty".to_string(),
        ));
    }

    let existing = venue::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(super::db_err)?
        .ok_or((StatusCode::NOT_FOUND, format!("Venue {id} not found")))?;

    let mut venue_update: venue::ActiveModel = existing.into();
    venue_update.name = Set(body.name.trim().to_string());
    venue_update.city = Set(body.city);
    venue_update.state = Set(body.state);
    venue_update.address = Set(body.address);
    venue_update.phone = Set(body.phone);
    venue_update.image_url = Set(body.image_url);
    venue_update.facebook_url = Set(body.facebook_url);
    venue_update.website = Set(body.website);
    venue_update.seeking_talent = Set(body.seeking_talent);
    venue_update.seeking_description = Set(body.seeking_description);
    venue_update.genres = Set(join_genres(&body.genres));

    let updated = venue_update
        .update(&state.db)
        .await
        .map_err(|e| super::constraint_err(e, "venue name"))?;

    Ok(Json(VenueResponse::from(updated)))
}

/// DELETE /api/venues/:id — removes the venue and its shows as one unit
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<super::DeleteResponse>), (StatusCode, String)> {
    let existing = venue::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(super::db_err)?;

    if existing.is_none() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(super::DeleteResponse { deleted: false }),
        ));
    }

    let txn = state.db.begin().await.map_err(super::db_err)?;

    show::Entity::delete_many()
        .filter(show::Column::VenueId.eq(id))
        .exec(&txn)
        .await
        .map_err(super::db_err)?;

    venue::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(super::db_err)?;

    txn.commit().await.map_err(super::db_err)?;

    Ok((
        StatusCode::OK,
        Json(super::DeleteResponse { deleted: true }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_venue_model() -> venue::Model {
        venue::Model {
            id: Uuid::new_v4(),
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "1015 Folsom Street".into(),
            phone: Some("123-123-1234".into()),
            image_url: Some("https://img.example.com/hop.jpg".into()),
            facebook_url: Some("https://www.facebook.com/TheMusicalHop".into()),
            website: Some("https://www.themusicalhop.com".into()),
            seeking_talent: true,
            seeking_description: Some("Looking for a local artist.".into()),
            genres: "Jazz,Reggae,Swing".into(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn test_venue_response_splits_genres() {
        let resp = VenueResponse::from(make_venue_model());
        assert_eq!(resp.genres, vec!["Jazz", "Reggae", "Swing"]);
        assert_eq!(resp.city, "San Francisco");
    }

    #[test]
    fn test_venue_detail_serialization_flattens_venue() {
        let detail = VenueDetailResponse {
            venue: VenueResponse::from(make_venue_model()),
            past_shows: vec![],
            upcoming_shows: vec![],
            past_shows_count: 0,
            upcoming_shows_count: 0,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "The Musical Hop");
        assert_eq!(json["past_shows_count"], 0);
        assert!(json["upcoming_shows"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_venue_payload_deserialization() {
        let json = r#"{
            "name": "Park Square Live",
            "city": "San Francisco",
            "state": "CA",
            "address": "34 Whiskey Moore Ave",
            "genres": ["Rock n Roll", "Jazz"],
            "seeking_talent": true,
            "seeking_description": "Every weekend"
        }"#;
        let payload: VenuePayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.genres.len(), 2);
        assert!(payload.seeking_talent);
        assert!(payload.phone.is_none());
    }

    #[test]
    fn test_venue_payload_defaults() {
        let json = r#"{"name": "V", "city": "Austin", "state": "TX", "address": "1 Main"}"#;
        let payload: VenuePayload = serde_json::from_str(json).unwrap();
        assert!(!payload.seeking_talent);
        assert!(payload.genres.is_empty());
    }

    #[test]
    fn test_show_entry_with_missing_counterpart() {
        let entries = to_entries(
            vec![show::Model {
                id: Uuid::new_v4(),
                venue_id: Uuid::new_v4(),
                artist_id: Uuid::new_v4(),
                start_time: Utc::now().naive_utc(),
                created_at: Utc::now().fixed_offset(),
            }],
            &HashMap::new(),
        );
        assert_eq!(entries.len(), 1);
        assert!(entries[0].artist_name.is_none());
    }
}

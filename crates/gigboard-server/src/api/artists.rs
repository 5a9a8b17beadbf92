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

use super::venues::NameEntry;
use crate::schedule;
use gigboard_db::entities::{artist, available_time, show, venue};
use gigboard_db::genres::{join_genres, split_genres};
use gigboard_db::AppState;

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_url: Option<String>,
    pub facebook_url: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub genres: Vec<String>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<artist::Model> for ArtistResponse {
    fn from(a: artist::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone,
            image_url: a.image_url,
            facebook_url: a.facebook_url,
            website: a.website,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
            genres: split_genres(&a.genres),
            created_at: a.created_at,
        }
    }
}

/// A show on the artist page; the venue is the counterpart.
#[derive(Debug, Serialize)]
pub struct ArtistShowEntry {
    pub start_time: chrono::NaiveDateTime,
    pub venue_id: Uuid,
    pub venue_name: Option<String>,
    pub venue_image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailResponse {
    #[serde(flatten)]
    pub artist: ArtistResponse,
    pub past_shows: Vec<ArtistShowEntry>,
    pub upcoming_shows: Vec<ArtistShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
    pub available_times: Vec<super::availability::WindowResponse>,
}

/// Create and edit share one shape: edits are a full replace, not a patch.
#[derive(Debug, Deserialize)]
pub struct ArtistPayload {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_url: Option<String>,
    pub facebook_url: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// GET /api/artists — id and name only, the roster listing
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NameEntry>>, (StatusCode, String)> {
    let artists = artist::Entity::find()
        .order_by_asc(artist::Column::Name)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    Ok(Json(
        artists
            .into_iter()
            .map(|a| NameEntry {
                id: a.id,
                name: a.name,
            })
            .collect(),
    ))
}

/// GET /api/artists/recent — the 10 most recently listed artists
pub async fn recent_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NameEntry>>, (StatusCode, String)> {
    let artists = artist::Entity::find()
        .order_by_desc(artist::Column::CreatedAt)
        .limit(10)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    Ok(Json(
        artists
            .into_iter()
            .map(|a| NameEntry {
                id: a.id,
                name: a.name,
            })
            .collect(),
    ))
}

fn to_entries(
    shows: Vec<show::Model>,
    venues: &HashMap<Uuid, venue::Model>,
) -> Vec<ArtistShowEntry> {
    shows
        .into_iter()
        .map(|s| {
            let counterpart = venues.get(&s.venue_id);
            ArtistShowEntry {
                start_time: s.start_time,
                venue_id: s.venue_id,
                venue_name: counterpart.map(|v| v.name.clone()),
                venue_image_url: counterpart.and_then(|v| v.image_url.clone()),
            }
        })
        .collect()
}

/// GET /api/artists/:id
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArtistDetailResponse>, (StatusCode, String)> {
    let artist_model = artist::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(super::db_err)?
        .ok_or((StatusCode::NOT_FOUND, format!("Artist {id} not found")))?;

    let shows = show::Entity::find()
        .filter(show::Column::ArtistId.eq(id))
        .order_by_asc(show::Column::StartTime)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    let venue_ids: Vec<Uuid> = shows.iter().map(|s| s.venue_id).collect();
    let venues: HashMap<Uuid, venue::Model> = if venue_ids.is_empty() {
        HashMap::new()
    } else {
        venue::Entity::find()
            .filter(venue::Column::Id.is_in(venue_ids))
            .all(&state.db)
            .await
            .map_err(super::db_err)?
            .into_iter()
            .map(|v| (v.id, v))
            .collect()
    };

    let windows = available_time::Entity::find()
        .filter(available_time::Column::ArtistId.eq(id))
        .order_by_asc(available_time::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    let split = schedule::classify(shows, chrono::Utc::now().naive_utc());
    let past_shows = to_entries(split.past, &venues);
    let upcoming_shows = to_entries(split.upcoming, &venues);

    Ok(Json(ArtistDetailResponse {
        artist: ArtistResponse::from(artist_model),
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
        available_times: windows
            .into_iter()
            .map(super::availability::WindowResponse::from)
            .collect(),
    }))
}

/// POST /api/artists
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ArtistPayload>,
) -> Result<(StatusCode, Json<ArtistResponse>), (StatusCode, String)> {
    if body.name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "name must not be empty".to_string(),
        ));
    }

    let new_artist = artist::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(body.name.trim().to_string()),
        city: Set(body.city),
        state: Set(body.state),
        phone: Set(body.phone),
        image_url: Set(body.image_url),
        facebook_url: Set(body.facebook_url),
        website: Set(body.website),
        seeking_venue: Set(body.seeking_venue),
        seeking_description: Set(body.seeking_description),
        genres: Set(join_genres(&body.genres)),
        created_at: Set(chrono::Utc::now().fixed_offset()),
    };

    let created = new_artist
        .insert(&state.db)
        .await
        .map_err(|e| super::constraint_err(e, "artist name"))?;

    Ok((StatusCode::CREATED, Json(ArtistResponse::from(created))))
}

/// PUT /api/artists/:id — full replace of the mutable fields
pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ArtistPayload>,
) -> Result<Json<ArtistResponse>, (StatusCode, String)> {
    if body.name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "name must not be empty".to_string(),
        ));
    }

    let existing = artist::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(super::db_err)?
        .ok_or((StatusCode::NOT_FOUND, format!("Artist {id} not found")))?;

    let mut artist_update: artist::ActiveModel = existing.into();
    artist_update.name = Set(body.name.trim().to_string());
    artist_update.city = Set(body.city);
    artist_update.state = Set(body.state);
    artist_update.phone = Set(body.phone);
    artist_update.image_url = Set(body.image_url);
    artist_update.facebook_url = Set(body.facebook_url);
    artist_update.website = Set(body.website);
    artist_update.seeking_venue = Set(body.seeking_venue);
    artist_update.seeking_description = Set(body.seeking_description);
    artist_update.genres = Set(join_genres(&body.genres));

    let updated = artist_update
        .update(&state.db)
        .await
        .map_err(|e| super::constraint_err(e, "artist name"))?;

    Ok(Json(ArtistResponse::from(updated)))
}

/// DELETE /api/artists/:id — removes the artist, their shows and their
/// availability windows as one unit
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<super::DeleteResponse>), (StatusCode, String)> {
    let existing = artist::Entity::find_by_id(id)
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
        .filter(show::Column::ArtistId.eq(id))
        .exec(&txn)
        .await
        .map_err(super::db_err)?;

    available_time::Entity::delete_many()
        .filter(available_time::Column::ArtistId.eq(id))
        .exec(&txn)
        .await
        .map_err(super::db_err)?;

    artist::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(super::db_err)?;

    txn.commit().await.map_err(super::db_err)?;

    Ok((
        StatusCode::OK,
        Json(super::DeleteResponse { deleted: true }),
    ))
}

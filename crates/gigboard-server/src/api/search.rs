use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::venues::NameEntry;
use gigboard_db::entities::{artist, show, venue};
use gigboard_db::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResults<T: Serialize> {
    pub count: usize,
    pub data: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct VenueHit {
    pub id: Uuid,
    pub name: String,
    pub num_upcoming_shows: u64,
}

fn name_pattern(q: &str) -> String {
    // SECURITY: escape SQL LIKE wildcards to prevent wildcard-abuse DoS
    let escaped = q.trim().replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped.to_lowercase())
}

/// Parse a location query of the exact shape "city, state". Anything that
/// does not split into two comma-separated tokens is malformed; no partial
/// matching is attempted.
fn parse_city_state(q: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = q.split(',').collect();
    if parts.len() != 2 {
        return None;
    }
    Some((parts[0].trim().to_string(), parts[1].trim().to_string()))
}

/// GET /api/venues/search?q=... — case-insensitive substring on name
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults<VenueHit>>, (StatusCode, String)> {
    let pattern = name_pattern(&params.q);

    let venues = venue::Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col((
                venue::Entity,
                venue::Column::Name,
            ))))
            .like(&pattern),
        )
        .order_by_asc(venue::Column::Name)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    let ids: Vec<Uuid> = venues.iter().map(|v| v.id).collect();
    let shows = if ids.is_empty() {
        vec![]
    } else {
        show::Entity::find()
            .filter(show::Column::VenueId.is_in(ids))
            .all(&state.db)
            .await
            .map_err(super::db_err)?
    };

    let now = chrono::Utc::now().naive_utc();
    let data: Vec<VenueHit> = venues
        .into_iter()
        .map(|v| {
            let num_upcoming_shows = shows
                .iter()
                .filter(|s| s.venue_id == v.id && s.start_time >= now)
                .count() as u64;
            VenueHit {
                id: v.id,
                name: v.name,
                num_upcoming_shows,
            }
        })
        .collect();

    Ok(Json(SearchResults {
        count: data.len(),
        data,
    }))
}

/// GET /api/artists/search?q=... — case-insensitive substring on name
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults<NameEntry>>, (StatusCode, String)> {
    let pattern = name_pattern(&params.q);

    let artists = artist::Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col((
                artist::Entity,
                artist::Column::Name,
            ))))
            .like(&pattern),
        )
        .order_by_asc(artist::Column::Name)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    let data: Vec<NameEntry> = artists
        .into_iter()
        .map(|a| NameEntry {
            id: a.id,
            name: a.name,
        })
        .collect();

    Ok(Json(SearchResults {
        count: data.len(),
        data,
    }))
}

/// GET /api/venues/placesearch?q=City,%20State — exact, case-sensitive match
pub async fn placesearch_venues(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults<NameEntry>>, (StatusCode, String)> {
    let (city, st) = parse_city_state(&params.q).ok_or((
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("\"{}\" is not a valid City, State", params.q),
    ))?;

    let venues = venue::Entity::find()
        .filter(venue::Column::City.eq(city))
        .filter(venue::Column::State.eq(st))
        .order_by_asc(venue::Column::Name)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    let data: Vec<NameEntry> = venues
        .into_iter()
        .map(|v| NameEntry {
            id: v.id,
            name: v.name,
        })
        .collect();

    Ok(Json(SearchResults {
        count: data.len(),
        data,
    }))
}

/// GET /api/artists/placesearch?q=City,%20State — exact, case-sensitive match
pub async fn placesearch_artists(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults<NameEntry>>, (StatusCode, String)> {
    let (city, st) = parse_city_state(&params.q).ok_or((
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("\"{}\" is not a valid City, State", params.q),
    ))?;

    let artists = artist::Entity::find()
        .filter(artist::Column::City.eq(city))
        .filter(artist::Column::State.eq(st))
        .order_by_asc(artist::Column::Name)
        .all(&state.db)
        .await
        .map_err(super::db_err)?;

    let data: Vec<NameEntry> = artists
        .into_iter()
        .map(|a| NameEntry {
            id: a.id,
            name: a.name,
        })
        .collect();

    Ok(Json(SearchResults {
        count: data.len(),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_pattern_lowercases_and_wraps() {
        assert_eq!(name_pattern("Hop"), "%hop%");
        assert_eq!(name_pattern("  Music "), "%music%");
    }

    #[test]
    fn test_name_pattern_escapes_wildcards() {
        assert_eq!(name_pattern("100%"), "%100\\%%");
        assert_eq!(name_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_parse_city_state_accepts_two_tokens() {
        assert_eq!(
            parse_city_state("San Francisco, CA"),
            Some(("San Francisco".to_string(), "CA".to_string()))
        );
    }

    #[test]
    fn test_parse_city_state_rejects_missing_comma() {
        assert!(parse_city_state("San Francisco").is_none());
    }

    #[test]
    fn test_parse_city_state_rejects_extra_tokens() {
        assert!(parse_city_state("San Francisco, CA, USA").is_none());
    }

    #[test]
    fn test_search_params_deserialization() {
        let params: SearchParams = serde_json::from_str(r#"{"q": "band"}"#).unwrap();
        assert_eq!(params.q, "band");
    }

    #[test]
    fn test_search_results_serialization() {
        let results = SearchResults {
            count: 1,
            data: vec![VenueHit {
                id: Uuid::new_v4(),
                name: "The Dueling Pianos Bar".into(),
                num_upcoming_shows: 0,
            }],
        };
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"][0]["name"], "The Dueling Pianos Bar");
        assert_eq!(json["data"][0]["num_upcoming_shows"], 0);
    }
}

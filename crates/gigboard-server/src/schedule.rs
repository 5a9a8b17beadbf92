//! Past/upcoming classification and the per-city directory rollup.
//!
//! Both operations take the reference instant as an explicit parameter;
//! handlers pass the current wall clock, tests pass a fixed instant.

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use gigboard_db::entities::{show, venue};

/// Shows split around a reference instant. A show starting exactly at the
/// instant is upcoming, never past.
#[derive(Debug, Default)]
pub struct ClassifiedShows {
    pub past: Vec<show::Model>,
    pub upcoming: Vec<show::Model>,
}

pub fn classify(shows: Vec<show::Model>, reference: NaiveDateTime) -> ClassifiedShows {
    let mut split = ClassifiedShows::default();
    for s in shows {
        if s.start_time < reference {
            split.past.push(s);
        } else {
            split.upcoming.push(s);
        }
    }
    split
}

#[derive(Debug, Serialize)]
pub struct VenueSummary {
    pub id: Uuid,
    pub name: String,
    pub num_upcoming_shows: u64,
}

/// One (city, state) group in the directory listing.
#[derive(Debug, Serialize)]
pub struct CityGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Group venues by exact (city, state) match and count each venue's
/// upcoming shows. A venue with no shows keeps its slot with a count of
/// zero. Keys are compared case-sensitively; no whitespace normalization.
pub fn group_by_city(
    venues: Vec<venue::Model>,
    shows: &[show::Model],
    reference: NaiveDateTime,
) -> Vec<CityGroup> {
    let mut groups: Vec<CityGroup> = Vec::new();
    for v in venues {
        let num_upcoming_shows = shows
            .iter()
            .filter(|s| s.venue_id == v.id && s.start_time >= reference)
            .count() as u64;
        if let Some(group) = groups
            .iter_mut()
            .find(|g| g.city == v.city && g.state == v.state)
        {
            group.venues.push(VenueSummary {
                id: v.id,
                name: v.name,
                num_upcoming_shows,
            });
        } else {
            groups.push(CityGroup {
                city: v.city,
                state: v.state,
                venues: vec![VenueSummary {
                    id: v.id,
                    name: v.name,
                    num_upcoming_shows,
                }],
            });
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn instant(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn make_show(venue_id: Uuid, start_time: NaiveDateTime) -> show::Model {
        show::Model {
            id: Uuid::new_v4(),
            venue_id,
            artist_id: Uuid::new_v4(),
            start_time,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn make_venue(name: &str, city: &str, state: &str) -> venue::Model {
        venue::Model {
            id: Uuid::new_v4(),
            name: name.into(),
            city: city.into(),
            state: state.into(),
            address: "123 Main St".into(),
            phone: None,
            image_url: None,
            facebook_url: None,
            website: None,
            seeking_talent: false,
            seeking_description: None,
            genres: "Jazz".into(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn test_classify_partitions_every_show() {
        let venue_id = Uuid::new_v4();
        let shows = vec![
            make_show(venue_id, instant(10)),
            make_show(venue_id, instant(14)),
            make_show(venue_id, instant(20)),
        ];
        let split = classify(shows, instant(12));
        assert_eq!(split.past.len(), 1);
        assert_eq!(split.upcoming.len(), 2);
        assert!(split.past.iter().all(|s| s.start_time < instant(12)));
        assert!(split.upcoming.iter().all(|s| s.start_time >= instant(12)));
    }

    #[test]
    fn test_show_at_reference_instant_is_upcoming() {
        let shows = vec![make_show(Uuid::new_v4(), instant(12))];
        let split = classify(shows, instant(12));
        assert!(split.past.is_empty());
        assert_eq!(split.upcoming.len(), 1);
    }

    #[test]
    fn test_classify_empty_input() {
        let split = classify(vec![], instant(12));
        assert!(split.past.is_empty());
        assert!(split.upcoming.is_empty());
    }

    #[test]
    fn test_group_by_city_counts_upcoming_only() {
        let v1 = make_venue("The Musical Hop", "San Francisco", "CA");
        let v2 = make_venue("Park Square Live", "San Francisco", "CA");
        let shows = vec![
            make_show(v1.id, instant(10)), // past
            make_show(v1.id, instant(20)), // upcoming
            make_show(v2.id, instant(21)), // upcoming
        ];
        let groups = group_by_city(vec![v1, v2], &shows, instant(12));
        assert_eq!(groups.len(), 1);
        let total: u64 = groups[0].venues.iter().map(|v| v.num_upcoming_shows).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_venue_without_shows_is_listed_with_zero() {
        let v = make_venue("The Dueling Pianos Bar", "New York", "NY");
        let groups = group_by_city(vec![v], &[], instant(12));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].venues.len(), 1);
        assert_eq!(groups[0].venues[0].num_upcoming_shows, 0);
    }

    #[test]
    fn test_grouping_is_case_sensitive() {
        let v1 = make_venue("A", "Austin", "TX");
        let v2 = make_venue("B", "austin", "TX");
        let groups = group_by_city(vec![v1, v2], &[], instant(12));
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_group_requires_both_city_and_state() {
        let v1 = make_venue("A", "Springfield", "IL");
        let v2 = make_venue("B", "Springfield", "MO");
        let v3 = make_venue("C", "Springfield", "IL");
        let groups = group_by_city(vec![v1, v2, v3], &[], instant(12));
        assert_eq!(groups.len(), 2);
        let il = groups
            .iter()
            .find(|g| g.city == "Springfield" && g.state == "IL")
            .unwrap();
        assert_eq!(il.venues.len(), 2);
    }

    #[test]
    fn test_group_sums_match_classified_upcoming() {
        let v1 = make_venue("A", "Austin", "TX");
        let v2 = make_venue("B", "Austin", "TX");
        let shows = vec![
            make_show(v1.id, instant(9)),
            make_show(v1.id, instant(13)),
            make_show(v2.id, instant(12)),
            make_show(v2.id, instant(23)),
        ];
        let reference = instant(12);
        let upcoming_total = classify(shows.clone(), reference).upcoming.len() as u64;
        let groups = group_by_city(vec![v1, v2], &shows, reference);
        let group_total: u64 = groups
            .iter()
            .flat_map(|g| g.venues.iter())
            .map(|v| v.num_upcoming_shows)
            .sum();
        assert_eq!(group_total, upcoming_total);
        assert_eq!(group_total, 3);
    }
}

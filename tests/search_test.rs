//! Search pipeline properties, exercised through the public `search` API.
//!
//! Run with: `cargo test --test search_test`
use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use profixer_backend::models::profiles::{self, CraftsmanType, Roles};
use profixer_backend::search::{
    CraftsmanSearchQuery, GeoPoint, SearchCriteria, compose_results, haversine_km,
};

const BUCHAREST: (f64, f64) = (44.4268, 26.1025);

fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).unwrap()
}

fn craftsman(trade: CraftsmanType, location: Option<(f64, f64)>) -> profiles::Model {
    profiles::Model {
        id: Uuid::new_v4(),
        email: "pro@example.com".to_string(),
        first_name: Some("Vasile".to_string()),
        last_name: Some("Marin".to_string()),
        phone: None,
        role: Roles::Professional,
        craftsman_type: Some(trade),
        description: None,
        address: None,
        city: None,
        county: None,
        latitude: location.map(|l| l.0),
        longitude: location.map(|l| l.1),
        avatar_url: None,
        subscription_active: false,
        subscription_end_date: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

#[test]
fn distance_is_zero_to_itself_and_symmetric() {
    let points = [
        point(BUCHAREST.0, BUCHAREST.1),
        point(-33.8688, 151.2093),
        point(64.1466, -21.9426),
        point(0.0, 180.0),
    ];

    for a in points {
        assert_eq!(haversine_km(a, a), 0.0);
        for b in points {
            assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
        }
    }
}

#[test]
fn distances_along_a_great_circle_add_up() {
    let a = point(-20.0, 100.0);
    let b = point(15.0, 100.0);
    let c = point(70.0, 100.0);

    let direct = haversine_km(a, c);
    let via_b = haversine_km(a, b) + haversine_km(b, c);
    assert!((direct - via_b).abs() < 1e-6);
}

#[test]
fn same_spot_within_ten_km_is_included() {
    let criteria = SearchCriteria::from(CraftsmanSearchQuery {
        max_distance: Some(10.0),
        lat: Some(BUCHAREST.0),
        lon: Some(BUCHAREST.1),
        ..Default::default()
    });
    let p = craftsman(CraftsmanType::Plumber, Some(BUCHAREST));

    let results = compose_results(vec![p], &HashMap::new(), &criteria);
    assert_eq!(results.len(), 1);
}

#[test]
fn rating_equal_to_minimum_is_included() {
    let p = craftsman(CraftsmanType::Plumber, None);
    let ratings = HashMap::from([(p.id, vec![3, 4, 5])]);
    let criteria = SearchCriteria::from(CraftsmanSearchQuery {
        min_rating: Some(4.0),
        ..Default::default()
    });

    assert_eq!(compose_results(vec![p], &ratings, &criteria).len(), 1);
}

#[test]
fn zero_reviews_against_minimum_rating() {
    let p = craftsman(CraftsmanType::Plumber, None);

    let at_zero = SearchCriteria::from(CraftsmanSearchQuery {
        min_rating: Some(0.0),
        ..Default::default()
    });
    let above_zero = SearchCriteria::from(CraftsmanSearchQuery {
        min_rating: Some(1.0),
        ..Default::default()
    });

    assert_eq!(compose_results(vec![p.clone()], &HashMap::new(), &at_zero).len(), 1);
    assert!(compose_results(vec![p], &HashMap::new(), &above_zero).is_empty());
}

#[test]
fn missing_geolocation_is_never_excluded_by_distance() {
    let p = craftsman(CraftsmanType::Plumber, None);
    let criteria = SearchCriteria::from(CraftsmanSearchQuery {
        max_distance: Some(0.001),
        lat: Some(BUCHAREST.0),
        lon: Some(BUCHAREST.1),
        ..Default::default()
    });

    let results = compose_results(vec![p], &HashMap::new(), &criteria);
    assert_eq!(results.len(), 1);
    assert!(results[0].distance_km.is_none());
}

#[test]
fn plumber_filter_excludes_electricians() {
    let criteria = SearchCriteria::from(CraftsmanSearchQuery {
        craftsman_type: Some(CraftsmanType::Plumber),
        ..Default::default()
    });
    let profiles = vec![
        craftsman(CraftsmanType::Electrician, None),
        craftsman(CraftsmanType::Plumber, None),
    ];

    let results = compose_results(profiles, &HashMap::new(), &criteria);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].profile.craftsman_type, Some(CraftsmanType::Plumber));
}

#[test]
fn query_string_parses_into_criteria() {
    let query: CraftsmanSearchQuery = serde_json::from_value(serde_json::json!({
        "search": " Marin ",
        "craftsman_type": "hvac_technician",
        "max_distance": 15.0,
        "min_rating": 3.5,
        "lat": 44.4,
        "lon": 26.1
    }))
    .unwrap();
    let criteria = SearchCriteria::from(query);

    assert_eq!(criteria.term.as_deref(), Some("marin"));
    assert_eq!(criteria.craftsman_type, Some(CraftsmanType::HvacTechnician));
    assert_eq!(criteria.max_distance_km, 15.0);
    assert_eq!(criteria.min_rating, 3.5);
    assert_eq!(criteria.user_location, Some(point(44.4, 26.1)));
}

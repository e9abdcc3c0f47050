//! Craftsman search against a mocked Postgres connection.
//!
//! Run with: `cargo test --test search_service_test`
use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
use uuid::Uuid;

use profixer_backend::models::profiles::{self, CraftsmanType, Roles};
use profixer_backend::models::reviews;
use profixer_backend::search::{GeoPoint, SearchCriteria, search_craftsmen};

fn professional(first: &str, location: Option<(f64, f64)>) -> profiles::Model {
    profiles::Model {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", first.to_lowercase()),
        first_name: Some(first.to_string()),
        last_name: Some("Ionescu".to_string()),
        phone: None,
        role: Roles::Professional,
        craftsman_type: Some(CraftsmanType::Electrician),
        description: None,
        address: None,
        city: Some("Bucuresti".to_string()),
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

fn review(craftsman_id: Uuid, rating: i32) -> reviews::Model {
    reviews::Model {
        id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        craftsman_id,
        rating,
        comment: None,
        craftsman_response: None,
        response_at: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn ratings_and_distance_are_applied_after_the_fetch() {
    let close = professional("Close", Some((44.4300, 26.1000)));
    let far = professional("Far", Some((46.7712, 23.6236)));
    let unlocated = professional("Unlocated", None);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![close.clone(), far.clone(), unlocated.clone()]])
        .append_query_results([vec![
            review(close.id, 5),
            review(close.id, 4),
            review(far.id, 5),
            review(unlocated.id, 2),
        ]])
        .into_connection();

    let criteria = SearchCriteria {
        max_distance_km: 25.0,
        min_rating: 3.0,
        user_location: GeoPoint::new(44.4268, 26.1025),
        ..Default::default()
    };

    let results = search_craftsmen(&db, &criteria).await;

    // Far is out of range, Unlocated is under the rating threshold.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].profile.id, close.id);
    assert_eq!(results[0].average_rating, 4.5);
    assert_eq!(results[0].review_count, 2);
    assert!(results[0].distance_km.unwrap() < 1.0);
}

#[tokio::test]
async fn no_matching_profiles_skips_the_review_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<profiles::Model>::new()])
        .into_connection();

    assert!(search_craftsmen(&db, &SearchCriteria::default()).await.is_empty());
}

#[tokio::test]
async fn database_failure_yields_an_empty_list() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset".to_string())])
        .into_connection();

    assert!(search_craftsmen(&db, &SearchCriteria::default()).await.is_empty());
}

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use super::criteria::SearchCriteria;
use super::geo::GeoPoint;
use super::rating::RatingSummary;
use crate::models::profiles::{self, PublicProfile};

/// One entry of the craftsman search result.
#[derive(Debug, Clone, Serialize)]
pub struct CraftsmanResult {
    #[serde(flatten)]
    pub profile: PublicProfile,
    pub average_rating: f64,
    pub review_count: usize,
    pub distance_km: Option<f64>,
}

/// Apply rating and distance thresholds to fetched profiles.
///
/// `ratings` maps craftsman id to every rating they received; a missing
/// entry means no reviews. Output is nearest first, unknown distance last,
/// ties broken by higher rating.
pub fn compose_results(
    profiles: Vec<profiles::Model>,
    ratings: &HashMap<Uuid, Vec<i32>>,
    criteria: &SearchCriteria,
) -> Vec<CraftsmanResult> {
    let mut results: Vec<CraftsmanResult> = profiles
        .into_iter()
        .filter(|p| criteria.matches_profile(p))
        .filter_map(|profile| {
            let summary = ratings
                .get(&profile.id)
                .map(|r| RatingSummary::from_ratings(r))
                .unwrap_or(RatingSummary {
                    average: 0.0,
                    count: 0,
                });
            if !criteria.meets_rating(summary.average) {
                return None;
            }

            let location = GeoPoint::from_parts(profile.latitude, profile.longitude);
            let (in_range, distance_km) = criteria.within_distance(location);
            if !in_range {
                return None;
            }

            Some(CraftsmanResult {
                profile: PublicProfile::from(profile),
                average_rating: summary.average,
                review_count: summary.count,
                distance_km,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        let by_distance = match (a.distance_km, b.distance_km) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_distance.then_with(|| b.average_rating.total_cmp(&a.average_rating))
    });

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::{CraftsmanType, Roles};
    use chrono::Utc;

    fn craftsman(first: &str, trade: CraftsmanType, location: Option<(f64, f64)>) -> profiles::Model {
        profiles::Model {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", first.to_lowercase()),
            first_name: Some(first.to_string()),
            last_name: Some("Popescu".to_string()),
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
            subscription_active: true,
            subscription_end_date: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    const BUCHAREST: (f64, f64) = (44.4268, 26.1025);
    const CLUJ: (f64, f64) = (46.7712, 23.6236);

    fn near_bucharest() -> SearchCriteria {
        SearchCriteria {
            max_distance_km: 10.0,
            user_location: GeoPoint::new(BUCHAREST.0, BUCHAREST.1),
            ..Default::default()
        }
    }

    #[test]
    fn same_location_is_within_range() {
        let p = craftsman("Ion", CraftsmanType::Plumber, Some(BUCHAREST));
        let results = compose_results(vec![p], &HashMap::new(), &near_bucharest());

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].distance_km, Some(0.0));
    }

    #[test]
    fn far_away_craftsman_is_excluded() {
        let p = craftsman("Ion", CraftsmanType::Plumber, Some(CLUJ));
        let results = compose_results(vec![p], &HashMap::new(), &near_bucharest());
        assert!(results.is_empty());
    }

    #[test]
    fn craftsman_without_location_is_kept() {
        let p = craftsman("Ion", CraftsmanType::Plumber, None);
        let criteria = SearchCriteria {
            max_distance_km: 0.0,
            ..near_bucharest()
        };

        let results = compose_results(vec![p], &HashMap::new(), &criteria);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].distance_km, None);
    }

    #[test]
    fn invalid_stored_coordinates_count_as_no_location() {
        let p = craftsman("Ion", CraftsmanType::Plumber, Some((f64::NAN, 26.0)));
        let results = compose_results(vec![p], &HashMap::new(), &near_bucharest());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn no_user_location_disables_distance_filter() {
        let p = craftsman("Ion", CraftsmanType::Plumber, Some(CLUJ));
        let criteria = SearchCriteria {
            max_distance_km: 1.0,
            ..Default::default()
        };

        assert_eq!(compose_results(vec![p], &HashMap::new(), &criteria).len(), 1);
    }

    #[test]
    fn rating_threshold_is_inclusive() {
        let p = craftsman("Ion", CraftsmanType::Plumber, None);
        let ratings = HashMap::from([(p.id, vec![4, 5])]);
        let criteria = SearchCriteria {
            min_rating: 4.5,
            ..Default::default()
        };

        let results = compose_results(vec![p], &ratings, &criteria);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].average_rating, 4.5);
        assert_eq!(results[0].review_count, 2);
    }

    #[test]
    fn unreviewed_craftsman_only_passes_zero_threshold() {
        let p = craftsman("Ion", CraftsmanType::Plumber, None);

        let zero = SearchCriteria::default();
        assert_eq!(compose_results(vec![p.clone()], &HashMap::new(), &zero).len(), 1);

        let some = SearchCriteria {
            min_rating: 0.5,
            ..Default::default()
        };
        assert!(compose_results(vec![p], &HashMap::new(), &some).is_empty());
    }

    #[test]
    fn trade_filter_excludes_other_trades() {
        let electrician = craftsman("Ion", CraftsmanType::Electrician, Some(BUCHAREST));
        let criteria = SearchCriteria {
            craftsman_type: Some(CraftsmanType::Plumber),
            ..near_bucharest()
        };
        assert!(compose_results(vec![electrician], &HashMap::new(), &criteria).is_empty());
    }

    #[test]
    fn name_match_is_case_insensitive_on_either_name() {
        let p = craftsman("Mihai", CraftsmanType::Painter, None);
        let by_first = SearchCriteria {
            term: Some("hai".to_string()),
            ..Default::default()
        };
        let by_last = SearchCriteria {
            term: Some("popes".to_string()),
            ..Default::default()
        };
        let miss = SearchCriteria {
            term: Some("ionescu".to_string()),
            ..Default::default()
        };

        assert_eq!(compose_results(vec![p.clone()], &HashMap::new(), &by_first).len(), 1);
        assert_eq!(compose_results(vec![p.clone()], &HashMap::new(), &by_last).len(), 1);
        assert!(compose_results(vec![p], &HashMap::new(), &miss).is_empty());
    }

    #[test]
    fn non_professionals_are_dropped() {
        let mut client = craftsman("Ana", CraftsmanType::Other, None);
        client.role = Roles::Client;
        assert!(compose_results(vec![client], &HashMap::new(), &SearchCriteria::default()).is_empty());
    }

    #[test]
    fn nearest_first_then_unknown_distance() {
        let near = craftsman("Near", CraftsmanType::Plumber, Some((44.43, 26.11)));
        let nowhere = craftsman("Nowhere", CraftsmanType::Plumber, None);
        let here = craftsman("Here", CraftsmanType::Plumber, Some(BUCHAREST));

        let results = compose_results(vec![nowhere, near, here], &HashMap::new(), &near_bucharest());
        let names: Vec<_> = results
            .iter()
            .map(|r| r.profile.first_name.clone().unwrap())
            .collect();
        assert_eq!(names, ["Here", "Near", "Nowhere"]);
    }
}

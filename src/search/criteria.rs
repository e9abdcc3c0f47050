use serde::Deserialize;

use super::geo::GeoPoint;
use crate::models::profiles::{self, CraftsmanType, Roles};

pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// Query string of `GET /api/craftsmen`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CraftsmanSearchQuery {
    pub search: Option<String>,
    pub craftsman_type: Option<CraftsmanType>,
    pub max_distance: Option<f64>,
    pub min_rating: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Normalised search inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    /// Lowercased and trimmed; `None` when blank.
    pub term: Option<String>,
    pub craftsman_type: Option<CraftsmanType>,
    pub max_distance_km: f64,
    pub min_rating: f64,
    pub user_location: Option<GeoPoint>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            term: None,
            craftsman_type: None,
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            min_rating: 0.0,
            user_location: None,
        }
    }
}

impl From<CraftsmanSearchQuery> for SearchCriteria {
    fn from(q: CraftsmanSearchQuery) -> Self {
        let term = q
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Self {
            term,
            craftsman_type: q.craftsman_type,
            max_distance_km: q
                .max_distance
                .filter(|d| d.is_finite())
                .unwrap_or(DEFAULT_MAX_DISTANCE_KM),
            min_rating: q.min_rating.filter(|r| r.is_finite()).unwrap_or(0.0),
            user_location: GeoPoint::from_parts(q.lat, q.lon),
        }
    }
}

impl SearchCriteria {
    /// Role, name and trade checks. These are the conditions the database
    /// query also applies.
    pub fn matches_profile(&self, profile: &profiles::Model) -> bool {
        profile.role == Roles::Professional && self.matches_name(profile) && self.matches_trade(profile)
    }

    fn matches_name(&self, profile: &profiles::Model) -> bool {
        let Some(term) = &self.term else {
            return true;
        };
        [&profile.first_name, &profile.last_name]
            .into_iter()
            .flatten()
            .any(|name| name.to_lowercase().contains(term.as_str()))
    }

    fn matches_trade(&self, profile: &profiles::Model) -> bool {
        match self.craftsman_type {
            Some(wanted) => profile.craftsman_type == Some(wanted),
            None => true,
        }
    }

    pub fn meets_rating(&self, average: f64) -> bool {
        average >= self.min_rating
    }

    /// Distance check. Profiles without a usable location, or searches
    /// without one, always pass. Returns the distance when it was computed.
    pub fn within_distance(&self, location: Option<GeoPoint>) -> (bool, Option<f64>) {
        match (self.user_location, location) {
            (Some(user), Some(craftsman)) => {
                let distance = user.distance_km(&craftsman);
                (distance <= self.max_distance_km, Some(distance))
            }
            _ => (true, None),
        }
    }
}

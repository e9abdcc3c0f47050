use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Returns `None` for non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a point from the two nullable columns a profile stores.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            _ => None,
        }
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(*self, *other)
    }
}

/// Great-circle distance in kilometres between two points.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin() * (dlat / 2.0).sin()
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin() * (dlon / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUCHAREST: GeoPoint = GeoPoint {
        latitude: 44.4268,
        longitude: 26.1025,
    };
    const CLUJ: GeoPoint = GeoPoint {
        latitude: 46.7712,
        longitude: 23.6236,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(BUCHAREST, BUCHAREST), 0.0);
        assert_eq!(haversine_km(CLUJ, CLUJ), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(BUCHAREST, CLUJ);
        let back = haversine_km(CLUJ, BUCHAREST);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn bucharest_to_cluj() {
        let d = haversine_km(BUCHAREST, CLUJ);
        assert!((d - 324.23).abs() < 0.5, "got {d}");
    }

    #[test]
    fn one_degree_of_longitude_on_the_equator() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(0.0, 1.0).unwrap();
        assert!((haversine_km(a, b) - 111.195).abs() < 0.01);
    }

    #[test]
    fn distances_add_up_along_a_meridian() {
        let a = GeoPoint::new(10.0, 25.0).unwrap();
        let b = GeoPoint::new(30.0, 25.0).unwrap();
        let c = GeoPoint::new(55.0, 25.0).unwrap();

        let direct = haversine_km(a, c);
        let via_b = haversine_km(a, b) + haversine_km(b, c);
        assert!((direct - via_b).abs() < 1e-6, "{direct} vs {via_b}");
    }

    #[test]
    fn distances_add_up_along_the_equator() {
        let a = GeoPoint::new(0.0, -40.0).unwrap();
        let b = GeoPoint::new(0.0, 5.0).unwrap();
        let c = GeoPoint::new(0.0, 60.0).unwrap();

        let direct = haversine_km(a, c);
        let via_b = haversine_km(a, b) + haversine_km(b, c);
        assert!((direct - via_b).abs() < 1e-6);
    }

    #[test]
    fn rejects_invalid_coordinates() {
        assert!(GeoPoint::new(f64::NAN, 10.0).is_none());
        assert!(GeoPoint::new(10.0, f64::INFINITY).is_none());
        assert!(GeoPoint::new(91.0, 0.0).is_none());
        assert!(GeoPoint::new(0.0, -180.5).is_none());
        assert!(GeoPoint::new(-90.0, 180.0).is_some());
    }

    #[test]
    fn from_parts_needs_both_columns() {
        assert!(GeoPoint::from_parts(Some(44.0), None).is_none());
        assert!(GeoPoint::from_parts(None, Some(26.0)).is_none());
        assert_eq!(
            GeoPoint::from_parts(Some(44.4268), Some(26.1025)),
            Some(BUCHAREST)
        );
    }
}

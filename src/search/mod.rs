//! Craftsman search: the query criteria, distance and rating maths, and the
//! composition step that turns fetched rows into the client-facing list.

pub mod compose;
pub mod criteria;
pub mod geo;
pub mod rating;
pub mod service;

pub use compose::{CraftsmanResult, compose_results};
pub use criteria::{CraftsmanSearchQuery, SearchCriteria};
pub use geo::{GeoPoint, haversine_km};
pub use rating::{RatingSummary, average_rating};
pub use service::search_craftsmen;

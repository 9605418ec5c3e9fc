use crate::core::distance::{haversine_distance, is_within_bounding_box, BoundingBox};
use crate::models::{BusinessRecord, UserQuery};

/// Check if a record's category list satisfies the query's category filter
///
/// A raw case-sensitive substring test on the stringified category list,
/// kept for behavioral compatibility with the upstream system. An empty or
/// absent query category always passes.
#[inline]
pub fn matches_category(record: &BusinessRecord, query: &UserQuery) -> bool {
    match query.category.as_deref() {
        None | Some("") => true,
        Some(category) => record.categories.contains(category),
    }
}

/// Check if a record is within the query radius
#[inline]
pub fn within_radius(record: &BusinessRecord, query: &UserQuery) -> bool {
    haversine_distance(&query.origin, &record.coordinate) < query.max_distance_km
}

/// Full relevance check: category filter AND radius
///
/// Pure and deterministic for a fixed query. The optional bounding box is a
/// pre-filter only; the exact Haversine distance still decides.
#[inline]
pub fn is_relevant(record: &BusinessRecord, query: &UserQuery, bbox: Option<&BoundingBox>) -> bool {
    if let Some(bbox) = bbox {
        if !is_within_bounding_box(&record.coordinate, bbox) {
            return false;
        }
    }

    matches_category(record, query) && within_radius(record, query)
}

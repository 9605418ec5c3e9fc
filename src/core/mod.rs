// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod recommender;
pub mod selector;

pub use distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box};
pub use filters::{is_relevant, matches_category, within_radius};
pub use recommender::{Recommender, DEFAULT_SORT_CAP};
pub use selector::select_top_n;

use crate::core::{
    distance::calculate_bounding_box,
    filters::is_relevant,
    selector::select_top_n,
};
use crate::models::{BusinessRecord, RecommendationResult, RecordError, UserQuery};

/// Default cap on how many ranked records feed the dedup selector
///
/// Bounds downstream dedup work on huge inputs; large enough that it never
/// changes a top-5 result in practice.
pub const DEFAULT_SORT_CAP: usize = 150;

/// Ranking engine for one query over a materialized batch
///
/// # Pipeline stages
/// 1. Drop malformed records (logged, never aborts the batch)
/// 2. Relevance filter (bounding box pre-filter, category, exact radius)
/// 3. Stable sort by stars descending (ties keep source order)
/// 4. Cap the ranked prefix
/// 5. Deduplicating top-N selection
#[derive(Debug, Clone)]
pub struct Recommender {
    sort_cap: usize,
}

impl Recommender {
    pub fn new(sort_cap: usize) -> Self {
        Self { sort_cap }
    }

    /// Rank a batch of per-record parse results against a query
    ///
    /// Pure apart from the skip logging: the same records and query always
    /// produce the same result.
    pub fn rank(
        &self,
        records: Vec<Result<BusinessRecord, RecordError>>,
        query: &UserQuery,
    ) -> RecommendationResult {
        let total_candidates = records.len();
        let bbox = calculate_bounding_box(&query.origin, query.max_distance_km);

        let mut skipped_malformed = 0;
        let mut relevant: Vec<BusinessRecord> = records
            .into_iter()
            .filter_map(|parsed| match parsed {
                Ok(record) => Some(record),
                Err(e) => {
                    skipped_malformed += 1;
                    tracing::warn!("Skipping record: {}", e);
                    None
                }
            })
            .filter(|record| is_relevant(record, query, Some(&bbox)))
            .collect();

        // Stable sort: equal ratings keep their source order
        relevant.sort_by(|a, b| {
            b.stars
                .partial_cmp(&a.stars)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        relevant.truncate(self.sort_cap);

        let records = select_top_n(relevant, query.top_n);

        RecommendationResult {
            records,
            total_candidates,
            skipped_malformed,
        }
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(DEFAULT_SORT_CAP)
    }
}

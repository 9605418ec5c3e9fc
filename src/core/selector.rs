use crate::models::BusinessRecord;
use std::collections::HashSet;

/// Select the first `n` records with distinct business ids
///
/// Input must already be ranked (stars descending, stable); this never
/// reorders. Relative order among kept records is preserved, and if the
/// input holds fewer than `n` unique ids the result is shorter than `n` —
/// that is intentional, not padding.
pub fn select_top_n(records: Vec<BusinessRecord>, n: usize) -> Vec<BusinessRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(n);
    let mut selected = Vec::with_capacity(n);

    for record in records {
        if selected.len() == n {
            break;
        }
        if seen.insert(record.business_id.clone()) {
            selected.push(record);
        }
    }

    selected
}

use std::collections::BTreeMap;

use crate::ListingViewModel;

/// Collapse near-duplicate listings so no two survivors share a
/// `(restaurant_id, normalized title)` key.
///
/// Survivor rule per key: strictly greater remaining quantity wins; on a
/// tie, the numerically larger id (treated as more recent) wins. The rule
/// is commutative and transitive, so input order never changes which entry
/// survives. Output order is deterministic (sorted by key) but callers may
/// only rely on "one element per key".
pub fn dedupe_listings(items: Vec<ListingViewModel>) -> Vec<ListingViewModel> {
    let mut survivors: BTreeMap<(i64, String), ListingViewModel> = BTreeMap::new();

    for item in items {
        let key = (item.restaurant_id, item.dedupe_title());
        match survivors.get(&key) {
            Some(existing) if !wins_over(&item, existing) => {}
            _ => {
                survivors.insert(key, item);
            }
        }
    }

    survivors.into_values().collect()
}

fn wins_over(candidate: &ListingViewModel, existing: &ListingViewModel) -> bool {
    candidate.remaining_quantity > existing.remaining_quantity
        || (candidate.remaining_quantity == existing.remaining_quantity
            && candidate.id > existing.id)
}

use crate::{
    closure::closure,
    error::Result,
    subsets::{index_subsets, select},
    Attribute, AttributeSet, FunctionalDependency,
};
use bit_set::BitSet;

/// Find every candidate key (minimal superkey) of `attrs` under `deps`.
///
/// Subsets are visited smallest first, and any subset containing an accepted key is
/// skipped without computing its closure. Keys are returned in discovery order, i.e.
/// by size and then lexicographically, so the first key is the one used as a
/// default primary key.
pub fn candidate_keys(
    attrs: &AttributeSet,
    deps: &[FunctionalDependency],
    limit: usize,
) -> Result<Vec<AttributeSet>> {
    if attrs.is_empty() {
        return Ok(vec![]);
    }
    if deps.is_empty() {
        return Ok(vec![attrs.clone()]);
    }

    let indexed: Vec<&Attribute> = attrs.iter().collect();
    let mut accepted: Vec<(BitSet, AttributeSet)> = vec![];
    let mut visited = 0usize;

    for mask in index_subsets(indexed.len(), limit)? {
        if accepted.iter().any(|(key, _)| key.is_subset(&mask)) {
            continue;
        }

        visited += 1;
        let subset = select(&indexed, &mask);
        if closure(&subset, deps)?.is_superset(attrs) {
            // Unreachable with size-ordered enumeration, kept as an explicit invariant.
            accepted.retain(|(key, _)| !mask.is_subset(key));
            accepted.push((mask, subset));
        }
    }

    debug!(
        "{} candidate keys of {} after {} closures",
        accepted.len(),
        attrs,
        visited
    );
    Ok(accepted.into_iter().map(|(_, key)| key).collect())
}

/// Attributes that belong to at least one candidate key.
pub fn prime_attributes(keys: &[AttributeSet]) -> AttributeSet {
    keys.iter().flat_map(|key| key.iter().cloned()).collect()
}

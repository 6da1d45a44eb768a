use crate::{error::Result, Attribute, AttributeSet, NormalizeError};
use bit_set::BitSet;
use itertools::Itertools;

/// Refuse exponential enumeration over more than `limit` attributes.
pub fn check_attribute_limit(count: usize, limit: usize) -> Result<()> {
    if count > limit {
        return Err(NormalizeError::TooManyAttributes { count, limit });
    }
    Ok(())
}

/// Enumerate all non-empty index subsets of `0..n` as bit masks.
///
/// Masks come out by ascending cardinality; within one size they follow the
/// lexicographic order of their sorted index lists.
pub fn index_subsets(n: usize, limit: usize) -> Result<impl Iterator<Item = BitSet>> {
    check_attribute_limit(n, limit)?;
    Ok((1..=n).flat_map(move |k| {
        (0..n).combinations(k).map(move |indices| {
            let mut mask = BitSet::with_capacity(n);
            mask.extend(indices);
            mask
        })
    }))
}

/// Materialize the attributes selected by `mask` from an indexed attribute list.
pub fn select(attrs: &[&Attribute], mask: &BitSet) -> AttributeSet {
    mask.iter().map(|i| attrs[i].clone()).collect()
}

/// Enumerate all `2^n - 1` non-empty subsets of `attrs`, smallest first.
///
/// Ties are broken by the lexicographic order of the attributes.
pub fn subsets(
    attrs: &AttributeSet,
    limit: usize,
) -> Result<impl Iterator<Item = AttributeSet> + '_> {
    let indexed: Vec<&Attribute> = attrs.iter().collect();
    Ok(index_subsets(indexed.len(), limit)?.map(move |mask| select(&indexed, &mask)))
}

/// Enumerate the non-empty proper subsets of `attrs`, smallest first.
pub fn proper_subsets(
    attrs: &AttributeSet,
    limit: usize,
) -> Result<impl Iterator<Item = AttributeSet> + '_> {
    let n = attrs.len();
    Ok(subsets(attrs, limit)?.take_while(move |s| s.len() < n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attrs, config::MAX_ATTRIBUTES};

    #[test]
    fn test_subsets_order() {
        let actual: Vec<_> = subsets(&attrs!(C A B), MAX_ATTRIBUTES).unwrap().collect();
        let expect = vec![
            attrs!(A),
            attrs!(B),
            attrs!(C),
            attrs!(A B),
            attrs!(A C),
            attrs!(B C),
            attrs!(A B C),
        ];
        assert_eq!(actual, expect);
    }

    #[test]
    fn test_subsets_count() {
        let attrs: AttributeSet = (0..10).map(|i| format!("a{i}")).collect();
        let all: Vec<_> = subsets(&attrs, MAX_ATTRIBUTES).unwrap().collect();
        assert_eq!(all.len(), (1 << 10) - 1);
        assert!(all.windows(2).all(|w| w[0].len() <= w[1].len()));
        assert_eq!(all.iter().unique().count(), all.len());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(subsets(&attrs!(), MAX_ATTRIBUTES).unwrap().count(), 0);
        assert_eq!(proper_subsets(&attrs!(A), MAX_ATTRIBUTES).unwrap().count(), 0);
    }

    #[test]
    fn test_proper_subsets() {
        let actual: Vec<_> = proper_subsets(&attrs!(A B C), MAX_ATTRIBUTES)
            .unwrap()
            .collect();
        assert_eq!(actual.len(), 6);
        assert!(!actual.contains(&attrs!(A B C)));
    }

    #[test]
    fn test_too_many_attributes() {
        let attrs: AttributeSet = (0..21).map(|i| format!("a{i}")).collect();
        let err = subsets(&attrs, MAX_ATTRIBUTES).err().unwrap();
        assert_eq!(
            err,
            NormalizeError::TooManyAttributes {
                count: 21,
                limit: MAX_ATTRIBUTES
            }
        );
        assert!(index_subsets(3, 2).is_err());
        assert!(index_subsets(3, 3).is_ok());
    }
}

use crate::{error::Result, Attribute, AttributeSet, FunctionalDependency, NormalizeError};
use serde::{Deserialize, Serialize};
use std::iter;

/// `attribute⁺`: everything a single attribute determines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeClosure {
    pub attribute: Attribute,
    pub closure: AttributeSet,
}

/// Compute the closure of `attrs` under `deps`.
///
/// Repeats full passes over `deps` until a pass adds nothing. Every growing pass adds
/// at least one dependent attribute, so the pass count is bounded by the total size of
/// all dependent sides plus one; exceeding that is reported as an internal error.
/// Degenerate dependencies apply as written: an empty determinant always fires and an
/// empty dependent adds nothing.
pub fn closure(attrs: &AttributeSet, deps: &[FunctionalDependency]) -> Result<AttributeSet> {
    let max_passes = deps.iter().map(|fd| fd.dependent.len()).sum::<usize>() + 1;
    let mut result = attrs.clone();

    for _ in 0..max_passes {
        let before = result.len();
        for fd in deps {
            if fd.determinant.is_subset(&result) {
                result.extend(fd.dependent.iter().cloned());
            }
        }
        if result.len() == before {
            return Ok(result);
        }
    }

    Err(NormalizeError::invariant(format!(
        "closure of {attrs} did not reach a fixed point within {max_passes} passes"
    )))
}

/// Whether the closure of `attrs` covers `universe`.
pub fn is_superkey(
    attrs: &AttributeSet,
    deps: &[FunctionalDependency],
    universe: &AttributeSet,
) -> Result<bool> {
    Ok(closure(attrs, deps)?.is_superset(universe))
}

/// The closure of every attribute mentioned by `deps`, sorted by attribute.
pub fn attribute_closures(deps: &[FunctionalDependency]) -> Result<Vec<AttributeClosure>> {
    let mentioned = deps
        .iter()
        .fold(AttributeSet::new(), |acc, fd| acc.union_with(&fd.attributes()));
    mentioned
        .iter()
        .map(|attribute| {
            let single: AttributeSet = iter::once(attribute.clone()).collect();
            Ok(AttributeClosure {
                attribute: attribute.clone(),
                closure: closure(&single, deps)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attrs, fds, tests::arb_relation};
    use proptest::prelude::*;

    #[test]
    fn test_closure() {
        let deps = fds!(A => B; B => C);
        assert_eq!(closure(&attrs!(A), &deps).unwrap(), attrs!(A B C));
        assert_eq!(closure(&attrs!(B), &deps).unwrap(), attrs!(B C));
        assert_eq!(closure(&attrs!(C), &deps).unwrap(), attrs!(C));
        assert_eq!(closure(&attrs!(), &deps).unwrap(), attrs!());
    }

    #[test]
    fn test_closure_needs_whole_determinant() {
        let deps = fds!(A B => C; C => D);
        assert_eq!(closure(&attrs!(A), &deps).unwrap(), attrs!(A));
        assert_eq!(closure(&attrs!(A B), &deps).unwrap(), attrs!(A B C D));
    }

    #[test]
    fn test_closure_order_independent() {
        // C => D is listed before the dependency that produces C.
        let deps = fds!(C => D; B => C; A => B);
        assert_eq!(closure(&attrs!(A), &deps).unwrap(), attrs!(A B C D));
    }

    #[test]
    fn test_degenerate_dependencies() {
        let deps = fds!(=> A; B =>);
        assert_eq!(closure(&attrs!(), &deps).unwrap(), attrs!(A));
        assert_eq!(closure(&attrs!(B), &deps).unwrap(), attrs!(A B));
    }

    #[test]
    fn test_is_superkey() {
        let deps = fds!(A => B; B => C);
        let universe = attrs!(A B C);
        assert!(is_superkey(&attrs!(A), &deps, &universe).unwrap());
        assert!(is_superkey(&attrs!(A C), &deps, &universe).unwrap());
        assert!(!is_superkey(&attrs!(B), &deps, &universe).unwrap());
    }

    #[test]
    fn test_attribute_closures() {
        let closures = attribute_closures(&fds!(B => C; A => B)).unwrap();
        let pairs: Vec<_> = closures
            .iter()
            .map(|c| (c.attribute.as_str(), c.closure.clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![("A", attrs!(A B C)), ("B", attrs!(B C)), ("C", attrs!(C))]
        );
        assert!(attribute_closures(&[]).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn test_closure_properties((universe, deps) in arb_relation(), mask in any::<u8>()) {
            let subset: AttributeSet = universe
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, a)| a.clone())
                .collect();

            let small = closure(&subset, &deps).unwrap();
            let large = closure(&universe, &deps).unwrap();
            // extensive, monotone and idempotent
            prop_assert!(subset.is_subset(&small));
            prop_assert!(small.is_subset(&large));
            prop_assert_eq!(closure(&small, &deps).unwrap(), small.clone());
            // every dependency holds on the closure
            for fd in &deps {
                if fd.determinant.is_subset(&small) {
                    prop_assert!(fd.dependent.is_subset(&small));
                }
            }
        }
    }
}

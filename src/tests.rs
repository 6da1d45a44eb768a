use super::*;
use crate::fds;
use once_cell::sync::Lazy;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// The four reference relations: a transitive chain, overlapping keys, no
/// dependencies, and an empty universe.
pub(crate) static FIXTURE_INPUTS: Lazy<Vec<SchemaInput>> = Lazy::new(|| {
    let columns = |names: &[&str]| -> Vec<Column> {
        names.iter().map(|n| Column::untyped(*n)).collect()
    };
    let deps = |fds: Vec<FunctionalDependency>| -> Vec<DependencyInput> {
        fds.iter().map(DependencyInput::from).collect()
    };
    vec![
        SchemaInput::new("chain", columns(&["A", "B", "C"]), deps(fds!(A => B; B => C))),
        SchemaInput::new(
            "overlap",
            columns(&["A", "B", "C"]),
            deps(fds!(A B => C; C => B)),
        ),
        SchemaInput::new("free", columns(&["X", "Y"]), vec![]),
        SchemaInput::new("empty", vec![], vec![]),
    ]
});

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    derive_more::Display,
    proptest_derive::Arbitrary,
)]
pub(crate) enum Element {
    A,
    B,
    C,
    D,
    E,
    F,
}

fn to_attribute_set(elements: BTreeSet<Element>) -> AttributeSet {
    elements
        .into_iter()
        .map(|e| Attribute::from(e.to_string()))
        .collect()
}

/// Small random relations: up to six attributes and five non-degenerate dependencies,
/// every dependency inside the universe.
pub(crate) fn arb_relation() -> impl Strategy<Value = (AttributeSet, Vec<FunctionalDependency>)> {
    let side = || prop::collection::btree_set(any::<Element>(), 1..=2);
    (
        prop::collection::btree_set(any::<Element>(), 1..=3),
        prop::collection::vec((side(), side()), 0..6),
    )
        .prop_map(|(extra, pairs)| {
            let deps: Vec<FunctionalDependency> = pairs
                .into_iter()
                .map(|(l, r)| FunctionalDependency::new(to_attribute_set(l), to_attribute_set(r)))
                .collect();
            let universe = deps
                .iter()
                .fold(to_attribute_set(extra), |acc, fd| acc.union_with(&fd.attributes()));
            (universe, deps)
        })
}

use crate::{
    closure::{closure, is_superkey},
    error::Result,
    keys::prime_attributes,
    subsets::proper_subsets,
    Attribute, AttributeSet, Column, FunctionalDependency,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum NormalForm {
    #[display(fmt = "1NF")]
    First,
    #[display(fmt = "2NF")]
    Second,
    #[display(fmt = "3NF")]
    Third,
    #[display(fmt = "BCNF")]
    BoyceCodd,
}

/// Membership in each normal form. A form is only reported when every earlier one holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalFormReport {
    #[serde(rename = "is1NF")]
    pub is_1nf: bool,
    #[serde(rename = "is2NF")]
    pub is_2nf: bool,
    #[serde(rename = "is3NF")]
    pub is_3nf: bool,
    #[serde(rename = "isBCNF")]
    pub is_bcnf: bool,
}

impl NormalFormReport {
    /// Chain independently evaluated checks so that each form implies the previous one.
    pub fn from_checks(first: bool, second: bool, third: bool, boyce_codd: bool) -> Self {
        let is_1nf = first;
        let is_2nf = is_1nf && second;
        let is_3nf = is_2nf && third;
        let is_bcnf = is_3nf && boyce_codd;
        Self {
            is_1nf,
            is_2nf,
            is_3nf,
            is_bcnf,
        }
    }

    pub fn highest(&self) -> Option<NormalForm> {
        if self.is_bcnf {
            Some(NormalForm::BoyceCodd)
        } else if self.is_3nf {
            Some(NormalForm::Third)
        } else if self.is_2nf {
            Some(NormalForm::Second)
        } else if self.is_1nf {
            Some(NormalForm::First)
        } else {
            None
        }
    }
}

/// Why a relation misses a normal form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Violation {
    /// The column's declared type is a repeating group or nested structure.
    #[serde(rename_all = "camelCase")]
    NonAtomic {
        attribute: Attribute,
        data_type: String,
    },
    /// A proper subset of a composite key determines non-prime attributes.
    PartialDependency {
        key: AttributeSet,
        subset: AttributeSet,
        dependents: AttributeSet,
    },
    /// A non-prime attribute depends on a determinant that is neither a superkey nor
    /// part of a key.
    TransitiveDependency { dependency: FunctionalDependency },
    BoyceCodd { dependency: FunctionalDependency },
}

impl Violation {
    pub fn normal_form(&self) -> NormalForm {
        match self {
            Violation::NonAtomic { .. } => NormalForm::First,
            Violation::PartialDependency { .. } => NormalForm::Second,
            Violation::TransitiveDependency { .. } => NormalForm::Third,
            Violation::BoyceCodd { .. } => NormalForm::BoyceCodd,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.normal_form())?;
        match self {
            Violation::NonAtomic {
                attribute,
                data_type,
            } => write!(f, "{attribute} has non-atomic type {data_type}"),
            Violation::PartialDependency {
                key,
                subset,
                dependents,
            } => write!(f, "{dependents} depend on {subset}, part of key {key}"),
            Violation::TransitiveDependency { dependency } => {
                write!(f, "{dependency} is a transitive dependency")
            }
            Violation::BoyceCodd { dependency } => {
                write!(f, "determinant of {dependency} is not a superkey")
            }
        }
    }
}

/// Outcome of classifying one relation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification {
    pub report: NormalFormReport,
    pub violations: Vec<Violation>,
}

/// Columns whose type tag is not atomic.
pub fn non_atomic_columns(columns: &[Column]) -> Vec<Violation> {
    columns
        .iter()
        .filter(|col| !col.is_atomic())
        .map(|col| Violation::NonAtomic {
            attribute: col.name.clone(),
            data_type: col.data_type.clone().unwrap_or_default(),
        })
        .collect()
}

/// Non-prime attributes determined by a proper subset of a composite candidate key.
pub fn partial_dependencies(
    universe: &AttributeSet,
    deps: &[FunctionalDependency],
    keys: &[AttributeSet],
    limit: usize,
) -> Result<Vec<Violation>> {
    let non_prime = universe.difference_with(&prime_attributes(keys));
    let mut ans = vec![];
    if non_prime.is_empty() {
        return Ok(ans);
    }

    for key in keys.iter().filter(|key| key.len() > 1) {
        for subset in proper_subsets(key, limit)? {
            let dependents = closure(&subset, deps)?.intersection_with(&non_prime);
            if !dependents.is_empty() {
                ans.push(Violation::PartialDependency {
                    key: key.clone(),
                    subset,
                    dependents,
                });
            }
        }
    }
    Ok(ans)
}

/// Non-trivial dependencies with a non-prime dependent whose determinant is neither a
/// superkey nor contained in a candidate key.
pub fn transitive_dependencies(
    universe: &AttributeSet,
    deps: &[FunctionalDependency],
    keys: &[AttributeSet],
) -> Result<Vec<Violation>> {
    let prime = prime_attributes(keys);
    let mut ans = vec![];
    for fd in deps {
        if fd.determinant.is_empty() || fd.is_trivial() || fd.dependent.is_subset(&prime) {
            continue;
        }
        if is_superkey(&fd.determinant, deps, universe)? {
            continue;
        }
        if keys.iter().any(|key| fd.determinant.is_subset(key)) {
            continue;
        }
        ans.push(Violation::TransitiveDependency {
            dependency: fd.clone(),
        });
    }
    Ok(ans)
}

/// A non-trivial dependency whose determinant is not a superkey and contains no
/// candidate key.
pub fn violates_bcnf(
    fd: &FunctionalDependency,
    universe: &AttributeSet,
    deps: &[FunctionalDependency],
    keys: &[AttributeSet],
) -> Result<bool> {
    if fd.is_trivial() {
        return Ok(false);
    }
    if is_superkey(&fd.determinant, deps, universe)? {
        return Ok(false);
    }
    Ok(!keys.iter().any(|key| key.is_subset(&fd.determinant)))
}

/// The first dependency, in list order, that violates BCNF.
pub fn find_bcnf_violation<'a>(
    universe: &AttributeSet,
    deps: &'a [FunctionalDependency],
    keys: &[AttributeSet],
) -> Result<Option<&'a FunctionalDependency>> {
    for fd in deps {
        if violates_bcnf(fd, universe, deps, keys)? {
            return Ok(Some(fd));
        }
    }
    Ok(None)
}

pub fn bcnf_violations(
    universe: &AttributeSet,
    deps: &[FunctionalDependency],
    keys: &[AttributeSet],
) -> Result<Vec<Violation>> {
    let mut ans = vec![];
    for fd in deps {
        if violates_bcnf(fd, universe, deps, keys)? {
            ans.push(Violation::BoyceCodd {
                dependency: fd.clone(),
            });
        }
    }
    Ok(ans)
}

/// Classify a relation into 1NF/2NF/3NF/BCNF.
///
/// Every check is evaluated and its violations recorded even when an earlier form
/// already fails; the flags are chained afterwards. Without candidate keys (e.g. an
/// empty universe) 2NF, 3NF and BCNF are false, and an empty universe is not in 1NF.
pub fn classify(
    columns: &[Column],
    universe: &AttributeSet,
    deps: &[FunctionalDependency],
    keys: &[AttributeSet],
    limit: usize,
) -> Result<Classification> {
    let non_atomic = non_atomic_columns(columns);
    let partial = partial_dependencies(universe, deps, keys, limit)?;
    let transitive = transitive_dependencies(universe, deps, keys)?;
    let boyce_codd = bcnf_violations(universe, deps, keys)?;

    let has_keys = !keys.is_empty();
    let report = NormalFormReport::from_checks(
        !universe.is_empty() && non_atomic.is_empty(),
        has_keys && partial.is_empty(),
        has_keys && transitive.is_empty(),
        has_keys && boyce_codd.is_empty(),
    );
    debug!("classified {}: {:?}", universe, report);

    let violations = non_atomic
        .into_iter()
        .chain(partial)
        .chain(transitive)
        .chain(boyce_codd)
        .collect();
    Ok(Classification { report, violations })
}

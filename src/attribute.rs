use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

/// A case-sensitive column identifier.
#[derive(
    Debug,
    Default,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::Deref,
    derive_more::AsRef,
    derive_more::From,
    derive_more::Into,
)]
#[serde(transparent)]
#[as_ref(forward)]
pub struct Attribute(pub String);

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// A set of attributes.
///
/// Backed by a `BTreeSet`, so iteration and serialization are always in
/// lexicographic order.
#[derive(
    Debug,
    Default,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Deref,
    derive_more::DerefMut,
    derive_more::AsRef,
    derive_more::AsMut,
    derive_more::From,
    derive_more::IntoIterator,
)]
#[serde(transparent)]
#[from(forward)]
#[as_ref(forward)]
#[as_mut(forward)]
pub struct AttributeSet(pub BTreeSet<Attribute>);

impl AttributeSet {
    pub fn new() -> Self {
        Default::default()
    }

    /// Return `self ∪ other`.
    pub fn union_with(&self, other: &AttributeSet) -> AttributeSet {
        self.union(other).cloned().collect()
    }

    /// Return `self \ other`.
    pub fn difference_with(&self, other: &AttributeSet) -> AttributeSet {
        self.difference(other).cloned().collect()
    }

    /// Return `self ∩ other`.
    pub fn intersection_with(&self, other: &AttributeSet) -> AttributeSet {
        self.intersection(other).cloned().collect()
    }

    /// The sorted, comma-joined attribute list used as a string key.
    pub fn signature(&self) -> String {
        self.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(",")
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|a| a.0.clone()).collect()
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(Attribute::from).collect())
    }
}

impl FromIterator<String> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().map(Attribute).collect())
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::collections::btree_set::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, a) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{a}")?;
        }
        write!(f, "}}")
    }
}

#[macro_export]
macro_rules! attrs {
    () => {
        $crate::AttributeSet::new()
    };
    ($($x: ident)+) => {{
        let mut set = $crate::AttributeSet::new();
        $(
            set.insert($crate::Attribute::from(stringify!($x)));
        )+
        set
    }};
}

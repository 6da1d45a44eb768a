use crate::{error::Result, Attribute, AttributeSet, NormalizeError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

static ARROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"->|→").unwrap());
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").unwrap());

/// A functional dependency `determinant → dependent`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionalDependency {
    #[serde(rename = "left")]
    pub determinant: AttributeSet,
    #[serde(rename = "right")]
    pub dependent: AttributeSet,
}

impl FunctionalDependency {
    pub fn new(determinant: impl Into<AttributeSet>, dependent: impl Into<AttributeSet>) -> Self {
        Self {
            determinant: determinant.into(),
            dependent: dependent.into(),
        }
    }

    /// The dependent side is already contained in the determinant.
    pub fn is_trivial(&self) -> bool {
        self.dependent.is_subset(&self.determinant)
    }

    /// Either side is empty.
    pub fn is_degenerate(&self) -> bool {
        self.determinant.is_empty() || self.dependent.is_empty()
    }

    /// All attributes mentioned on either side.
    pub fn attributes(&self) -> AttributeSet {
        self.determinant.union_with(&self.dependent)
    }

    /// Both sides lie inside `attrs`.
    pub fn is_within(&self, attrs: &AttributeSet) -> bool {
        self.determinant.is_subset(attrs) && self.dependent.is_subset(attrs)
    }

    /// Check the dependency against the governing attribute universe.
    pub fn validate(&self, universe: &AttributeSet) -> Result<()> {
        if self.determinant.is_empty() {
            return Err(NormalizeError::invalid_dependency(self, "empty determinant"));
        }
        if self.dependent.is_empty() {
            return Err(NormalizeError::invalid_dependency(self, "empty dependent"));
        }
        let unknown = self.attributes().difference_with(universe);
        if !unknown.is_empty() {
            return Err(NormalizeError::invalid_dependency(
                self,
                format!("unknown attributes {unknown}"),
            ));
        }
        Ok(())
    }
}

/// Restrict `deps` to those lying entirely inside `attrs`, dropping degenerate ones.
pub fn project_dependencies(
    deps: &[FunctionalDependency],
    attrs: &AttributeSet,
) -> Vec<FunctionalDependency> {
    deps.iter()
        .filter(|fd| fd.is_within(attrs) && !fd.is_degenerate())
        .cloned()
        .collect()
}

fn parse_side(s: &str) -> AttributeSet {
    SEPARATOR
        .split(s.trim())
        .filter(|name| !name.is_empty())
        .map(Attribute::from)
        .collect()
}

impl FromStr for FunctionalDependency {
    type Err = NormalizeError;

    /// Parse `"A, B -> C"` (or with `→`). Sides may come out empty; callers validate.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sides = ARROW.splitn(s, 2);
        let (left, right) = match (sides.next(), sides.next()) {
            (Some(left), Some(right)) => (left, right),
            _ => return Err(NormalizeError::invalid_dependency(s, "missing `->`")),
        };
        if ARROW.is_match(right) {
            return Err(NormalizeError::invalid_dependency(s, "more than one `->`"));
        }
        Ok(Self::new(parse_side(left), parse_side(right)))
    }
}

impl fmt::Display for FunctionalDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |set: &AttributeSet| {
            set.iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "{} -> {}", side(&self.determinant), side(&self.dependent))
    }
}

/// Build a dependency list, e.g. `fds!(A B => C; C => B)`.
#[macro_export]
macro_rules! fds {
    () => {
        Vec::<$crate::FunctionalDependency>::new()
    };
    ($($($l: ident)* => $($r: ident)*);+ $(;)?) => {
        vec![$(
            $crate::FunctionalDependency::new($crate::attrs!($($l)*), $crate::attrs!($($r)*))
        ),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    #[test]
    fn test_parse() {
        let fd: FunctionalDependency = "A, B -> C".parse().unwrap();
        assert_eq!(fd, FunctionalDependency::new(attrs!(A B), attrs!(C)));

        let fd: FunctionalDependency = "StudentId→Name ,Major".parse().unwrap();
        assert_eq!(
            fd,
            FunctionalDependency::new(
                AttributeSet::from_iter(["StudentId"]),
                AttributeSet::from_iter(["Name", "Major"])
            )
        );

        let fd: FunctionalDependency = " -> C".parse().unwrap();
        assert!(fd.is_degenerate());

        assert!("A B C".parse::<FunctionalDependency>().is_err());
        assert!("A -> B -> C".parse::<FunctionalDependency>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let fd = FunctionalDependency::new(attrs!(B A), attrs!(C));
        assert_eq!(fd.to_string(), "A, B -> C");
        assert_eq!(fd.to_string().parse::<FunctionalDependency>().unwrap(), fd);
    }

    #[test]
    fn test_validate() {
        let universe = attrs!(A B C);
        assert!(FunctionalDependency::new(attrs!(A), attrs!(B))
            .validate(&universe)
            .is_ok());

        let err = FunctionalDependency::new(attrs!(A), attrs!(D))
            .validate(&universe)
            .unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidDependency { .. }));
        assert!(err.to_string().contains("{D}"));

        assert!(FunctionalDependency::new(attrs!(), attrs!(B))
            .validate(&universe)
            .is_err());
        assert!(FunctionalDependency::new(attrs!(A), attrs!())
            .validate(&universe)
            .is_err());
    }

    #[test]
    fn test_trivial() {
        assert!(FunctionalDependency::new(attrs!(A B), attrs!(A)).is_trivial());
        assert!(!FunctionalDependency::new(attrs!(A B), attrs!(A C)).is_trivial());
    }

    #[test]
    fn test_project_dependencies() {
        let deps = fds!(A => B; B => C; A B => C; => A);
        assert_eq!(project_dependencies(&deps, &attrs!(A B)), fds!(A => B));
        assert_eq!(
            project_dependencies(&deps, &attrs!(A B C)),
            fds!(A => B; B => C; A B => C)
        );
    }

    #[test]
    fn test_serde_shape() {
        let fd = FunctionalDependency::new(attrs!(A), attrs!(B C));
        assert_eq!(
            serde_json::to_string(&fd).unwrap(),
            r#"{"left":["A"],"right":["B","C"]}"#
        );
    }
}

use crate::{
    closure::closure,
    dependency::project_dependencies,
    error::Result,
    keys::candidate_keys,
    normal_form::find_bcnf_violation,
    AttributeSet, FunctionalDependency, NormalizeError, Schema,
};
use ptree::{Style, TreeItem};
use std::{
    borrow::Cow,
    collections::{HashMap, HashSet, VecDeque},
    io,
};

/// What happened to one table popped from the worklist.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Final,
    Split {
        on: FunctionalDependency,
        children: [String; 2],
    },
    /// Another table with the same attributes was already processed.
    Duplicate,
}

/// The result of BCNF decomposition: the final tables plus how they were derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    pub tables: Vec<Schema>,
    root: Option<String>,
    trace: HashMap<String, (AttributeSet, Outcome)>,
}

impl Decomposition {
    /// Number of splits performed.
    pub fn split_count(&self) -> usize {
        self.trace
            .values()
            .filter(|(_, o)| matches!(o, Outcome::Split { .. }))
            .count()
    }

    /// The derivation tree, rooted at the input table. `None` for an empty schema.
    pub fn tree(&self) -> Option<DecompositionTree> {
        let root = self.root.as_ref()?;
        Some(self.subtree(root))
    }

    fn subtree(&self, name: &str) -> DecompositionTree {
        let (attributes, outcome) = match self.trace.get(name) {
            Some((attributes, outcome)) => (attributes.clone(), outcome),
            None => (AttributeSet::new(), &Outcome::Duplicate),
        };
        match outcome {
            Outcome::Final => DecompositionTree::Table {
                name: name.to_string(),
                attributes,
            },
            Outcome::Duplicate => DecompositionTree::Duplicate {
                name: name.to_string(),
                attributes,
            },
            Outcome::Split { on, children } => DecompositionTree::Split {
                name: name.to_string(),
                attributes,
                on: on.clone(),
                children: children.iter().map(|c| self.subtree(c)).collect(),
            },
        }
    }
}

/// A printable view of how a table was split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecompositionTree {
    Table {
        name: String,
        attributes: AttributeSet,
    },
    Split {
        name: String,
        attributes: AttributeSet,
        on: FunctionalDependency,
        children: Vec<DecompositionTree>,
    },
    Duplicate {
        name: String,
        attributes: AttributeSet,
    },
}

impl TreeItem for DecompositionTree {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, style: &Style) -> io::Result<()> {
        match self {
            Self::Table { name, attributes } => {
                write!(f, "{} {}", style.paint(name), attributes)
            }
            Self::Split {
                name,
                attributes,
                on,
                ..
            } => write!(f, "{} {} split on {}", style.paint(name), attributes, on),
            Self::Duplicate { name, attributes } => {
                write!(f, "{} {} (duplicate)", style.paint(name), attributes)
            }
        }
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        match self {
            Self::Split { children, .. } => Cow::from(children),
            _ => Cow::from(vec![]),
        }
    }
}

/// Decompose `schema` into BCNF tables.
///
/// Worklist algorithm: pop a table, skip it if a table with the same attributes was
/// already processed, give it its first candidate key as primary key if it has none,
/// and either accept it or split it on the first BCNF-violating local dependency
/// `X -> Y` into `closure(X)` and `X ∪ (attributes \ closure(X))`. Child tables keep
/// the parent dependencies lying entirely inside them.
///
/// The result covers every input attribute but is not guaranteed to have the fewest
/// possible tables. Child names are `{name}_{n}` in creation order.
pub fn decompose(schema: &Schema, limit: usize) -> Result<Decomposition> {
    let mut ans = Decomposition::default();
    if schema.attributes.is_empty() {
        return Ok(ans);
    }
    ans.root = Some(schema.name.clone());

    // Each distinct attribute set is processed once and pushes at most two children.
    let max_pops = 1usize
        .checked_shl(schema.attributes.len() as u32 + 1)
        .unwrap_or(usize::MAX);
    let mut pops = 0usize;
    let mut counter = 1usize;
    let mut visited: HashSet<String> = HashSet::new();
    let mut worklist: VecDeque<Schema> = VecDeque::from([schema.clone()]);

    while let Some(mut table) = worklist.pop_front() {
        pops += 1;
        if pops > max_pops {
            return Err(NormalizeError::invariant(format!(
                "decomposition of {} exceeded {} worklist steps",
                schema.name, max_pops
            )));
        }

        if !visited.insert(table.signature()) {
            debug!("{} {} already processed", table.name, table.attributes);
            ans.trace
                .insert(table.name.clone(), (table.attributes, Outcome::Duplicate));
            continue;
        }

        let keys = candidate_keys(&table.attributes, &table.dependencies, limit)?;
        if table.primary_key.is_empty() {
            if let Some(key) = keys.first() {
                table.primary_key = key.clone();
            }
        }

        let violation =
            find_bcnf_violation(&table.attributes, &table.dependencies, &keys)?.cloned();
        let fd = match violation {
            Some(fd) => fd,
            None => {
                ans.trace
                    .insert(table.name.clone(), (table.attributes.clone(), Outcome::Final));
                ans.tables.push(table);
                continue;
            }
        };

        let determined = closure(&fd.determinant, &table.dependencies)?;
        let left_attrs = fd.determinant.union_with(&determined);
        let right_attrs = fd
            .determinant
            .union_with(&table.attributes.difference_with(&determined));
        debug!(
            "split {} {} on {} into {} and {}",
            table.name, table.attributes, fd, left_attrs, right_attrs
        );

        let left = Schema::new(
            format!("{}_{}", schema.name, counter),
            left_attrs.clone(),
            project_dependencies(&table.dependencies, &left_attrs),
        )
        .with_primary_key(fd.determinant.clone());
        let right = Schema::new(
            format!("{}_{}", schema.name, counter + 1),
            right_attrs.clone(),
            project_dependencies(&table.dependencies, &right_attrs),
        );
        counter += 2;

        ans.trace.insert(
            table.name.clone(),
            (
                table.attributes,
                Outcome::Split {
                    on: fd,
                    children: [left.name.clone(), right.name.clone()],
                },
            ),
        );
        for child in [left, right] {
            if !child.attributes.is_empty() {
                worklist.push_back(child);
            }
        }
    }

    info!(
        "decomposed {} into {} tables",
        schema.name,
        ans.tables.len()
    );
    Ok(ans)
}

use crate::{
    config::Config, error::Result, Attribute, AttributeSet, FunctionalDependency, NormalizeError,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "relation";

/// Type-tag fragments that mark a column as a repeating group or nested value.
const NON_ATOMIC_MARKERS: [&str; 5] = ["[]", "array", "composite", "json", "object"];

/// A named column with an optional declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColumnRepr")]
pub struct Column {
    pub name: Attribute,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// Columns may be given as a bare name or as `{ "name": .., "type": .. }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ColumnRepr {
    Name(String),
    Typed {
        name: String,
        #[serde(rename = "type", default)]
        data_type: Option<String>,
    },
}

impl From<ColumnRepr> for Column {
    fn from(repr: ColumnRepr) -> Self {
        match repr {
            ColumnRepr::Name(name) => Column::untyped(name.trim()),
            ColumnRepr::Typed { name, data_type } => Column {
                name: name.trim().into(),
                data_type: data_type.filter(|t| !t.trim().is_empty()),
            },
        }
    }
}

impl Column {
    pub fn new(name: impl Into<Attribute>, data_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.map(str::to_string),
        }
    }

    pub fn untyped(name: impl Into<Attribute>) -> Self {
        Self::new(name, None)
    }

    /// Untyped columns count as atomic.
    pub fn is_atomic(&self) -> bool {
        match &self.data_type {
            Some(t) => {
                let t = t.to_lowercase();
                !NON_ATOMIC_MARKERS.iter().any(|m| t.contains(m))
            }
            None => true,
        }
    }
}

/// A table: attributes, primary key, and the dependencies local to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub name: String,
    pub attributes: AttributeSet,
    pub primary_key: AttributeSet,
    pub dependencies: Vec<FunctionalDependency>,
}

impl Schema {
    pub fn new(
        name: impl Into<String>,
        attributes: AttributeSet,
        dependencies: Vec<FunctionalDependency>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            primary_key: AttributeSet::new(),
            dependencies,
        }
    }

    pub fn with_primary_key(mut self, primary_key: AttributeSet) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn signature(&self) -> String {
        self.attributes.signature()
    }
}

/// A dependency as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyInput {
    Pair { left: Vec<String>, right: Vec<String> },
    Text(String),
}

impl DependencyInput {
    pub fn parse(&self) -> Result<FunctionalDependency> {
        match self {
            DependencyInput::Pair { left, right } => {
                let side = |names: &[String]| -> AttributeSet {
                    names
                        .iter()
                        .map(|n| n.trim())
                        .filter(|n| !n.is_empty())
                        .collect()
                };
                Ok(FunctionalDependency::new(side(left), side(right)))
            }
            DependencyInput::Text(text) => text.parse(),
        }
    }
}

impl From<&FunctionalDependency> for DependencyInput {
    fn from(fd: &FunctionalDependency) -> Self {
        DependencyInput::Pair {
            left: fd.determinant.names(),
            right: fd.dependent.names(),
        }
    }
}

/// One normalization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInput {
    #[serde(default = "default_name", alias = "tableName")]
    pub name: String,
    #[serde(alias = "columns")]
    pub attributes: Vec<Column>,
    #[serde(default)]
    pub dependencies: Vec<DependencyInput>,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

/// A request whose attributes and dependencies have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub name: String,
    pub columns: Vec<Column>,
    pub attributes: AttributeSet,
    pub dependencies: Vec<FunctionalDependency>,
}

impl Relation {
    /// The relation as an undecomposed table without a primary key.
    pub fn to_schema(&self) -> Schema {
        Schema::new(
            self.name.clone(),
            self.attributes.clone(),
            self.dependencies.clone(),
        )
    }
}

impl SchemaInput {
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<Column>,
        dependencies: Vec<DependencyInput>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            dependencies,
        }
    }

    /// Check attribute names and dependencies.
    ///
    /// Invalid dependencies are rejected, or dropped with a warning when
    /// `config.skip_invalid_dependencies` is set.
    pub fn validate(&self, config: &Config) -> Result<Relation> {
        let mut attributes = AttributeSet::new();
        for (i, col) in self.attributes.iter().enumerate() {
            if col.name.is_empty() {
                return Err(NormalizeError::invalid_attribute(format!(
                    "empty attribute name at position {i}"
                )));
            }
            if !attributes.insert(col.name.clone()) {
                return Err(NormalizeError::invalid_attribute(format!(
                    "duplicate attribute `{}`",
                    col.name
                )));
            }
        }

        let mut dependencies = Vec::with_capacity(self.dependencies.len());
        for input in &self.dependencies {
            let checked = input
                .parse()
                .and_then(|fd| fd.validate(&attributes).map(|_| fd));
            match checked {
                Ok(fd) => dependencies.push(fd),
                Err(e) if config.skip_invalid_dependencies => {
                    warn!("{}: skipping {}", self.name, e);
                }
                Err(e) => return Err(e),
            }
        }

        let name = match self.name.trim() {
            "" => default_name(),
            name => name.to_string(),
        };

        Ok(Relation {
            name,
            columns: self.attributes.clone(),
            attributes,
            dependencies,
        })
    }
}

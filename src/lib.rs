#[macro_use]
extern crate tracing;

pub mod analysis;
pub mod attribute;
pub mod batch;
pub mod closure;
pub mod config;
pub mod decompose;
pub mod dependency;
pub mod error;
pub mod keys;
pub mod normal_form;
pub mod schema;
pub mod subsets;
pub mod utils;

#[cfg(test)]
pub(crate) mod tests;

pub use analysis::{analyze, analyze_batch, NormalizationReport};
pub use attribute::{Attribute, AttributeSet};
pub use batch::{Batch, BatchEntry};
pub use closure::{attribute_closures, closure, AttributeClosure};
pub use config::Config;
pub use decompose::{decompose, Decomposition, DecompositionTree};
pub use dependency::FunctionalDependency;
pub use error::{NormalizeError, Result};
pub use keys::candidate_keys;
pub use normal_form::{classify, NormalForm, NormalFormReport, Violation};
pub use schema::{Column, DependencyInput, Relation, Schema, SchemaInput};
pub use subsets::subsets;

use crate::{
    closure::{attribute_closures, AttributeClosure},
    config::Config,
    decompose::{decompose, DecompositionTree},
    error::Result,
    keys::candidate_keys,
    normal_form::{classify, NormalFormReport, Violation},
    schema::Relation,
    subsets::check_attribute_limit,
    AttributeSet, Schema, SchemaInput,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Everything computed for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationReport {
    pub name: String,
    pub normal_forms: NormalFormReport,
    pub candidate_keys: Vec<AttributeSet>,
    pub closures: Vec<AttributeClosure>,
    pub decomposition: Vec<Schema>,
    pub violations: Vec<Violation>,
    #[serde(skip)]
    pub tree: Option<DecompositionTree>,
}

/// Validate `input` and analyze it.
pub fn analyze(input: &SchemaInput, config: &Config) -> Result<NormalizationReport> {
    let relation = input.validate(config)?;
    analyze_relation(&relation, config)
}

/// Find candidate keys, classify, and decompose a validated relation.
///
/// A relation already in BCNF comes back as its single table with the first candidate
/// key as primary key.
pub fn analyze_relation(relation: &Relation, config: &Config) -> Result<NormalizationReport> {
    let attributes = &relation.attributes;
    let deps = &relation.dependencies;
    check_attribute_limit(attributes.len(), config.max_attributes)?;
    if attributes.len() > config.warn_attributes {
        warn!(
            "{}: {} attributes, candidate key search may be slow",
            relation.name,
            attributes.len()
        );
    }

    let closures = attribute_closures(deps)?;
    let keys = candidate_keys(attributes, deps, config.max_attributes)?;
    let classification = classify(
        &relation.columns,
        attributes,
        deps,
        &keys,
        config.max_attributes,
    )?;
    let decomposition = decompose(&relation.to_schema(), config.max_attributes)?;

    info!(
        "{}: {} candidate keys, highest form {}, {} tables",
        relation.name,
        keys.len(),
        classification
            .report
            .highest()
            .map_or_else(|| "none".to_string(), |f| f.to_string()),
        decomposition.tables.len()
    );

    Ok(NormalizationReport {
        name: relation.name.clone(),
        normal_forms: classification.report,
        candidate_keys: keys,
        closures,
        tree: decomposition.tree(),
        decomposition: decomposition.tables,
        violations: classification.violations,
    })
}

/// Analyze independent requests in parallel. Results keep the input order.
pub fn analyze_batch(inputs: &[SchemaInput], config: &Config) -> Vec<Result<NormalizationReport>> {
    inputs
        .par_iter()
        .map(|input| analyze(input, config))
        .collect()
}

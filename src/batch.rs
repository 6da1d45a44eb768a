use crate::{
    analysis::{analyze_batch, NormalizationReport},
    config::Config,
    SchemaInput,
};
use anyhow::{Context, Result};
use glob::glob;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, time::Instant};

/// A request file holds one request or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<SchemaInput>),
    One(SchemaInput),
}

/// Requests loaded from disk, each tagged with where it came from.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub requests: Vec<(String, SchemaInput)>,
}

/// Result of one request in a batch. Exactly one of `report` and `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<NormalizationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Batch {
    /// Load a request file, or every `*.json` file of a directory in path order.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let begin = Instant::now();
        let path = path.as_ref();
        info!("load requests from {}...", path.display());

        let mut requests = vec![];
        if path.is_dir() {
            let mut files = vec![];
            for entry in glob(&path.join("*.json").to_string_lossy())? {
                files.push(entry?);
            }
            files.sort();
            for f in files {
                requests.extend(Self::load_file(&f)?);
            }
        } else {
            requests.extend(Self::load_file(path)?);
        }

        info!("{} requests loaded in {:?}", requests.len(), begin.elapsed());
        Ok(Self { requests })
    }

    fn load_file(path: &Path) -> Result<Vec<(String, SchemaInput)>> {
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        );
        let parsed: OneOrMany = serde_json::from_reader(reader)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        let source = path.display().to_string();
        Ok(match parsed {
            OneOrMany::One(input) => vec![(source, input)],
            OneOrMany::Many(inputs) => inputs
                .into_iter()
                .enumerate()
                .map(|(i, input)| (format!("{source}[{i}]"), input))
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Analyze every request. A failing request does not stop the others.
    pub fn run(&self, config: &Config) -> Vec<BatchEntry> {
        let inputs: Vec<SchemaInput> = self.requests.iter().map(|(_, i)| i.clone()).collect();
        analyze_batch(&inputs, config)
            .into_iter()
            .zip(&self.requests)
            .map(|(result, (source, _))| match result {
                Ok(report) => BatchEntry {
                    source: source.clone(),
                    report: Some(report),
                    error: None,
                },
                Err(e) => {
                    warn!("{}: {}", source, e);
                    BatchEntry {
                        source: source.clone(),
                        report: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attrs, utils::test_data_dir, AttributeSet};

    #[test]
    fn test_load_dir() {
        let batch = Batch::load(test_data_dir()).unwrap();
        assert_eq!(batch.len(), 6);
        // files come in path order: enrollment.json, then scenarios.json
        assert!(batch.requests[0].0.ends_with("enrollment.json"));
        assert!(batch.requests[1].0.ends_with("scenarios.json[0]"));
    }

    #[test]
    fn test_run() {
        let batch = Batch::load(test_data_dir().join("scenarios.json")).unwrap();
        let entries = batch.run(&Config::default());
        assert_eq!(entries.len(), 5);

        let chain = entries[0].report.as_ref().unwrap();
        assert_eq!(chain.candidate_keys, vec![attrs!(A)]);
        assert_eq!(chain.decomposition.len(), 2);

        let bad = &entries[4];
        assert!(bad.report.is_none());
        assert!(bad.error.as_ref().unwrap().contains("invalid dependency"));
    }

    #[test]
    fn test_enrollment() {
        let batch = Batch::load(test_data_dir().join("enrollment.json")).unwrap();
        let entries = batch.run(&Config::default());
        let report = entries[0].report.as_ref().unwrap();
        // Phones is declared as an array type
        assert!(!report.normal_forms.is_1nf);
        assert_eq!(
            report.candidate_keys,
            vec![AttributeSet::from_iter(["CourseId", "StudentId"])]
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(Batch::load(test_data_dir().join("missing.json")).is_err());
    }
}

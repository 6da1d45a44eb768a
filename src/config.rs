use serde::{Deserialize, Serialize};

/// Largest universe the subset enumerator accepts by default.
pub const MAX_ATTRIBUTES: usize = 20;

/// Universe size above which a slow-search warning is logged.
pub const WARN_ATTRIBUTES: usize = 12;

/// Engine limits and input-handling policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Refuse subset enumeration above this many attributes.
    pub max_attributes: usize,
    pub warn_attributes: usize,
    /// Drop invalid dependencies with a warning instead of rejecting the request.
    pub skip_invalid_dependencies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_attributes: MAX_ATTRIBUTES,
            warn_attributes: WARN_ATTRIBUTES,
            skip_invalid_dependencies: false,
        }
    }
}

impl Config {
    pub fn with_max_attributes(mut self, max_attributes: usize) -> Self {
        self.max_attributes = max_attributes;
        self
    }

    pub fn with_skip_invalid_dependencies(mut self, skip: bool) -> Self {
        self.skip_invalid_dependencies = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_deserialize() {
        let config: Config = serde_json::from_str(r#"{"max_attributes": 8}"#).unwrap();
        assert_eq!(config.max_attributes, 8);
        assert_eq!(config.warn_attributes, WARN_ATTRIBUTES);
        assert!(!config.skip_invalid_dependencies);
    }
}

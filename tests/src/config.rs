//! Harness configuration.

use std::collections::HashMap;
use std::time::Duration;

use mutcount_core::messages::{DEFAULT_MUTATION_LIMIT, TOO_MANY_MUTATIONS};
use mutcount_mutation::CostModel;
use mutcount_testgen::GeneratorConfig;
use regex_lite::Regex;

use crate::error::{HarnessError, HarnessResult};

/// How the limit-exceeded rejection is recognized in store error text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSpec {
    /// The error text contains this string.
    Contains(String),
    /// The error text matches this regular expression.
    Pattern(String),
}

impl Default for SignalSpec {
    fn default() -> Self {
        SignalSpec::Contains(TOO_MANY_MUTATIONS.to_string())
    }
}

/// A compiled [`SignalSpec`].
#[derive(Debug, Clone)]
pub enum LimitSignal {
    Contains(String),
    Pattern(Regex),
}

impl LimitSignal {
    pub fn compile(spec: &SignalSpec) -> HarnessResult<Self> {
        match spec {
            SignalSpec::Contains(text) => Ok(LimitSignal::Contains(text.clone())),
            SignalSpec::Pattern(pattern) => Regex::new(pattern)
                .map(LimitSignal::Pattern)
                .map_err(|e| HarnessError::invalid_signal(pattern, e.to_string())),
        }
    }

    pub fn matches(&self, message: &str) -> bool {
        match self {
            LimitSignal::Contains(text) => message.contains(text.as_str()),
            LimitSignal::Pattern(re) => re.is_match(message),
        }
    }
}

/// Harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub limit_signal: SignalSpec,
    /// Longest wait for one submission, in milliseconds. `None` waits forever.
    pub deadline_ms: Option<u64>,
    /// Declared limit for tables without their own entry.
    pub default_limit: u64,
    /// Declared limits per table name.
    pub table_limits: HashMap<String, u64>,
    pub cost_model: CostModel,
    pub generator: GeneratorConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            limit_signal: SignalSpec::default(),
            deadline_ms: Some(30_000),
            default_limit: DEFAULT_MUTATION_LIMIT,
            table_limits: HashMap::new(),
            cost_model: CostModel::Row,
            generator: GeneratorConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json(source: &str) -> HarnessResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Tiny limit and setup chunks, for fast runs.
    pub fn minimal() -> Self {
        Self {
            deadline_ms: Some(5_000),
            default_limit: 10,
            generator: GeneratorConfig::minimal(),
            ..Self::default()
        }
    }

    /// Cell counting at the production limit.
    pub fn legacy_cells() -> Self {
        Self {
            cost_model: CostModel::Cell,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn with_table_limit(mut self, table: impl Into<String>, limit: u64) -> Self {
        self.table_limits.insert(table.into(), limit);
        self
    }

    pub fn with_signal(mut self, spec: SignalSpec) -> Self {
        self.limit_signal = spec;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline_ms = deadline.map(|d| d.as_millis() as u64);
        self
    }

    pub fn with_model(mut self, model: CostModel) -> Self {
        self.cost_model = model;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    pub fn limit_for(&self, table: &str) -> u64 {
        self.table_limits
            .get(table)
            .copied()
            .unwrap_or(self.default_limit)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_from_json() {
        // GIVEN
        let source = r#"{
            "limit_signal": { "pattern": "too many mutations" },
            "default_limit": 100,
            "table_limits": { "MeasureChild": 40 },
            "cost_model": "cell",
            "generator": { "seed": 3 }
        }"#;

        // WHEN
        let config = HarnessConfig::from_json(source).unwrap();

        // THEN
        assert_eq!(config.limit_signal, SignalSpec::Pattern("too many mutations".into()));
        assert_eq!(config.limit_for("MeasureChild"), 40);
        assert_eq!(config.limit_for("Measure"), 100);
        assert_eq!(config.cost_model, CostModel::Cell);
        assert_eq!(config.generator, GeneratorConfig::default().with_seed(3));
        assert_eq!(config.deadline(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_signals() {
        let contains = LimitSignal::compile(&SignalSpec::default()).unwrap();
        let pattern = LimitSignal::compile(&SignalSpec::Pattern(r"too many \w+".into())).unwrap();

        let message = "InvalidArgument: The transaction contains too many mutations.";
        assert!(contains.matches(message));
        assert!(pattern.matches(message));
        assert!(!contains.matches("Unavailable: connection reset"));
    }

    #[test]
    fn test_bad_pattern_is_reported() {
        let err = LimitSignal::compile(&SignalSpec::Pattern("(".into())).unwrap_err();

        assert!(matches!(err, HarnessError::InvalidSignal { .. }));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            HarnessConfig::from_json("{ not json"),
            Err(HarnessError::Config(_))
        ));
    }
}

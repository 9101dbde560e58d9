//! Scenario runner.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use mutcount_registry::Schema;
use mutcount_testgen::{BatchGenerator, BoundaryProbe};
use mutcount_transaction::MutationSink;
use tokio::task::JoinSet;
use tracing::{info, warn};
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::oracle::BoundaryOracle;
use crate::outcome::Verdict;
use crate::scenario::{Probe, Scenario, Variant};

/// One schema, one store handle, one configuration.
pub struct Harness {
    oracle: BoundaryOracle,
    config: HarnessConfig,
}

impl Harness {
    pub fn new(
        schema: Arc<Schema>,
        sink: Arc<dyn MutationSink>,
        config: HarnessConfig,
    ) -> HarnessResult<Self> {
        let oracle = BoundaryOracle::new(schema, sink, &config)?;
        Ok(Self { oracle, config })
    }

    pub fn oracle(&self) -> &BoundaryOracle {
        &self.oracle
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Generate, set up and verify every batch a scenario asks for.
    pub async fn run_scenario(&self, scenario: &Scenario) -> HarnessResult<Vec<Verdict>> {
        let table = scenario
            .table
            .as_deref()
            .ok_or_else(|| HarnessError::incomplete(&scenario.name, "no table"))?;
        let limit = scenario
            .limit
            .unwrap_or_else(|| self.config.limit_for(table));

        // Setup chunks must themselves fit under the limit being probed.
        let base = &self.config.generator;
        let generator_config = base
            .clone()
            .with_seed(seed_for(base.seed, &scenario.name))
            .with_setup_budget(base.setup_budget.min(limit));
        let mut generator = BatchGenerator::new(self.oracle.calculator(), generator_config);

        let unit_cost = match &scenario.parent_shape {
            Some(parent_shape) => {
                generator.pair_cost(table, scenario.kind, parent_shape, &scenario.shape)?
            }
            None => generator.unit_cost(table, scenario.kind, &scenario.shape)?,
        };
        if let Some(expected) = scenario.unit_cost {
            if expected != unit_cost {
                return Err(HarnessError::UnitCost {
                    expected,
                    actual: unit_cost,
                });
            }
        }

        let targets = match scenario.probe {
            Probe::Boundary => {
                let probe = BoundaryProbe::around(limit, unit_cost)?;
                let actual = (probe.units_at_or_below(), probe.units_above());
                if let Some(expected) = scenario.boundary_units {
                    if expected != actual {
                        return Err(HarnessError::BoundaryUnits { expected, actual });
                    }
                }
                vec![probe.at_or_below, probe.above]
            }
            Probe::Target(target) => vec![target],
            Probe::Units(units) => vec![units * unit_cost],
        };

        let mut verdicts = Vec::with_capacity(targets.len());
        for target in targets {
            let generated = match &scenario.parent_shape {
                Some(parent_shape) => generator.generate_interleaved(
                    table,
                    scenario.kind,
                    parent_shape,
                    &scenario.shape,
                    target,
                )?,
                None => generator.generate(table, scenario.kind, &scenario.shape, target)?,
            };
            let verdict = self.oracle.run_generated(&generated, limit).await?;
            info!(
                scenario = %scenario.name,
                variant = %scenario.variant,
                units = generated.units,
                %verdict,
                "case verified"
            );
            verdicts.push(verdict);
        }
        Ok(verdicts)
    }
}

/// Derive a per-scenario seed so concurrent scenarios draw disjoint keys.
/// Stable across platforms and toolchains.
fn seed_for(seed: u64, name: &str) -> u64 {
    xxh3_64_with_seed(name.as_bytes(), seed)
}

/// Result of one scenario.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: String,
    pub variant: Variant,
    /// The verdicts, or the rendered failure.
    pub result: Result<Vec<Verdict>, String>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Results of a whole suite.
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    cases: Vec<CaseReport>,
    /// Scenario tasks that panicked or were cancelled.
    aborted: usize,
}

impl SuiteReport {
    pub fn cases(&self) -> &[CaseReport] {
        &self.cases
    }

    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|c| c.name == name)
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed() + self.aborted
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.passed())
    }

    /// (passed, failed) per variant.
    pub fn by_variant(&self) -> BTreeMap<Variant, (usize, usize)> {
        let mut counts: BTreeMap<Variant, (usize, usize)> = BTreeMap::new();
        for case in &self.cases {
            let entry = counts.entry(case.variant).or_default();
            if case.passed() {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
        counts
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} passed, {} failed", self.passed(), self.failed())?;
        for (variant, (passed, failed)) in self.by_variant() {
            writeln!(f, "  {variant}: {passed} passed, {failed} failed")?;
        }
        for case in self.failures() {
            if let Err(message) = &case.result {
                writeln!(f, "  FAILED {} [{}]: {}", case.name, case.variant, message)?;
            }
        }
        if self.aborted > 0 {
            writeln!(f, "  {} scenario task(s) aborted", self.aborted)?;
        }
        Ok(())
    }
}

/// Runs scenarios concurrently against one shared harness.
pub struct SuiteRunner {
    harness: Arc<Harness>,
    scenarios: Vec<Scenario>,
}

impl SuiteRunner {
    pub fn new(harness: Arc<Harness>) -> Self {
        Self {
            harness,
            scenarios: Vec::new(),
        }
    }

    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    pub fn scenarios(mut self, scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        self.scenarios.extend(scenarios);
        self
    }

    /// Run every scenario as its own task and collect the results, ordered
    /// by scenario name.
    pub async fn run(self) -> SuiteReport {
        let mut tasks = JoinSet::new();
        for scenario in self.scenarios {
            let harness = Arc::clone(&self.harness);
            tasks.spawn(async move {
                let result = harness
                    .run_scenario(&scenario)
                    .await
                    .map_err(|e| e.to_string());
                CaseReport {
                    name: scenario.name,
                    variant: scenario.variant,
                    result,
                }
            });
        }

        let mut report = SuiteReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(case) => {
                    if let Err(message) = &case.result {
                        warn!(
                            scenario = %case.name,
                            variant = %case.variant,
                            %message,
                            "scenario failed"
                        );
                    }
                    report.cases.push(case);
                }
                Err(err) => {
                    warn!(error = %err, "scenario task aborted");
                    report.aborted += 1;
                }
            }
        }
        report.cases.sort_by(|a, b| a.name.cmp(&b.name));
        info!(passed = report.passed(), failed = report.failed(), "suite finished");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;

    fn case(name: &str, variant: Variant, ok: bool) -> CaseReport {
        CaseReport {
            name: name.into(),
            variant,
            result: if ok {
                Ok(vec![Verdict {
                    predicted: 10,
                    limit: 10,
                    outcome: Outcome::Accepted,
                }])
            } else {
                Err("predicted 11 mutations against limit 10".into())
            },
        }
    }

    #[test]
    fn test_report_counts_per_variant() {
        // GIVEN
        let report = SuiteReport {
            cases: vec![
                case("a", Variant::Plain, true),
                case("b", Variant::Plain, false),
                case("c", Variant::Interleaved, true),
            ],
            aborted: 0,
        };

        // WHEN
        let counts = report.by_variant();

        // THEN
        assert_eq!(counts[&Variant::Plain], (1, 1));
        assert_eq!(counts[&Variant::Interleaved], (1, 0));
        assert!(!report.is_success());
        assert!(report.to_string().contains("FAILED b [plain]"));
    }

    #[test]
    fn test_seed_depends_on_name() {
        assert_eq!(seed_for(42, "a"), seed_for(42, "a"));
        assert_ne!(seed_for(42, "a"), seed_for(42, "b"));
        assert_ne!(seed_for(42, "a"), seed_for(43, "a"));
    }
}

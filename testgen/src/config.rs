//! Configuration for batch generation

/// Configuration for batch generation
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Random seed for reproducible keys
    pub seed: u64,
    /// Largest predicted mutation count of one setup chunk
    pub setup_budget: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            setup_budget: 2_000,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_setup_budget(mut self, budget: u64) -> Self {
        self.setup_budget = budget;
        self
    }

    /// Small setup chunks, for stores with a tiny limit.
    pub fn minimal() -> Self {
        Self {
            seed: 42,
            setup_budget: 10,
        }
    }
}

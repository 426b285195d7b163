use huegraph_shared::node_def::ExecutorSetup;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Engine settings. Every field has a default, so a host may load a partial
/// JSON object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cap on k-means updates per quantization.
    pub kmeans_max_iterations: usize,

    /// Seed for every random choice the engine makes. `None` draws from the
    /// operating system.
    pub rng_seed: Option<u64>,

    /// Upper bound on tasks handled by one `run_until_idle` call.
    pub max_tasks_per_run: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            kmeans_max_iterations: 200,
            rng_seed: None,
            max_tasks_per_run: None,
        }
    }
}

impl EngineConfig {
    /// Source of per-node seeds.
    pub(crate) fn seed_source(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub(crate) fn executor_setup(&self, seeds: &mut StdRng) -> ExecutorSetup {
        ExecutorSetup {
            rng_seed: seeds.gen(),
            kmeans_max_iterations: self.kmeans_max_iterations,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Kernel Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{MorpheusError, MorpheusResult};
use crate::policy::{Policy, Resample};

/// Parameters of one ensemble ranking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Number of independent trials. Must be >= 1.
    pub iterations: usize,

    /// Feature dimensionality of every sample. Must be > 0.
    pub size: usize,

    /// Projection row rule: 0 ⇒ ceil(log2(width)), otherwise width / divider.
    pub divider: usize,

    /// Power-iteration count; 0 selects the policy default.
    pub accuracy: usize,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            iterations: 16,
            size: 1,
            divider: 0,
            accuracy: 0,
        }
    }
}

impl EnsembleConfig {
    pub fn new(iterations: usize, size: usize, divider: usize) -> Self {
        Self {
            iterations,
            size,
            divider,
            accuracy: 0,
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> MorpheusResult<()> {
        if self.iterations < 1 {
            return Err(MorpheusError::Config(format!(
                "iterations must be >= 1, got {}",
                self.iterations
            )));
        }
        if self.size == 0 {
            return Err(MorpheusError::Config("size must be > 0".to_string()));
        }
        Ok(())
    }

    /// Rows of the projection basis for a projected width.
    ///
    /// Never below 1, so a tiny width or a large divider still projects.
    pub fn reduced_rows(&self, width: usize) -> usize {
        let rows = if self.divider == 0 {
            (width as f64).log2().ceil() as usize
        } else {
            width / self.divider
        };
        if rows == 0 {
            log::debug!(
                "reduced_rows: width {width} with divider {} yields 0 rows, using 1",
                self.divider
            );
        }
        rows.max(1)
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> MorpheusResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MorpheusError::Config(format!("JSON parse error: {e}")))
    }
}

/// Runtime configuration for the self-organizing network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Out-degree of every node.
    /// Default: 4.
    pub width: usize,

    /// Externally owned feature slots per node.
    /// Default: 32.
    pub embedding: usize,

    /// Fixed number of nodes. Must be >= 2.
    /// Default: 8.
    pub node_count: usize,

    /// Seed of the network's random source.
    /// Default: 1.
    pub seed: u64,

    /// Steps of the reinforced random walk per tick.
    /// Default: 1024.
    pub walk_steps: usize,

    /// Ensemble trials per rewiring decision.
    /// Default: 16.
    pub rewire_iterations: usize,

    /// Projection divider for rewiring ensembles.
    /// Default: 1 (square projection).
    pub rewire_divider: usize,

    /// Local weights above this trigger halve-and-round.
    /// Default: 128.
    pub saturation_limit: f64,

    /// Local state is refreshed with integers in [0, state_range).
    /// Default: 256.
    pub state_range: u32,

    /// Ensemble variant used for rewiring.
    /// Default: fast policy with bases drawn once per call.
    pub rewire_policy: Policy,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            width: 4,
            embedding: 32,
            node_count: 8,
            seed: 1,
            walk_steps: 1024,
            rewire_iterations: 16,
            rewire_divider: 1,
            saturation_limit: 128.0,
            state_range: 256,
            rewire_policy: Policy {
                resample: Resample::Once,
                ..Policy::FAST
            },
        }
    }
}

impl NetworkConfig {
    pub fn new(width: usize, embedding: usize, node_count: usize) -> Self {
        Self {
            width,
            embedding,
            node_count,
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> MorpheusResult<()> {
        if self.node_count < 2 {
            return Err(MorpheusError::Config(format!(
                "node_count must be >= 2 (edges need a non-self target), got {}",
                self.node_count
            )));
        }
        if self.width < 1 {
            return Err(MorpheusError::Config(format!(
                "width must be >= 1, got {}",
                self.width
            )));
        }
        if self.width >= self.node_count {
            return Err(MorpheusError::Config(format!(
                "width must be < node_count for distinct non-self edges, got {} >= {}",
                self.width, self.node_count
            )));
        }
        if self.rewire_iterations < 1 {
            return Err(MorpheusError::Config(format!(
                "rewire_iterations must be >= 1, got {}",
                self.rewire_iterations
            )));
        }
        if self.saturation_limit.is_nan() || self.saturation_limit <= 0.0 {
            return Err(MorpheusError::Config(format!(
                "saturation_limit must be > 0, got {}",
                self.saturation_limit
            )));
        }
        if self.state_range == 0 {
            return Err(MorpheusError::Config(
                "state_range must be > 0".to_string(),
            ));
        }
        self.rewire_policy.validate()
    }

    /// Ensemble configuration for one rewiring decision.
    pub fn rewire_ensemble(&self) -> EnsembleConfig {
        EnsembleConfig::new(
            self.rewire_iterations,
            self.width + self.embedding,
            self.rewire_divider,
        )
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> MorpheusResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MorpheusError::Config(format!("JSON parse error: {e}")))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Stability Readout
// ─────────────────────────────────────────────────────────────────────
//! Scalar summary of the network: how much of the ensemble instability
//! sits on the even-indexed nodes.

use serde::{Deserialize, Serialize};

use morpheus_ensemble::rank;
use morpheus_types::{EnsembleConfig, EnsembleSample, MorpheusResult, Policy};

use crate::network::Network;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityReadout {
    /// Stddev sum over even node indices.
    pub even: f64,
    /// Stddev sum over all nodes.
    pub total: f64,
    /// `even / total`, or 0.5 when the total is zero.
    pub ratio: f64,
}

impl Network {
    /// Rank every node's local state with the fast policy (square
    /// projection) and split the resulting instability by node parity.
    ///
    /// Uses its own seed; the network's random source is not advanced.
    pub fn stability_readout(
        &self,
        seed: u64,
        iterations: usize,
    ) -> MorpheusResult<StabilityReadout> {
        let width = self.width();
        let mut samples: Vec<EnsembleSample<usize>> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| EnsembleSample::new(i, node.values[..width].to_vec()))
            .collect();
        let config = EnsembleConfig::new(iterations, width, 1);
        rank(seed, &config, &Policy::FAST, &mut samples)?;

        let total: f64 = samples.iter().map(|s| s.stddev).sum();
        let even: f64 = samples.iter().step_by(2).map(|s| s.stddev).sum();
        let ratio = if total > 0.0 { even / total } else { 0.5 };
        Ok(StabilityReadout { even, total, ratio })
    }
}

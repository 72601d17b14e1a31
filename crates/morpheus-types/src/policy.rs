// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Ensemble Policy
// ─────────────────────────────────────────────────────────────────────
//! The axes that distinguish one ensemble variant from another.
//!
//! Every variant runs the same trial loop; a [`Policy`] only decides how
//! bases are drawn and normalized, whether signs are split before
//! projection, how the trial ranks are summarised and which PageRank
//! contract produces them.

use serde::{Deserialize, Serialize};

use crate::error::{MorpheusError, MorpheusResult};

/// When the random projection bases are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resample {
    /// Fresh bases for every trial.
    PerTrial,
    /// One pair of bases shared by all trials of a call.
    Once,
}

/// How a Gaussian draw is turned into a projection basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Basis {
    /// Row-wise softmax of the Gaussian matrix.
    Softmax,
    /// Orthonormal rows, applied through the transpose.
    GramSchmidt,
    /// No projection: inputs are compared directly.
    Identity,
}

/// Cross-trial summary produced alongside per-sample mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spread {
    /// Per-sample population standard deviation only.
    StdDev,
    /// Standard deviation plus the full V×V covariance of ranks.
    Covariance,
}

/// Which PageRank contract ranks a trial's similarity matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankMode {
    /// Power-iterated rank vector.
    Vector,
    /// k-step transition matrix; trial rank is its column mean.
    Transition,
}

/// Complete description of one ensemble variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub resample: Resample,
    pub basis: Basis,
    /// Split signed features into non-negative/negated halves first.
    pub sign_split: bool,
    pub spread: Spread,
    pub mode: RankMode,
    /// PageRank dampening (1.0 = pure power iteration).
    pub dampening: f64,
    /// Power-iteration count used when `EnsembleConfig::accuracy == 0`.
    pub default_accuracy: usize,
}

impl Policy {
    /// Softmax bases per trial, 8 power iterations, stddev only.
    pub const FAST: Policy = Policy {
        resample: Resample::PerTrial,
        basis: Basis::Softmax,
        sign_split: false,
        spread: Spread::StdDev,
        mode: RankMode::Vector,
        dampening: 1.0,
        default_accuracy: 8,
    };

    /// Sign-split softmax projection with covariance output.
    pub const SIGNED: Policy = Policy {
        resample: Resample::PerTrial,
        basis: Basis::Softmax,
        sign_split: true,
        spread: Spread::Covariance,
        mode: RankMode::Vector,
        dampening: 1.0,
        default_accuracy: 256,
    };

    /// Orthonormal projection bases with covariance output.
    pub const GRAM_SCHMIDT: Policy = Policy {
        resample: Resample::PerTrial,
        basis: Basis::GramSchmidt,
        sign_split: false,
        spread: Spread::Covariance,
        mode: RankMode::Vector,
        dampening: 1.0,
        default_accuracy: 256,
    };

    /// Like [`Policy::SIGNED`] but the bases are drawn once per call, so
    /// only the per-trial PageRank start vectors vary.
    pub const FIXED_BASIS: Policy = Policy {
        resample: Resample::Once,
        basis: Basis::Softmax,
        sign_split: true,
        spread: Spread::Covariance,
        mode: RankMode::Vector,
        dampening: 1.0,
        default_accuracy: 256,
    };

    /// Unprojected similarity ranked through the damped transition matrix.
    ///
    /// Nothing here is random: without a similarity hook every trial is
    /// identical, so `stddev` is always 0 and extra iterations reuse the
    /// first trial's transition matrix.
    pub const MARKOV: Policy = Policy {
        resample: Resample::Once,
        basis: Basis::Identity,
        sign_split: false,
        spread: Spread::StdDev,
        mode: RankMode::Transition,
        dampening: 0.85,
        default_accuracy: 1024,
    };

    /// Power-iteration count for a given configured accuracy.
    pub fn accuracy(&self, configured: usize) -> usize {
        if configured > 0 {
            configured
        } else {
            self.default_accuracy
        }
    }

    pub fn validate(&self) -> MorpheusResult<()> {
        if !(0.0..=1.0).contains(&self.dampening) {
            return Err(MorpheusError::Config(format!(
                "dampening must be in [0, 1], got {}",
                self.dampening
            )));
        }
        if self.default_accuracy == 0 {
            return Err(MorpheusError::Config(
                "default_accuracy must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::FAST
    }
}

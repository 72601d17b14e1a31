// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Ensemble Variants
// ─────────────────────────────────────────────────────────────────────
//! Named entry points over the preset policies.
//!
//! Each takes `(seed, config, samples)`, writes `mean`/`stddev` into the
//! samples and, for the covariance and transition variants, returns the
//! V×V matrix.

use morpheus_linalg::Matrix;
use morpheus_types::{EnsembleConfig, EnsembleSample, MorpheusError, MorpheusResult, Policy};

use crate::ensemble::rank;

/// Softmax bases per trial, stddev only.
pub fn fast<T>(
    seed: u64,
    config: &EnsembleConfig,
    samples: &mut [EnsembleSample<T>],
) -> MorpheusResult<()> {
    rank(seed, config, &Policy::FAST, samples).map(|_| ())
}

fn covariance_of<T>(
    seed: u64,
    config: &EnsembleConfig,
    policy: &Policy,
    samples: &mut [EnsembleSample<T>],
) -> MorpheusResult<Matrix<f64>> {
    rank(seed, config, policy, samples)?.covariance.ok_or_else(|| {
        MorpheusError::Config(format!(
            "{:?} spread yields no covariance matrix",
            policy.spread
        ))
    })
}

/// Sign-split softmax projection; returns the rank covariance.
pub fn signed<T>(
    seed: u64,
    config: &EnsembleConfig,
    samples: &mut [EnsembleSample<T>],
) -> MorpheusResult<Matrix<f64>> {
    covariance_of(seed, config, &Policy::SIGNED, samples)
}

/// Orthonormal projection bases; returns the rank covariance.
pub fn gram_schmidt<T>(
    seed: u64,
    config: &EnsembleConfig,
    samples: &mut [EnsembleSample<T>],
) -> MorpheusResult<Matrix<f64>> {
    covariance_of(seed, config, &Policy::GRAM_SCHMIDT, samples)
}

/// Sign-split bases drawn once per call; returns the rank covariance.
pub fn fixed_basis<T>(
    seed: u64,
    config: &EnsembleConfig,
    samples: &mut [EnsembleSample<T>],
) -> MorpheusResult<Matrix<f64>> {
    covariance_of(seed, config, &Policy::FIXED_BASIS, samples)
}

/// Unprojected similarity through the damped chain; returns the
/// transition matrix.
pub fn markov<T>(
    seed: u64,
    config: &EnsembleConfig,
    samples: &mut [EnsembleSample<T>],
) -> MorpheusResult<Matrix<f64>> {
    rank(seed, config, &Policy::MARKOV, samples)?
        .transition
        .ok_or_else(|| {
            MorpheusError::Config("markov policy yields no transition matrix".to_string())
        })
}

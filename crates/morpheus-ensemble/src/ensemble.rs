// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Ensemble Ranking
// ─────────────────────────────────────────────────────────────────────
//! Per-trial pipeline:
//!   1. Draw Gaussian bases A, B (reduced_rows × width), per trial or once
//!   2. Normalize to a projection basis (softmax, Gram-Schmidt, identity)
//!   3. Project the inputs (sign-split first if requested), unit-normalize
//!   4. Similarity S = (B̂-projected)·(Â-projected)ᵗ, optional caller hook
//!   5. Rank with a trial seed drawn from the run's random source
//!   6. Record the trial rank vector
//!
//! After all trials every sample gets its mean rank and population
//! standard deviation; covariance policies also return the V×V
//! cross-trial covariance, transition policies the averaged transition
//! matrix.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use morpheus_linalg::{markov_matrix, rank_vector, uniform_start_rank, Matrix};
use morpheus_types::{
    Basis, EnsembleConfig, EnsembleSample, MorpheusError, MorpheusResult, Policy, RankMode,
    Resample, Spread,
};

use crate::sign::split_signs_into;

/// Outputs of one ensemble call beyond the per-sample mean/stddev.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleReport {
    /// Trials run.
    pub trials: usize,
    /// Width of the vectors fed to the projection (doubled by sign split).
    pub width: usize,
    /// Rows of each projection basis (equals `width` for the identity basis).
    pub reduced_rows: usize,
    /// Cross-trial covariance of ranks, for [`Spread::Covariance`].
    pub covariance: Option<Matrix<f64>>,
    /// Trial-averaged transition matrix, for [`RankMode::Transition`].
    pub transition: Option<Matrix<f64>>,
}

/// A normalized basis, oriented for projecting row vectors.
enum Projector {
    Identity,
    /// `r × width`; projection is `X·Âᵗ`.
    Rows(Matrix<f64>),
    /// `width × r`; projection is `X·Q`.
    Columns(Matrix<f64>),
}

impl Projector {
    fn project(&self, inputs: &Matrix<f64>) -> MorpheusResult<Matrix<f64>> {
        match self {
            Projector::Identity => Ok(inputs.clone()),
            Projector::Rows(basis) => inputs.multiply_by_transpose(basis),
            Projector::Columns(basis) => inputs.matmul(basis),
        }
    }
}

fn draw_bases(
    rng: &mut ChaCha8Rng,
    basis: Basis,
    rows: usize,
    width: usize,
) -> MorpheusResult<(Projector, Projector)> {
    if basis == Basis::Identity {
        return Ok((Projector::Identity, Projector::Identity));
    }

    let mut a = Matrix::zeros(rows, width);
    let mut b = Matrix::zeros(rows, width);
    for (x, y) in a.data_mut().iter_mut().zip(b.data_mut().iter_mut()) {
        *x = rng.sample(StandardNormal);
        *y = rng.sample(StandardNormal);
    }

    match basis {
        Basis::Softmax => Ok((
            Projector::Rows(a.softmax_normalize()),
            Projector::Rows(b.softmax_normalize()),
        )),
        Basis::GramSchmidt => Ok((
            Projector::Columns(a.gram_schmidt()?.transpose()),
            Projector::Columns(b.gram_schmidt()?.transpose()),
        )),
        Basis::Identity => Ok((Projector::Identity, Projector::Identity)),
    }
}

fn input_matrix<T>(
    samples: &[EnsembleSample<T>],
    width: usize,
    sign_split: bool,
) -> Matrix<f64> {
    let mut x = Matrix::zeros(samples.len(), width);
    for (i, sample) in samples.iter().enumerate() {
        let row = x.row_mut(i);
        if sign_split {
            split_signs_into(&sample.values, row);
        } else {
            row.copy_from_slice(&sample.values);
        }
    }
    x
}

/// Write mean/stddev into the samples; return the covariance if asked.
fn summarize<T>(
    samples: &mut [EnsembleSample<T>],
    results: &[Vec<f64>],
    spread: Spread,
) -> Option<Matrix<f64>> {
    let v = samples.len();
    let t = results.len() as f64;

    let mut mean = vec![0.0; v];
    for result in results {
        for (m, &r) in mean.iter_mut().zip(result) {
            *m += r;
        }
    }
    for m in mean.iter_mut() {
        *m /= t;
    }

    let mut var = vec![0.0; v];
    for result in results {
        for ((s, &m), &r) in var.iter_mut().zip(&mean).zip(result) {
            let diff = r - m;
            *s += diff * diff;
        }
    }

    for ((sample, &m), &s) in samples.iter_mut().zip(&mean).zip(&var) {
        sample.mean = m;
        sample.stddev = (s / t).sqrt();
    }

    if spread != Spread::Covariance {
        return None;
    }
    let mut cov = Matrix::zeros(v, v);
    for result in results {
        for i in 0..v {
            let di = mean[i] - result[i];
            let row = cov.row_mut(i);
            for (j, c) in row.iter_mut().enumerate() {
                *c += di * (mean[j] - result[j]);
            }
        }
    }
    for c in cov.data_mut() {
        *c /= t;
    }
    Some(cov)
}

/// Rank `samples` under `policy`, passing every trial's similarity matrix
/// through `hook` before it is ranked.
///
/// Fails with [`MorpheusError::SampleLength`] if any sample does not have
/// exactly `config.size` values; samples are left untouched on error.
pub fn rank_with<T, H>(
    seed: u64,
    config: &EnsembleConfig,
    policy: &Policy,
    samples: &mut [EnsembleSample<T>],
    mut hook: H,
) -> MorpheusResult<EnsembleReport>
where
    H: FnMut(&mut Matrix<f64>),
{
    config.validate()?;
    policy.validate()?;
    for (index, sample) in samples.iter().enumerate() {
        if sample.values.len() != config.size {
            return Err(MorpheusError::SampleLength {
                index,
                expected: config.size,
                got: sample.values.len(),
            });
        }
    }

    let width = if policy.sign_split {
        2 * config.size
    } else {
        config.size
    };
    let rows = match policy.basis {
        Basis::Identity => width,
        _ => config.reduced_rows(width),
    };
    let accuracy = policy.accuracy(config.accuracy);
    log::debug!(
        "ensemble: {} samples, {} trials, width {width}, rows {rows}, accuracy {accuracy}, {:?}/{:?}",
        samples.len(),
        config.iterations,
        policy.basis,
        policy.mode,
    );

    let inputs = input_matrix(samples, width, policy.sign_split);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let fixed = match policy.resample {
        Resample::Once => Some(draw_bases(&mut rng, policy.basis, rows, width)?),
        Resample::PerTrial => None,
    };

    let v = samples.len();
    let mut transition_sum = match policy.mode {
        RankMode::Transition => Some(Matrix::zeros(v, v)),
        RankMode::Vector => None,
    };
    let mut results = Vec::with_capacity(config.iterations);
    // Last (similarity, k-step matrix) pair; fixed bases repeat it.
    let mut cached: Option<(Matrix<f64>, Matrix<f64>)> = None;

    for trial in 0..config.iterations {
        let drawn;
        let (a, b) = match &fixed {
            Some(bases) => bases,
            None => {
                drawn = draw_bases(&mut rng, policy.basis, rows, width)?;
                &drawn
            }
        };

        let xx = a.project(&inputs)?.unit_normalize();
        let yy = b.project(&inputs)?.unit_normalize();
        let mut similarity = yy.multiply_by_transpose(&xx)?;
        hook(&mut similarity);

        let trial_seed: u64 = rng.gen();
        let rank = match policy.mode {
            RankMode::Vector => {
                rank_vector(policy.dampening, accuracy, trial_seed, &similarity)?
            }
            RankMode::Transition => {
                let m = match &cached {
                    Some((previous, m)) if *previous == similarity => m.clone(),
                    _ => {
                        let m = markov_matrix(policy.dampening, accuracy, &similarity)?;
                        cached = Some((similarity.clone(), m.clone()));
                        m
                    }
                };
                let rank = uniform_start_rank(&m);
                if let Some(sum) = transition_sum.as_mut() {
                    for (s, &x) in sum.data_mut().iter_mut().zip(m.data()) {
                        *s += x;
                    }
                }
                rank
            }
        };
        log::trace!("ensemble trial {trial}: rank {rank:?}");
        results.push(rank);
    }

    let covariance = summarize(samples, &results, policy.spread);
    let transition = transition_sum.map(|mut sum| {
        let t = results.len() as f64;
        for s in sum.data_mut() {
            *s /= t;
        }
        sum
    });

    Ok(EnsembleReport {
        trials: results.len(),
        width,
        reduced_rows: rows,
        covariance,
        transition,
    })
}

/// [`rank_with`] without a similarity hook.
pub fn rank<T>(
    seed: u64,
    config: &EnsembleConfig,
    policy: &Policy,
    samples: &mut [EnsembleSample<T>],
) -> MorpheusResult<EnsembleReport> {
    rank_with(seed, config, policy, samples, |_| {})
}

// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus PageRank Engine
// ─────────────────────────────────────────────────────────────────────
//! Similarity matrix → row-stochastic transition matrix → power iteration.
//!
//! Two contracts share the transition matrix:
//!   - [`rank_vector`]: scalar rank per node after a fixed number of
//!     damped power-iteration steps.
//!   - [`markov_matrix`]: the k-step transition matrix itself, row `i`
//!     being the distribution after k steps starting at node `i`.
//!
//! The rank-vector start point is drawn from the caller's seed: uniform
//! `[0, 1)` entries normalized to sum 1. With dampening 1.0 the sum is
//! preserved by every step, so the result is a probability vector.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use morpheus_types::{MorpheusError, MorpheusResult};

use crate::matrix::{Float, Matrix};

/// Dampening used by the transition-matrix call sites.
pub const MARKOV_DAMPENING: f64 = 0.85;

/// Build `P[i,j] = |S[i,j]| / Σ_j |S[i,j]|`.
///
/// Rows whose absolute sum is zero become uniform `1/N`.
pub fn transition_matrix<F: Float>(similarity: &Matrix<F>) -> MorpheusResult<Matrix<F>> {
    let (n, cols) = similarity.shape();
    if n != cols {
        return Err(MorpheusError::shape(
            "transition_matrix",
            similarity.shape(),
            (cols, n),
        ));
    }
    if !similarity.is_finite() {
        return Err(MorpheusError::Numerical(
            "similarity matrix contains NaN or Inf".to_string(),
        ));
    }

    let mut p = Matrix::zeros(n, n);
    let uniform = F::one() / F::of(n as f64);
    for i in 0..n {
        let src = similarity.row(i);
        let sum: F = src.iter().map(|v| v.abs()).sum();
        let dst = p.row_mut(i);
        if sum > F::zero() {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = s.abs() / sum;
            }
        } else {
            log::trace!("transition_matrix: row {i} sums to zero, using uniform row");
            for d in dst.iter_mut() {
                *d = uniform;
            }
        }
    }
    Ok(p)
}

/// Seeded start vector summing to 1.
fn start_vector<F: Float>(seed: u64, n: usize) -> Vec<F> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let raw: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
    let sum: f64 = raw.iter().sum();
    if sum > 0.0 {
        raw.into_iter().map(|v| F::of(v / sum)).collect()
    } else {
        vec![F::of(1.0 / n as f64); n]
    }
}

/// Damped power iteration: `rank' = d·Pᵗ·rank + (1-d)/N`.
///
/// Returns `[1.0]` for a single node and an empty vector for none.
pub fn rank_vector<F: Float>(
    dampening: F,
    iterations: usize,
    seed: u64,
    similarity: &Matrix<F>,
) -> MorpheusResult<Vec<F>> {
    let p = transition_matrix(similarity)?;
    let n = p.rows();
    match n {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![F::one()]),
        _ => {}
    }

    let base = (F::one() - dampening) / F::of(n as f64);
    let mut rank = start_vector::<F>(seed, n);
    let mut next = vec![F::zero(); n];
    for _ in 0..iterations {
        for v in next.iter_mut() {
            *v = base;
        }
        for i in 0..n {
            let share = dampening * rank[i];
            for (v, &pij) in next.iter_mut().zip(p.row(i)) {
                *v = *v + share * pij;
            }
        }
        std::mem::swap(&mut rank, &mut next);
    }
    Ok(rank)
}

/// k-step transition matrix of the damped chain `G = d·P + (1-d)/N·J`.
///
/// Computed as `G^k` by exponentiation by squaring; `k = 0` yields the
/// identity.
pub fn markov_matrix<F: Float>(
    dampening: F,
    iterations: usize,
    similarity: &Matrix<F>,
) -> MorpheusResult<Matrix<F>> {
    let mut g = transition_matrix(similarity)?;
    let n = g.rows();
    if n == 0 {
        return Ok(g);
    }
    let base = (F::one() - dampening) / F::of(n as f64);
    for v in g.data_mut() {
        *v = dampening * *v + base;
    }

    let mut result = Matrix::identity(n);
    let mut k = iterations;
    while k > 0 {
        if k & 1 == 1 {
            result = result.matmul(&g)?;
        }
        k >>= 1;
        if k > 0 {
            g = g.matmul(&g)?;
        }
    }
    Ok(result)
}

/// Column means of a transition matrix: the rank reached from a uniform start.
pub fn uniform_start_rank<F: Float>(transition: &Matrix<F>) -> Vec<F> {
    let (rows, cols) = transition.shape();
    let mut rank = vec![F::zero(); cols];
    if rows == 0 {
        return rank;
    }
    for i in 0..rows {
        for (r, &v) in rank.iter_mut().zip(transition.row(i)) {
            *r = *r + v;
        }
    }
    let scale = F::of(rows as f64);
    for r in rank.iter_mut() {
        *r = *r / scale;
    }
    rank
}

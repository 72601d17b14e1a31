// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Ensemble Sample
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// One input vector of an ensemble call.
///
/// `meta` is carried through untouched. The engine writes only `mean`
/// and `stddev`, both reset at the start of every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnsembleSample<T> {
    pub meta: T,
    pub values: Vec<f64>,
    /// Average rank across trials.
    pub mean: f64,
    /// Population standard deviation of rank across trials.
    pub stddev: f64,
}

impl<T> EnsembleSample<T> {
    pub fn new(meta: T, values: Vec<f64>) -> Self {
        Self {
            meta,
            values,
            mean: 0.0,
            stddev: 0.0,
        }
    }

    /// Index of the sample with the largest `stddev` within `samples`.
    ///
    /// Strictly greater wins, starting from zero, so ties and an all-zero
    /// spread resolve to index 0.
    pub fn most_unstable(samples: &[EnsembleSample<T>]) -> usize {
        let mut max = 0.0;
        let mut index = 0;
        for (i, sample) in samples.iter().enumerate() {
            if sample.stddev > max {
                max = sample.stddev;
                index = i;
            }
        }
        index
    }
}

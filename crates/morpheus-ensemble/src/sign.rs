// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Sign Split
// ─────────────────────────────────────────────────────────────────────
//! Carry sign information through a magnitude-oriented projection.
//!
//! A signed vector of length n becomes a non-negative vector of length
//! 2n: positive (and zero) entries stay in the first half, negative
//! entries are negated into the second half at the same offset.

/// Write the split form of `values` into `out` (length `2 * values.len()`).
pub fn split_signs_into(values: &[f64], out: &mut [f64]) {
    let n = values.len();
    debug_assert_eq!(out.len(), 2 * n);
    for v in out.iter_mut() {
        *v = 0.0;
    }
    for (i, &value) in values.iter().enumerate() {
        if value < 0.0 {
            out[n + i] = -value;
        } else {
            out[i] = value;
        }
    }
}

/// Split `values` into non-negative and negated-negative halves.
pub fn split_signs(values: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; 2 * values.len()];
    split_signs_into(values, &mut out);
    out
}

/// Inverse of [`split_signs`]: `out[i] = split[i] - split[n + i]`.
///
/// An odd-length input has no valid split form and yields `None`.
pub fn merge_signs(split: &[f64]) -> Option<Vec<f64>> {
    if split.len() % 2 != 0 {
        return None;
    }
    let n = split.len() / 2;
    Some((0..n).map(|i| split[i] - split[n + i]).collect())
}

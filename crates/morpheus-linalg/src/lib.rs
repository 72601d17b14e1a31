// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Linear Algebra
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Dense matrix algebra and PageRank power iteration for the Morpheus
//! ranking engine.
//!
//! Architecture:
//!   - Matrix: row-major storage, multiply-by-transpose, unit/softmax
//!     normalization, Gram-Schmidt orthonormalization
//!   - PageRank: transition matrix, rank vector, k-step transition matrix

pub mod matrix;
pub mod pagerank;

pub use matrix::{dot, Float, Matrix};
pub use pagerank::{
    markov_matrix, rank_vector, transition_matrix, uniform_start_rank, MARKOV_DAMPENING,
};

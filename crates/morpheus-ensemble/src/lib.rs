// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Ensemble Ranking
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Randomized ensemble ranking ("Morpheus").
//!
//! Repeatedly projects a set of vectors through random bases, ranks the
//! projected set by similarity with PageRank, and aggregates each
//! vector's rank across trials. A high `stddev` means the vector's rank
//! is unstable under independent projections, i.e. its features are
//! separable from the rest of the set; a near-zero `stddev` means it is
//! indistinguishable from the group.
//!
//! One trial loop serves every variant; see [`morpheus_types::Policy`].

pub mod ensemble;
pub mod sign;
pub mod variants;

pub use ensemble::{rank, rank_with, EnsembleReport};
pub use sign::{merge_signs, split_signs, split_signs_into};

// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Self-Organizing Graph
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Fixed-size directed graph that rewires itself by ensemble stability.
//!
//! Nodes are addressed by index into one arena. Each tick refreshes the
//! edges and local state, lets every node swap its least stable
//! neighbour for a random candidate, then runs a reinforced random walk
//! over the local edge weights. The embedding slot of every node belongs
//! to the caller and is never touched by a tick.

pub mod network;
pub mod node;
pub mod readout;
pub mod shared;

pub use network::{Network, TickReport};
pub use node::Node;
pub use readout::StabilityReadout;
pub use shared::SharedNetwork;

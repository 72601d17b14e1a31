// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, ensemble policy and error hierarchy
//! shared by the Morpheus ranking engine and the self-organizing network.

pub mod config;
pub mod error;
pub mod policy;
pub mod sample;

pub use config::{EnsembleConfig, NetworkConfig};
pub use error::{MorpheusError, MorpheusResult};
pub use policy::{Basis, Policy, RankMode, Resample, Spread};
pub use sample::EnsembleSample;

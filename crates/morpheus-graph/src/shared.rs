// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Morpheus Shared Network Handle
// ─────────────────────────────────────────────────────────────────────

use std::sync::Arc;

use parking_lot::Mutex;

use morpheus_types::{MorpheusResult, NetworkConfig};

use crate::network::{Network, TickReport};
use crate::readout::StabilityReadout;

/// Cloneable handle serializing access to one [`Network`].
///
/// A tick holds the lock for its full duration, so embedding writes from
/// other threads land between ticks, never inside one.
#[derive(Clone)]
pub struct SharedNetwork {
    inner: Arc<Mutex<Network>>,
}

impl SharedNetwork {
    pub fn new(network: Network) -> Self {
        Self {
            inner: Arc::new(Mutex::new(network)),
        }
    }

    pub fn with_config(config: NetworkConfig) -> MorpheusResult<Self> {
        Ok(Self::new(Network::with_config(config)?))
    }

    pub fn tick(&self) -> MorpheusResult<TickReport> {
        self.inner.lock().tick()
    }

    pub fn write_embedding(&self, index: usize, features: &[f64]) -> MorpheusResult<()> {
        self.inner.lock().write_embedding(index, features)
    }

    pub fn stability_readout(
        &self,
        seed: u64,
        iterations: usize,
    ) -> MorpheusResult<StabilityReadout> {
        self.inner.lock().stability_readout(seed, iterations)
    }

    pub fn tick_count(&self) -> u64 {
        self.inner.lock().tick_count()
    }

    /// Run `f` with exclusive access to the network.
    pub fn with<R>(&self, f: impl FnOnce(&mut Network) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }
}

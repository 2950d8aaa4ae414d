//! Share a [Simulator] between threads.

use crate::{metrics::Metrics, Config, Consumer, Error, Simulator};
use prometheus_client::registry::Registry;
use rand::{rngs::StdRng, Rng};
use std::sync::{Arc, Mutex};

/// Cloneable handle to a [Simulator] guarded by a single mutex.
///
/// Every operation holds the lock for its full duration, so a `produce` never interleaves
/// with a `tick`. The generator lives behind the same lock. The consumer passed to
/// [Shared::tick] runs while the lock is held and must not call back into the handle.
pub struct Shared<P, R: Rng = StdRng> {
    inner: Arc<Mutex<Simulator<P, R>>>,
}

impl<P, R: Rng> Clone for Shared<P, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P, R: Rng> From<Simulator<P, R>> for Shared<P, R> {
    fn from(simulator: Simulator<P, R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulator)),
        }
    }
}

impl<P, R: Rng> Shared<P, R> {
    /// See [Simulator::produce].
    pub fn produce(&self, payload: P, now: f64) {
        self.inner.lock().unwrap().produce(payload, now);
    }

    /// See [Simulator::tick].
    pub fn tick<C: Consumer<P>>(&self, now: f64, consumer: &mut C) -> usize {
        self.inner.lock().unwrap().tick(now, consumer)
    }

    /// See [Simulator::reconfigure].
    pub fn reconfigure(&self, config: Config) -> Result<(), Error> {
        self.inner.lock().unwrap().reconfigure(config)
    }

    /// Copy of the current impairment settings.
    pub fn config(&self) -> Config {
        *self.inner.lock().unwrap().config()
    }

    /// Number of payloads awaiting delivery.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Returns true if no payload awaits delivery.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    /// Metrics of the underlying simulator (handles share the same counters).
    pub fn metrics(&self) -> Metrics {
        self.inner.lock().unwrap().metrics().clone()
    }

    /// Register the simulator's metrics with the provided registry.
    pub fn register(&self, registry: &mut Registry) {
        self.inner.lock().unwrap().register(registry);
    }
}

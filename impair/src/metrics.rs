//! Counters describing the activity of a [crate::Simulator].

use prometheus_client::{
    metrics::{counter::Counter, gauge::Gauge},
    registry::Registry,
};

/// Metrics tracked by a [crate::Simulator].
///
/// At any point, `produced == dropped + delivered + pending`.
#[derive(Clone, Debug, Default)]
pub struct Metrics {
    /// Payloads handed to the simulator.
    pub produced: Counter,
    /// Payloads discarded on admission.
    pub dropped: Counter,
    /// Admitted payloads inserted at a random queue position.
    pub scrambled: Counter,
    /// Payloads handed to a consumer.
    pub delivered: Counter,
    /// Payloads currently waiting for delivery.
    pub pending: Gauge,
}

impl Metrics {
    /// Register all metrics with the provided registry.
    pub fn register(&self, registry: &mut Registry) {
        registry.register("produced", "payloads produced", self.produced.clone());
        registry.register("dropped", "payloads dropped", self.dropped.clone());
        registry.register(
            "scrambled",
            "payloads inserted out of order",
            self.scrambled.clone(),
        );
        registry.register("delivered", "payloads delivered", self.delivered.clone());
        registry.register("pending", "payloads awaiting delivery", self.pending.clone());
    }
}

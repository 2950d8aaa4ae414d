//! Queue of admitted payloads awaiting delivery.

use crate::{metrics::Metrics, Config, Consumer, Error, Pending};
use prometheus_client::registry::Registry;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace};

/// Delays, drops, and reorders payloads before handing them to a [Consumer].
///
/// The queue is kept in positional order, which is independent of delivery time: a
/// scrambled payload may sit in front of one that is due earlier. [Simulator::tick]
/// scans in positional order, so payloads due in the same tick are delivered in queue
/// order (not production order or delivery-time order).
pub struct Simulator<P, R: Rng = StdRng> {
    config: Config,
    rng: R,
    queue: Vec<Pending<P>>,
    metrics: Metrics,
}

impl<P> Simulator<P, StdRng> {
    /// Create a simulator with a deterministic generator derived from `seed`.
    pub fn seeded(config: Config, seed: u64) -> Result<Self, Error> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<P, R: Rng> Simulator<P, R> {
    /// Create a simulator that draws all randomness from `rng`.
    ///
    /// Returns an error if `config` is out of range.
    pub fn new(config: Config, rng: R) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            queue: Vec::new(),
            metrics: Metrics::default(),
        })
    }

    /// Current impairment settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the impairment settings.
    ///
    /// Only affects payloads produced afterwards (delivery times already assigned are kept).
    /// If `config` is rejected, the previous settings remain in force.
    pub fn reconfigure(&mut self, config: Config) -> Result<(), Error> {
        config.validate()?;
        debug!(?config, "reconfigured");
        self.config = config;
        Ok(())
    }

    /// Metrics describing simulator activity.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Register the simulator's metrics with the provided registry.
    pub fn register(&self, registry: &mut Registry) {
        self.metrics.register(registry);
    }

    /// Number of payloads awaiting delivery.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no payload awaits delivery.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Payloads awaiting delivery, in queue (not delivery-time) order.
    pub fn pending(&self) -> impl Iterator<Item = &Pending<P>> {
        self.queue.iter()
    }

    /// Earliest delivery time of any pending payload.
    pub fn next_delivery(&self) -> Option<f64> {
        self.queue
            .iter()
            .map(|pending| pending.deliver_at)
            .min_by(f64::total_cmp)
    }

    /// Submit a payload produced at `now`.
    ///
    /// The payload is either dropped silently or queued for delivery at
    /// `now + latency + [0, jitter)`.
    pub fn produce(&mut self, payload: P, now: f64) {
        self.metrics.produced.inc();

        // Drop with probability `loss` (samples are in [0, 1), so 0 never drops and 1
        // always drops)
        if self.rng.gen::<f64>() < self.config.loss {
            self.metrics.dropped.inc();
            trace!(now, reason = "random loss", "dropping payload");
            return;
        }

        // Select position (scrambling may still pick the end of the queue)
        let last = self.queue.len();
        let index = if self.rng.gen::<f64>() < self.config.scramble {
            self.metrics.scrambled.inc();
            self.rng.gen_range(0..=last)
        } else {
            last
        };

        // Assign delivery time
        let latency = self.config.latency + self.rng.gen::<f64>() * self.config.jitter;
        let deliver_at = now + latency;
        trace!(now, deliver_at, index, pending = last, "queueing payload");
        self.queue.insert(
            index,
            Pending {
                deliver_at,
                payload,
            },
        );
        self.metrics.pending.set(self.queue.len() as i64);
    }

    /// Deliver every payload due at `now`, in queue order.
    ///
    /// Payloads not yet due keep their relative order. Returns the number of payloads
    /// delivered.
    pub fn tick<C: Consumer<P>>(&mut self, now: f64, consumer: &mut C) -> usize {
        if self.queue.is_empty() {
            return 0;
        }

        // Remove due payloads one at a time so a panicking consumer leaves the rest queued
        let mut delivered = 0;
        let mut index = 0;
        while index < self.queue.len() {
            if now < self.queue[index].deliver_at {
                index += 1;
                continue;
            }
            let pending = self.queue.remove(index);
            trace!(now, deliver_at = pending.deliver_at, "delivering payload");
            self.metrics.delivered.inc();
            self.metrics.pending.set(self.queue.len() as i64);
            consumer.deliver(pending.payload);
            delivered += 1;
        }
        delivered
    }

    /// Discard all pending payloads without delivering them, returning how many were discarded.
    ///
    /// Discarded payloads count as dropped.
    pub fn clear(&mut self) -> usize {
        let cleared = self.queue.len();
        self.queue.clear();
        self.metrics.dropped.inc_by(cleared as u64);
        self.metrics.pending.set(0);
        cleared
    }
}

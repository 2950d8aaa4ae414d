//! Delay, drop, and reorder messages to emulate an unreliable, unordered network.
//!
//! A [Simulator] sits between a producer and a consumer that share a clock. The producer
//! hands it payloads with [Simulator::produce], the clock driver calls [Simulator::tick]
//! once per frame, and every payload whose delivery time has passed is handed to a
//! [Consumer]. Between those two calls a payload may be dropped, delayed by a fixed
//! latency plus random jitter, or inserted at a random position of the pending queue
//! (so payloads due in the same tick can arrive out of order).
//!
//! Delivery is at-most-once: a payload is either dropped on admission or delivered exactly
//! once, never redelivered. Loss is an expected outcome and is never reported as an error.
//!
//! # Example
//!
//! ```rust
//! use snapnet_impair::{Config, Simulator};
//!
//! let config = Config::ideal().with_latency(0.1);
//! let mut simulator = Simulator::seeded(config, 0).unwrap();
//! simulator.produce("hello", 0.0);
//!
//! let mut received: Vec<&str> = Vec::new();
//! simulator.tick(0.05, &mut received);
//! assert!(received.is_empty());
//! simulator.tick(0.1, &mut received);
//! assert_eq!(received, vec!["hello"]);
//! ```

use thiserror::Error;

mod config;
pub use config::Config;
pub mod metrics;
mod shared;
pub use shared::Shared;
mod simulator;
pub use simulator::Simulator;

/// Errors that can occur when configuring a [Simulator].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("invalid latency (must be finite and >= 0): {0}")]
    InvalidLatency(f64),
    #[error("invalid jitter (must be in [0, 1]): {0}")]
    InvalidJitter(f64),
    #[error("invalid loss rate (must be in [0, 1]): {0}")]
    InvalidLossRate(f64),
    #[error("invalid scramble rate (must be in [0, 1]): {0}")]
    InvalidScrambleRate(f64),
}

/// A payload waiting in the queue of a [Simulator].
#[derive(Clone, Debug, PartialEq)]
pub struct Pending<P> {
    /// Absolute time (in seconds) at which the payload becomes deliverable.
    ///
    /// Assigned once on admission and never changed.
    pub deliver_at: f64,

    /// The opaque payload.
    pub payload: P,
}

/// Receives payloads released by [Simulator::tick].
pub trait Consumer<P> {
    /// Called once for every delivered payload, in queue order.
    fn deliver(&mut self, payload: P);
}

impl<P, F: FnMut(P)> Consumer<P> for F {
    fn deliver(&mut self, payload: P) {
        self(payload)
    }
}

/// Collects delivered payloads in arrival order.
impl<P> Consumer<P> for Vec<P> {
    fn deliver(&mut self, payload: P) {
        self.push(payload);
    }
}

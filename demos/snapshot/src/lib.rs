//! Stream position snapshots through a lossy, jittery, reordering link.
//!
//! A server object moves back and forth along the x axis and broadcasts a [Snapshot] of its
//! position every `send_interval` seconds. Snapshots pass through a [snapnet_impair::Simulator]
//! before reaching a [Client], which records what arrived, what went missing, and what
//! arrived out of order. Everything runs on a simulated clock advanced one frame at a time,
//! so a run with the same [Config] (including `seed`) always produces the same [Summary].
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin snapnet-snapshot -- --latency 0.1 --jitter 0.05 --loss 0.1 --scramble 0.1
//! ```
//!
//! Settings may also be read from a YAML file (flags override file values):
//!
//! ```yaml
//! impairment:
//!   latency: 0.1
//!   jitter: 0.05
//!   loss: 0.1
//!   scramble: 0.1
//! send_interval: 0.05
//! duration: 30
//! seed: 7
//! ```
//!
//! ```bash
//! cargo run --release --bin snapnet-snapshot -- --config snapshot.yaml
//! ```

use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};
use thiserror::Error;

mod client;
pub use client::{Client, Summary};
mod driver;
pub use driver::Driver;
mod server;
pub use server::{ping_pong, Server};

/// Upper bound on `latency + jitter` (one day of simulated time).
pub const MAX_LINK_DELAY: f64 = 86_400.0;

/// Errors that can occur when configuring a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid impairment: {0}")]
    Impairment(#[from] snapnet_impair::Error),
    #[error("invalid link delay (latency + jitter must be <= 86400s): {0}")]
    InvalidLinkDelay(f64),
    #[error("invalid send interval (must be finite and > 0): {0}")]
    InvalidSendInterval(f64),
    #[error("invalid frame (must be finite and > 0): {0}")]
    InvalidFrame(f64),
    #[error("invalid duration (must be finite and > 0): {0}")]
    InvalidDuration(f64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// State of the server object at a point in (server) time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    /// Server time at which the snapshot was taken.
    pub remote_time: f64,
    /// Incremented for every snapshot sent (including those later lost).
    pub sequence: u64,
    pub position: [f32; 3],
}

/// Configuration for a run.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Impairments applied between server and client.
    pub impairment: snapnet_impair::Config,

    /// Seconds between snapshots.
    pub send_interval: f64,

    /// Seconds between frames (each frame moves the server and ticks the link).
    pub frame: f64,

    /// Seconds of simulated time during which snapshots are sent.
    pub duration: f64,

    /// Distance travelled by the server before turning around.
    pub distance: f32,

    /// Units per second travelled by the server.
    pub speed: f32,

    /// Seed for the link's random number generator.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            impairment: snapnet_impair::Config::default(),
            send_interval: 0.05,
            frame: 1.0 / 60.0,
            duration: 10.0,
            distance: 10.0,
            speed: 3.0,
            seed: 0,
        }
    }
}

impl Config {
    /// Read a configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// Ensure all settings are within range.
    pub fn validate(&self) -> Result<(), Error> {
        self.impairment.validate()?;
        let delay = self.impairment.latency + self.impairment.jitter;
        if delay > MAX_LINK_DELAY {
            return Err(Error::InvalidLinkDelay(delay));
        }
        if !positive(self.send_interval) {
            return Err(Error::InvalidSendInterval(self.send_interval));
        }
        if !positive(self.frame) {
            return Err(Error::InvalidFrame(self.frame));
        }
        if !positive(self.duration) {
            return Err(Error::InvalidDuration(self.duration));
        }
        Ok(())
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

use crate::Snapshot;
use std::fmt;

/// Receives snapshots from the link and keeps statistics about them.
#[derive(Default)]
pub struct Client {
    received: u64,
    out_of_order: u64,
    highest: Option<u64>,
    latest: Option<Snapshot>,

    latency_sum: f64,
    latency_max: f64,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot arriving at local time `now`.
    pub fn receive(&mut self, snapshot: Snapshot, now: f64) {
        self.received += 1;

        let latency = now - snapshot.remote_time;
        self.latency_sum += latency;
        self.latency_max = self.latency_max.max(latency);

        match self.highest {
            Some(highest) if snapshot.sequence < highest => {
                self.out_of_order += 1;
            }
            _ => {
                self.highest = Some(snapshot.sequence);
                self.latest = Some(snapshot);
            }
        }
    }

    /// Newest snapshot received (by sequence).
    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    /// Summarize the run given the number of snapshots the server sent.
    pub fn summary(&self, produced: u64) -> Summary {
        let mean_latency = if self.received == 0 {
            0.0
        } else {
            self.latency_sum / self.received as f64
        };
        Summary {
            produced,
            received: self.received,
            lost: produced.saturating_sub(self.received),
            out_of_order: self.out_of_order,
            mean_latency,
            max_latency: self.latency_max,
        }
    }
}

/// Outcome of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub produced: u64,
    pub received: u64,
    pub lost: u64,
    /// Snapshots that arrived after one with a higher sequence.
    pub out_of_order: u64,
    /// Seconds between sending and receiving, averaged over received snapshots.
    pub mean_latency: f64,
    pub max_latency: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percent = |count: u64| {
            if self.produced == 0 {
                0.0
            } else {
                count as f64 * 100.0 / self.produced as f64
            }
        };
        writeln!(f, "produced:     {}", self.produced)?;
        writeln!(f, "received:     {}", self.received)?;
        writeln!(f, "lost:         {} ({:.1}%)", self.lost, percent(self.lost))?;
        writeln!(
            f,
            "out of order: {} ({:.1}%)",
            self.out_of_order,
            percent(self.out_of_order)
        )?;
        writeln!(f, "mean latency: {:.1}ms", self.mean_latency * 1000.0)?;
        write!(f, "max latency:  {:.1}ms", self.max_latency * 1000.0)
    }
}

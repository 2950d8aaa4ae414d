use crate::Snapshot;

/// Bounce `t` back and forth between `0` and `length`.
///
/// Returns `0` if `length` is not positive.
pub fn ping_pong(t: f64, length: f64) -> f64 {
    if length <= 0.0 {
        return 0.0;
    }
    let cycle = t.rem_euclid(2.0 * length);
    length - (cycle - length).abs()
}

/// Object moving along the x axis that emits snapshots at a fixed interval.
pub struct Server {
    start: [f32; 3],
    distance: f32,
    speed: f32,
    send_interval: f64,

    last_send: Option<f64>,
    sequence: u64,
}

impl Server {
    pub fn new(start: [f32; 3], distance: f32, speed: f32, send_interval: f64) -> Self {
        Self {
            start,
            distance,
            speed,
            send_interval,
            last_send: None,
            sequence: 0,
        }
    }

    /// Position at server time `now`.
    pub fn position(&self, now: f64) -> [f32; 3] {
        let offset = ping_pong(now * self.speed as f64, self.distance as f64) as f32;
        [self.start[0] + offset, self.start[1], self.start[2]]
    }

    /// Returns a snapshot if one is due at `now`.
    ///
    /// The first snapshot is sent immediately, later ones once `send_interval` has elapsed
    /// since the previous one.
    pub fn poll(&mut self, now: f64) -> Option<Snapshot> {
        if let Some(last) = self.last_send {
            if now < last + self.send_interval {
                return None;
            }
        }
        self.last_send = Some(now);
        let snapshot = Snapshot {
            remote_time: now,
            sequence: self.sequence,
            position: self.position(now),
        };
        self.sequence += 1;
        Some(snapshot)
    }

    /// Number of snapshots emitted so far.
    pub fn sent(&self) -> u64 {
        self.sequence
    }
}

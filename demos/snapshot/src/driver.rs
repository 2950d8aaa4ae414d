use crate::{Client, Config, Error, Server, Snapshot, Summary};
use prometheus_client::registry::Registry;
use snapnet_impair::Simulator;
use tracing::{debug, info};

/// Advances the server, the link, and the client one frame at a time.
pub struct Driver {
    config: Config,
    server: Server,
    link: Simulator<Snapshot>,
    client: Client,
    frame: u64,
}

impl Driver {
    /// Create a driver for a validated `config`.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let server = Server::new(
            [0.0; 3],
            config.distance,
            config.speed,
            config.send_interval,
        );
        let link = Simulator::seeded(config.impairment, config.seed)?;
        Ok(Self {
            config,
            server,
            link,
            client: Client::new(),
            frame: 0,
        })
    }

    /// Register the link's metrics with the provided registry.
    pub fn register(&self, registry: &mut Registry) {
        self.link.register(registry);
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Time of the next frame.
    pub fn now(&self) -> f64 {
        self.frame as f64 * self.config.frame
    }

    /// Run one frame: maybe send a snapshot (if `send` is set), then deliver everything due.
    pub fn step(&mut self, send: bool) {
        let now = self.now();
        if send {
            if let Some(snapshot) = self.server.poll(now) {
                self.link.produce(snapshot, now);
            }
        }

        let client = &mut self.client;
        let delivered = self
            .link
            .tick(now, &mut |snapshot: Snapshot| client.receive(snapshot, now));
        if delivered > 0 {
            debug!(now, delivered, pending = self.link.len(), "delivered snapshots");
        }
        self.frame += 1;
    }

    /// Send snapshots for `duration` seconds, then keep ticking until every admitted
    /// snapshot has been delivered.
    pub fn run(mut self) -> Summary {
        while self.now() <= self.config.duration {
            self.step(true);
        }
        let sent = self.server.sent();
        info!(sent, pending = self.link.len(), "finished sending");

        // Skip idle frames: jump to the last frame at or before the next delivery
        while let Some(next) = self.link.next_delivery() {
            let frame = (next / self.config.frame).floor() as u64;
            self.frame = self.frame.max(frame);
            self.step(false);
        }
        self.client.summary(sent)
    }
}

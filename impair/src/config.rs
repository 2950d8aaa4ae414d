use crate::Error;
use serde::{Deserialize, Serialize};

/// Impairments applied by a [crate::Simulator] to every produced payload.
///
/// Durations are in seconds and rates are probabilities in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Fixed one-way delay added to every admitted payload.
    pub latency: f64,

    /// Upper bound (exclusive) of the uniformly random delay added on top of `latency`.
    pub jitter: f64,

    /// Probability that a produced payload is dropped.
    pub loss: f64,

    /// Probability that an admitted payload is inserted at a random queue position
    /// instead of being appended.
    pub scramble: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latency: 0.05,
            jitter: 0.05,
            loss: 0.1,
            scramble: 0.1,
        }
    }
}

impl Config {
    /// A link without any impairment: payloads are delivered on the next tick, in order.
    pub fn ideal() -> Self {
        Self {
            latency: 0.0,
            jitter: 0.0,
            loss: 0.0,
            scramble: 0.0,
        }
    }

    /// Set the fixed one-way delay (seconds).
    pub fn with_latency(mut self, latency: f64) -> Self {
        self.latency = latency;
        self
    }

    /// Set the upper bound of the random extra delay (seconds).
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Set the probability a payload is dropped.
    pub fn with_loss(mut self, loss: f64) -> Self {
        self.loss = loss;
        self
    }

    /// Set the probability a payload is inserted at a random queue position.
    pub fn with_scramble(mut self, scramble: f64) -> Self {
        self.scramble = scramble;
        self
    }

    /// Ensure all settings are within range.
    ///
    /// Out-of-range values are rejected rather than clamped (NaN is always rejected).
    pub fn validate(&self) -> Result<(), Error> {
        if !self.latency.is_finite() || self.latency < 0.0 {
            return Err(Error::InvalidLatency(self.latency));
        }
        if !unit(self.jitter) {
            return Err(Error::InvalidJitter(self.jitter));
        }
        if !unit(self.loss) {
            return Err(Error::InvalidLossRate(self.loss));
        }
        if !unit(self.scramble) {
            return Err(Error::InvalidScrambleRate(self.scramble));
        }
        Ok(())
    }
}

/// Returns true if `value` is within `[0, 1]`.
fn unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
        assert!(Config::ideal().validate().is_ok());
    }

    #[test_case(0.0, 0.0, 0.0, 0.0; "all zero")]
    #[test_case(10.0, 1.0, 1.0, 1.0; "upper bounds")]
    #[test_case(0.25, 0.5, 0.5, 0.5; "midpoints")]
    fn test_valid(latency: f64, jitter: f64, loss: f64, scramble: f64) {
        let config = Config {
            latency,
            jitter,
            loss,
            scramble,
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test_case(Config::ideal().with_latency(-0.01), Error::InvalidLatency(-0.01); "negative latency")]
    #[test_case(Config::ideal().with_latency(f64::INFINITY), Error::InvalidLatency(f64::INFINITY); "infinite latency")]
    #[test_case(Config::ideal().with_jitter(-0.5), Error::InvalidJitter(-0.5); "negative jitter")]
    #[test_case(Config::ideal().with_jitter(1.5), Error::InvalidJitter(1.5); "large jitter")]
    #[test_case(Config::ideal().with_loss(-0.1), Error::InvalidLossRate(-0.1); "negative loss")]
    #[test_case(Config::ideal().with_loss(1.01), Error::InvalidLossRate(1.01); "large loss")]
    #[test_case(Config::ideal().with_scramble(-1.0), Error::InvalidScrambleRate(-1.0); "negative scramble")]
    #[test_case(Config::ideal().with_scramble(2.0), Error::InvalidScrambleRate(2.0); "large scramble")]
    fn test_invalid(config: Config, expected: Error) {
        assert_eq!(config.validate(), Err(expected));
    }

    #[test]
    fn test_nan_rejected() {
        let config = Config::ideal().with_latency(f64::NAN);
        assert!(matches!(config.validate(), Err(Error::InvalidLatency(_))));
        let config = Config::ideal().with_loss(f64::NAN);
        assert!(matches!(config.validate(), Err(Error::InvalidLossRate(_))));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_yaml::from_str("latency: 0.2\nloss: 0.5\n").unwrap();
        assert_eq!(config.latency, 0.2);
        assert_eq!(config.loss, 0.5);

        // Missing fields fall back to defaults
        let defaults = Config::default();
        assert_eq!(config.jitter, defaults.jitter);
        assert_eq!(config.scramble, defaults.scramble);
    }
}

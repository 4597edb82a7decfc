// Sample sources feeding the metric collector
use crate::domain::telemetry::Channel;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("no value available for {0:?}: {1}")]
    Unavailable(Channel, String),
}

/// Produces the next value for a channel.
///
/// Called once per channel per tick from the collector task, so it must not
/// block for long.
pub trait SampleSource: Send + Sync {
    fn sample(&self, channel: Channel) -> Result<f64, SampleError>;
}

impl<F> SampleSource for F
where
    F: Fn(Channel) -> Result<f64, SampleError> + Send + Sync,
{
    fn sample(&self, channel: Channel) -> Result<f64, SampleError> {
        self(channel)
    }
}

/// Uniform random values inside each channel's range, rounded to 2 decimals
pub struct RandomSampler {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl RandomSampler {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for RandomSampler {
    fn sample(&self, channel: Channel) -> Result<f64, SampleError> {
        let range = channel.range();
        let raw = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| SampleError::Unavailable(channel, "random source poisoned".to_string()))?;
            rng.gen_range(range.min..=range.max)
        };
        Ok(round_to_cents(raw).clamp(range.min, range.max))
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_values_stay_in_range() {
        let sampler = RandomSampler::seeded(7);
        for _ in 0..500 {
            for channel in Channel::ALL {
                let value = sampler.sample(channel).unwrap();
                assert!(channel.range().contains(value), "{:?} produced {}", channel, value);
            }
        }
    }

    #[test]
    fn test_random_values_have_two_decimals() {
        let sampler = RandomSampler::seeded(11);
        for _ in 0..100 {
            let value = sampler.sample(Channel::Torque).unwrap();
            let scaled = value * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-6, "{}", value);
        }
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let a = RandomSampler::seeded(3);
        let b = RandomSampler::seeded(3);
        for channel in Channel::ALL {
            assert_eq!(a.sample(channel).unwrap(), b.sample(channel).unwrap());
        }
    }

    #[test]
    fn test_closure_source() {
        let source = |channel: Channel| -> Result<f64, SampleError> {
            match channel {
                Channel::Torque => Err(SampleError::Unavailable(channel, "offline".to_string())),
                _ => Ok(1.0),
            }
        };
        assert_eq!(source.sample(Channel::AirTemperature).unwrap(), 1.0);
        assert!(source.sample(Channel::Torque).is_err());
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(301.23456), 301.23);
        assert_eq!(round_to_cents(301.236), 301.24);
    }
}

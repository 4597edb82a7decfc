use crate::application::collector::{CollectorSettings, MissedSamplePolicy};
use crate::application::sampler::RandomSampler;
use crate::domain::machine::Machine;
use crate::domain::telemetry::DEFAULT_WINDOW_CAPACITY;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MonitorConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub predictor: PredictorSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Supabase,
    #[default]
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub backend: DatabaseBackend,
    pub url: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    /// Catalogue served by the memory backend
    #[serde(default)]
    pub machines: Vec<Machine>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: None,
            api_key: None,
            table: default_table(),
            machines: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CollectorConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub missed_sample: MissedSamplePolicy,
    /// Fixed seed for the simulated sampler; random when unset
    pub seed: Option<u64>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            capacity: default_capacity(),
            missed_sample: MissedSamplePolicy::default(),
            seed: None,
        }
    }
}

impl CollectorConfig {
    pub fn settings(&self) -> CollectorSettings {
        CollectorSettings {
            interval: Duration::from_millis(self.interval_ms),
            capacity: self.capacity,
            missed_sample: self.missed_sample,
        }
    }

    pub fn sampler(&self) -> RandomSampler {
        match self.seed {
            Some(seed) => RandomSampler::seeded(seed),
            None => RandomSampler::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictorSettings {
    #[serde(default = "default_predictor_url")]
    pub url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PredictorSettings {
    fn default() -> Self {
        Self {
            url: default_predictor_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_table() -> String {
    "machines".to_string()
}

fn default_interval_ms() -> u64 {
    2000
}

fn default_capacity() -> usize {
    DEFAULT_WINDOW_CAPACITY
}

fn default_predictor_url() -> String {
    "https://temp-api-url.com/predict".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

/// `config/monitor.toml` (optional) overlaid with `MONITOR__SECTION__KEY` variables
pub fn load_config() -> anyhow::Result<MonitorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/monitor").required(false))
        .add_source(config::Environment::with_prefix("MONITOR").separator("__"))
        .build()?;

    let config: MonitorConfig = settings.try_deserialize()?;
    config.collector.settings().validate()?;
    Ok(config)
}

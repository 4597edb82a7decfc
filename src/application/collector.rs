// Sliding-window metric collector - periodic sampling into bounded per-channel windows
use crate::application::sampler::SampleSource;
use crate::domain::telemetry::{
    Channel, Sample, SharedSnapshot, Snapshot, DEFAULT_WINDOW_CAPACITY, MAX_WINDOW_CAPACITY,
};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Error, PartialEq)]
pub enum CollectorError {
    #[error("sampling interval must be greater than zero")]
    ZeroInterval,
    #[error("at least one channel is required")]
    NoChannels,
    #[error("window capacity must be greater than zero")]
    ZeroCapacity,
    #[error("window capacity {0} exceeds the maximum of {MAX_WINDOW_CAPACITY}")]
    CapacityTooLarge(usize),
}

/// What to record for a channel whose source failed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissedSamplePolicy {
    /// Append the last known value again under the new timestamp
    #[default]
    RepeatLast,
    /// Leave the window untouched for this tick
    Skip,
}

#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub interval: Duration,
    pub capacity: usize,
    pub missed_sample: MissedSamplePolicy,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            capacity: DEFAULT_WINDOW_CAPACITY,
            missed_sample: MissedSamplePolicy::default(),
        }
    }
}

impl CollectorSettings {
    pub fn validate(&self) -> Result<(), CollectorError> {
        if self.interval.is_zero() {
            return Err(CollectorError::ZeroInterval);
        }
        if self.capacity == 0 {
            return Err(CollectorError::ZeroCapacity);
        }
        if self.capacity > MAX_WINDOW_CAPACITY {
            return Err(CollectorError::CapacityTooLarge(self.capacity));
        }
        Ok(())
    }
}

/// Working state owned by one collector task
pub struct CollectorState {
    snapshot: Snapshot,
    missed_sample: MissedSamplePolicy,
}

impl CollectorState {
    pub fn new(
        machine_id: &str,
        channels: &[Channel],
        settings: &CollectorSettings,
    ) -> Result<Self, CollectorError> {
        settings.validate()?;
        if channels.is_empty() {
            return Err(CollectorError::NoChannels);
        }
        Ok(Self {
            snapshot: Snapshot::new(machine_id, channels, settings.capacity),
            missed_sample: settings.missed_sample,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Sample every channel once and return the resulting snapshot
    pub fn tick(&mut self, source: &dyn SampleSource, now: DateTime<Local>) -> Snapshot {
        let time_ms = now.timestamp_millis();
        let label = now.format("%H:%M:%S").to_string();
        self.snapshot.tick += 1;
        let tick = self.snapshot.tick;

        for (channel, window) in self.snapshot.windows.iter_mut() {
            let value = match source.sample(*channel) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(tick, channel = ?channel, error = %e, "sample failed");
                    match self.missed_sample {
                        MissedSamplePolicy::RepeatLast => window.latest().map(|s| s.value),
                        MissedSamplePolicy::Skip => None,
                    }
                }
            };

            if let Some(value) = value {
                window.push(Sample::new(time_ms, label.clone(), value));
            }
        }

        self.snapshot.clone()
    }
}

pub struct MetricCollector;

impl MetricCollector {
    /// Start sampling `channels` every `settings.interval`.
    ///
    /// The first tick runs before this returns, so the handle's snapshot
    /// already holds one sample per channel. Must be called from within a
    /// tokio runtime.
    pub fn start(
        machine_id: &str,
        channels: &[Channel],
        settings: &CollectorSettings,
        source: Arc<dyn SampleSource>,
    ) -> Result<CollectorHandle, CollectorError> {
        let mut state = CollectorState::new(machine_id, channels, settings)?;
        let interval = settings.interval;

        let first = state.tick(source.as_ref(), Local::now());
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(first));
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task_machine = machine_id.to_string();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // Immediate tick; tick 1 was already sampled in `start`
            ticker.tick().await;

            loop {
                tokio::select! {
                    biased;
                    // Fires on an explicit stop and when the handle is dropped
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let snapshot = state.tick(source.as_ref(), Local::now());
                        tracing::debug!(machine = %task_machine, tick = snapshot.tick, "published snapshot");
                        snapshot_tx.send_replace(Arc::new(snapshot));
                    }
                }
            }

            tracing::debug!(machine = %task_machine, "collector task exited");
        });

        tracing::info!(
            machine = %machine_id,
            channels = channels.len(),
            interval_ms = interval.as_millis() as u64,
            "metric collector started"
        );

        Ok(CollectorHandle {
            machine_id: machine_id.to_string(),
            snapshot_rx,
            stop_tx: Some(stop_tx),
            task: Some(task),
        })
    }
}

/// Running collector. Dropping it cancels the timer as well.
pub struct CollectorHandle {
    machine_id: String,
    snapshot_rx: watch::Receiver<SharedSnapshot>,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CollectorHandle {
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SharedSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SharedSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Cancel future ticks and wait for the task to exit.
    ///
    /// Safe to call more than once.
    pub async fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(machine = %self.machine_id, error = %e, "collector task ended abnormally");
            }
            tracing::info!(machine = %self.machine_id, "metric collector stopped");
        }
    }
}

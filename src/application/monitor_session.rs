// Monitoring session - at most one running collector, switched on machine selection
use crate::application::collector::{CollectorError, CollectorHandle, CollectorSettings, MetricCollector};
use crate::application::sampler::SampleSource;
use crate::domain::telemetry::{Channel, SharedSnapshot};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running { machine_id: String },
}

#[derive(Clone)]
pub struct MonitorSession {
    settings: CollectorSettings,
    source: Arc<dyn SampleSource>,
    active: Arc<Mutex<Option<CollectorHandle>>>,
}

impl MonitorSession {
    pub fn new(settings: CollectorSettings, source: Arc<dyn SampleSource>) -> Self {
        Self {
            settings,
            source,
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Start monitoring `machine_id`, tearing down any other running collector first.
    ///
    /// Selecting the machine that is already running keeps its collector.
    pub async fn select(&self, machine_id: &str) -> Result<SharedSnapshot, CollectorError> {
        let mut active = self.active.lock().await;

        if let Some(handle) = active.as_ref() {
            if handle.machine_id() == machine_id && handle.is_running() {
                return Ok(handle.snapshot());
            }
        }

        if let Some(mut previous) = active.take() {
            tracing::info!(from = %previous.machine_id(), to = %machine_id, "switching monitored machine");
            previous.stop().await;
        }

        let handle = MetricCollector::start(machine_id, &Channel::ALL, &self.settings, self.source.clone())?;
        let snapshot = handle.snapshot();
        *active = Some(handle);
        Ok(snapshot)
    }

    /// Stop the running collector. Returns whether one was running.
    pub async fn deselect(&self) -> bool {
        let mut active = self.active.lock().await;
        match active.take() {
            Some(mut handle) => {
                handle.stop().await;
                true
            }
            None => false,
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        match self.active.lock().await.as_ref() {
            Some(handle) => SessionPhase::Running {
                machine_id: handle.machine_id().to_string(),
            },
            None => SessionPhase::Idle,
        }
    }

    pub async fn snapshot(&self) -> Option<SharedSnapshot> {
        self.active.lock().await.as_ref().map(CollectorHandle::snapshot)
    }

    pub async fn subscribe(&self) -> Option<watch::Receiver<SharedSnapshot>> {
        self.active.lock().await.as_ref().map(CollectorHandle::subscribe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sampler::RandomSampler;
    use std::time::Duration;

    fn session() -> MonitorSession {
        let settings = CollectorSettings {
            interval: Duration::from_millis(500),
            ..CollectorSettings::default()
        };
        MonitorSession::new(settings, Arc::new(RandomSampler::seeded(5)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_until_selected() {
        let session = session();
        assert_eq!(session.phase().await, SessionPhase::Idle);
        assert!(session.snapshot().await.is_none());
        assert!(!session.deselect().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_returns_first_tick() {
        let session = session();
        let snapshot = session.select("press-1").await.unwrap();

        assert_eq!(snapshot.machine_id, "press-1");
        assert_eq!(snapshot.tick, 1);
        for channel in Channel::ALL {
            assert_eq!(snapshot.window(channel).unwrap().len(), 1);
            assert!(snapshot.latest(channel).is_some());
        }
        assert_eq!(session.snapshot().await.unwrap().tick, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_machines_stops_previous_collector() {
        let session = session();
        session.select("press-1").await.unwrap();
        let mut old_rx = session.subscribe().await.unwrap();
        old_rx.changed().await.unwrap();

        session.select("lathe-2").await.unwrap();
        assert_eq!(
            session.phase().await,
            SessionPhase::Running {
                machine_id: "lathe-2".to_string()
            }
        );

        // The first collector's sender is gone once it has been torn down
        assert!(old_rx.has_changed().is_err());

        let mut rx = session.subscribe().await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().machine_id, "lathe-2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reselecting_same_machine_keeps_collector() {
        let session = session();
        session.select("press-1").await.unwrap();
        let mut rx = session.subscribe().await.unwrap();
        while rx.borrow_and_update().tick < 3 {
            rx.changed().await.unwrap();
        }

        let snapshot = session.select("press-1").await.unwrap();
        assert!(snapshot.tick >= 3);
        assert!(rx.has_changed().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deselect_returns_to_idle() {
        let session = session();
        session.select("press-1").await.unwrap();
        let rx = session.subscribe().await.unwrap();

        assert!(session.deselect().await);
        assert_eq!(session.phase().await, SessionPhase::Idle);
        assert!(rx.has_changed().is_err());
        assert!(!session.deselect().await);
    }
}

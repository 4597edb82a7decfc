// Telemetry data domain models
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

/// Number of samples kept per channel unless configured otherwise
pub const DEFAULT_WINDOW_CAPACITY: usize = 20;

/// Upper bound for a configured window capacity
pub const MAX_WINDOW_CAPACITY: usize = 10_000;

/// One monitored metric stream of a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    #[serde(rename = "airTemp")]
    AirTemperature,
    #[serde(rename = "processTemp")]
    ProcessTemperature,
    RotationalSpeed,
    Torque,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::AirTemperature,
        Channel::ProcessTemperature,
        Channel::RotationalSpeed,
        Channel::Torque,
    ];

    /// Inclusive generation range for simulated values
    pub fn range(&self) -> ValueRange {
        match self {
            Channel::AirTemperature => ValueRange::new(295.0, 305.0),
            Channel::ProcessTemperature => ValueRange::new(305.0, 315.0),
            Channel::RotationalSpeed => ValueRange::new(1200.0, 1800.0),
            Channel::Torque => ValueRange::new(30.0, 60.0),
        }
    }

    pub fn info(&self) -> ChannelInfo {
        let (title, unit, color) = match self {
            Channel::AirTemperature => ("Air Temperature", "K", "#3b82f6"),
            Channel::ProcessTemperature => ("Process Temperature", "K", "#ef4444"),
            Channel::RotationalSpeed => ("Rotational Speed", "rpm", "#10b981"),
            Channel::Torque => ("Torque", "Nm", "#f59e0b"),
        };
        ChannelInfo {
            channel: *self,
            title,
            unit,
            color,
            range: self.range(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[cfg(test)]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Display metadata for a channel. Not used by the collector.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelInfo {
    pub channel: Channel,
    pub title: &'static str,
    pub unit: &'static str,
    pub color: &'static str,
    pub range: ValueRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub time_ms: i64,
    /// Wall-clock label used as the chart's x axis
    pub time: String,
    pub value: f64,
}

impl Sample {
    pub fn new(time_ms: i64, time: String, value: f64) -> Self {
        Self {
            time_ms,
            time,
            value,
        }
    }
}

/// Bounded FIFO of the most recent samples of one channel
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(MAX_WINDOW_CAPACITY) + 1),
            capacity,
        }
    }

    /// Append at the back, evicting from the front once over capacity
    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    #[cfg(test)]
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Serialize for Window {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Full collector state at one tick.
///
/// Snapshots are published whole; a consumer never sees channels from
/// different ticks side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub machine_id: String,
    pub tick: u64,
    pub windows: BTreeMap<Channel, Window>,
}

pub type SharedSnapshot = Arc<Snapshot>;

impl Snapshot {
    pub fn new(machine_id: impl Into<String>, channels: &[Channel], capacity: usize) -> Self {
        let windows = channels
            .iter()
            .map(|c| (*c, Window::new(capacity)))
            .collect();
        Self {
            machine_id: machine_id.into(),
            tick: 0,
            windows,
        }
    }

    #[cfg(test)]
    pub fn window(&self, channel: Channel) -> Option<&Window> {
        self.windows.get(&channel)
    }

    /// Most recent sample of a channel, `None` while no data has arrived
    pub fn latest(&self, channel: Channel) -> Option<&Sample> {
        self.windows.get(&channel).and_then(Window::latest)
    }

    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.windows.keys().copied()
    }

    /// Current value of every channel; channels without data map to `None`
    pub fn latest_values(&self) -> BTreeMap<Channel, Option<&Sample>> {
        self.channels()
            .map(|channel| (channel, self.latest(channel)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(value: f64) -> Sample {
        Sample::new(value as i64, String::new(), value)
    }

    #[test]
    fn test_window_evicts_oldest_first() {
        let mut window = Window::new(3);
        for v in 1..=5 {
            window.push(sample(v as f64));
        }

        let values: Vec<f64> = window.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![3.0, 4.0, 5.0]);
        assert_eq!(window.oldest().map(|s| s.value), Some(3.0));
        assert_eq!(window.latest().map(|s| s.value), Some(5.0));
    }

    #[test]
    fn test_window_never_exceeds_capacity() {
        let mut window = Window::new(DEFAULT_WINDOW_CAPACITY);
        for v in 0..100 {
            window.push(sample(v as f64));
            assert!(window.len() <= DEFAULT_WINDOW_CAPACITY);
        }
        assert_eq!(window.len(), DEFAULT_WINDOW_CAPACITY);
    }

    #[test]
    fn test_latest_on_empty_snapshot() {
        let snapshot = Snapshot::new("m-1", &Channel::ALL, DEFAULT_WINDOW_CAPACITY);
        assert!(snapshot.latest(Channel::Torque).is_none());
        assert_eq!(snapshot.channels().count(), 4);
    }

    #[test]
    fn test_latest_values_before_and_after_data() {
        let mut snapshot = Snapshot::new("m-1", &Channel::ALL, DEFAULT_WINDOW_CAPACITY);
        let latest = snapshot.latest_values();
        assert_eq!(latest.len(), 4);
        assert!(latest.values().all(Option::is_none));

        let window = snapshot.windows.get_mut(&Channel::Torque).unwrap();
        window.push(sample(41.0));
        window.push(sample(42.5));

        let latest = snapshot.latest_values();
        assert_eq!(latest[&Channel::Torque].map(|s| s.value), Some(42.5));
        assert!(latest[&Channel::AirTemperature].is_none());
    }

    #[test]
    fn test_oversized_capacity_does_not_overflow() {
        let mut window = Window::new(usize::MAX);
        window.push(sample(1.0));
        assert_eq!(window.len(), 1);
        assert!(!window.is_empty());
    }

    #[test]
    fn test_channel_ranges_are_ordered() {
        for channel in Channel::ALL {
            let range = channel.range();
            assert!(range.min < range.max, "{:?}", channel);
        }
    }

    #[test]
    fn test_snapshot_serializes_channel_keys() {
        let mut snapshot = Snapshot::new("m-1", &[Channel::AirTemperature], 2);
        snapshot
            .windows
            .get_mut(&Channel::AirTemperature)
            .unwrap()
            .push(Sample::new(1_000, "12:00:01".to_string(), 300.5));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["machineId"], "m-1");
        assert_eq!(json["windows"]["airTemp"][0]["value"], 300.5);
        assert_eq!(json["windows"]["airTemp"][0]["timeMs"], 1_000);
    }
}

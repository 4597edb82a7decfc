// Machine domain model
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "status_or_unknown")]
    pub status: MachineStatus,
}

// Rows may carry integer or uuid keys
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid machine id: {}", other))),
    }
}

fn status_or_unknown<'de, D>(deserializer: D) -> Result<MachineStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(MachineStatus::from)
        .unwrap_or_default())
}

#[cfg(test)]
impl Machine {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        status: MachineStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            status,
        }
    }
}

/// Operating status as stored in the machines table.
///
/// Any value the dashboard does not know about becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MachineStatus {
    Active,
    Idle,
    Maintenance,
    #[default]
    Unknown,
}

impl From<String> for MachineStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => MachineStatus::Active,
            "idle" => MachineStatus::Idle,
            "maintenance" => MachineStatus::Maintenance,
            _ => MachineStatus::Unknown,
        }
    }
}

impl MachineStatus {
    pub fn badge_color(&self) -> BadgeColor {
        match self {
            MachineStatus::Active => BadgeColor::Green,
            MachineStatus::Idle => BadgeColor::Yellow,
            MachineStatus::Maintenance => BadgeColor::Red,
            MachineStatus::Unknown => BadgeColor::Gray,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Green,
    Yellow,
    Red,
    Gray,
}

/// Result of the machine list query as the list page renders it
#[derive(Debug, Clone, PartialEq)]
pub enum MachineListing {
    Loaded(Vec<Machine>),
    Empty,
    /// The data source could not be reached; rendered like an empty list
    Unavailable(String),
}

impl MachineListing {
    pub fn from_machines(machines: Vec<Machine>) -> Self {
        if machines.is_empty() {
            MachineListing::Empty
        } else {
            MachineListing::Loaded(machines)
        }
    }

    #[cfg(test)]
    pub fn machines(&self) -> &[Machine] {
        match self {
            MachineListing::Loaded(machines) => machines,
            MachineListing::Empty | MachineListing::Unavailable(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_unknown_string() {
        assert_eq!(MachineStatus::from("active".to_string()), MachineStatus::Active);
        assert_eq!(MachineStatus::from("Idle".to_string()), MachineStatus::Idle);
        assert_eq!(MachineStatus::from("offline".to_string()), MachineStatus::Unknown);
        assert_eq!(MachineStatus::from(String::new()), MachineStatus::Unknown);
    }

    #[test]
    fn test_badge_colors() {
        assert_eq!(MachineStatus::Active.badge_color(), BadgeColor::Green);
        assert_eq!(MachineStatus::Idle.badge_color(), BadgeColor::Yellow);
        assert_eq!(MachineStatus::Maintenance.badge_color(), BadgeColor::Red);
        assert_eq!(MachineStatus::Unknown.badge_color(), BadgeColor::Gray);
    }

    #[test]
    fn test_deserialize_machine_row() {
        let row = r#"{"id":"7","name":"Lathe","location":"Hall B","status":"retired","created_at":"2024-01-01"}"#;
        let machine: Machine = serde_json::from_str(row).unwrap();
        assert_eq!(machine.name, "Lathe");
        assert_eq!(machine.status, MachineStatus::Unknown);
    }

    #[test]
    fn test_deserialize_numeric_id_and_null_status() {
        let row = r#"{"id":42,"name":"Press","location":"Hall A","status":null}"#;
        let machine: Machine = serde_json::from_str(row).unwrap();
        assert_eq!(machine.id, "42");
        assert_eq!(machine.status, MachineStatus::Unknown);
    }

    #[test]
    fn test_empty_listing() {
        let listing = MachineListing::from_machines(Vec::new());
        assert_eq!(listing, MachineListing::Empty);
        assert!(listing.machines().is_empty());
    }
}

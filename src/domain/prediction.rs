// Failure prediction domain models
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product quality variant of the machine (low / medium / high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineType {
    L,
    M,
    H,
}

impl MachineType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "L" => Some(MachineType::L),
            "M" => Some(MachineType::M),
            "H" => Some(MachineType::H),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::L => "L",
            MachineType::M => "M",
            MachineType::H => "H",
        }
    }
}

/// Raw form input, exactly as the dialog submits it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionForm {
    pub air_temp: Option<String>,
    pub process_temp: Option<String>,
    pub rotational_speed: Option<String>,
    pub torque: Option<String>,
    #[serde(rename = "type")]
    pub machine_type: Option<String>,
    pub tool_wear: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A validated prediction request
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub air_temp: f64,
    pub process_temp: f64,
    pub rotational_speed: f64,
    pub torque: f64,
    pub machine_type: MachineType,
    pub tool_wear: f64,
}

impl PredictionForm {
    /// Validate every field, collecting all problems instead of stopping at the first
    pub fn validate(&self) -> Result<PredictionRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        let air_temp = numeric_field("airTemp", self.air_temp.as_deref(), &mut errors);
        let process_temp = numeric_field("processTemp", self.process_temp.as_deref(), &mut errors);
        let rotational_speed =
            numeric_field("rotationalSpeed", self.rotational_speed.as_deref(), &mut errors);
        let torque = numeric_field("torque", self.torque.as_deref(), &mut errors);
        let tool_wear = numeric_field("toolWear", self.tool_wear.as_deref(), &mut errors);

        let machine_type = match self.machine_type.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(FieldError {
                    field: "type",
                    message: "required".to_string(),
                });
                None
            }
            Some(raw) => {
                let parsed = MachineType::parse(raw);
                if parsed.is_none() {
                    errors.push(FieldError {
                        field: "type",
                        message: format!("expected one of L, M, H but got '{}'", raw),
                    });
                }
                parsed
            }
        };

        match (air_temp, process_temp, rotational_speed, torque, machine_type, tool_wear) {
            (Some(air_temp), Some(process_temp), Some(rotational_speed), Some(torque), Some(machine_type), Some(tool_wear))
                if errors.is_empty() =>
            {
                Ok(PredictionRequest {
                    air_temp,
                    process_temp,
                    rotational_speed,
                    torque,
                    machine_type,
                    tool_wear,
                })
            }
            _ => Err(errors),
        }
    }
}

fn numeric_field(name: &'static str, raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<f64> {
    let raw = match raw.map(str::trim) {
        None | Some("") => {
            errors.push(FieldError {
                field: name,
                message: "required".to_string(),
            });
            return None;
        }
        Some(raw) => raw,
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            errors.push(FieldError {
                field: name,
                message: format!("'{}' is not a number", raw),
            });
            None
        }
    }
}

/// Answer from the predictor, as the dialog displays it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutcome {
    pub machine_failure: bool,
    pub failure_type: String,
}

impl PredictionOutcome {
    pub fn new(machine_failure: bool, failure_type: impl Into<String>) -> Self {
        Self {
            machine_failure,
            failure_type: failure_type.into(),
        }
    }
}

/// Canned answers used when the remote predictor cannot be reached
pub const FALLBACK_OUTCOMES: [(bool, &str); 5] = [
    (false, "No Failure"),
    (true, "Heat Dissipation Failure"),
    (true, "Power Failure"),
    (true, "Overstrain Failure"),
    (true, "Tool Wear Failure"),
];

/// Where a prediction came from. Both serialize to the same body.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionResult {
    Remote(PredictionOutcome),
    Fallback {
        outcome: PredictionOutcome,
        reason: String,
    },
}

impl PredictionResult {
    pub fn outcome(&self) -> &PredictionOutcome {
        match self {
            PredictionResult::Remote(outcome) => outcome,
            PredictionResult::Fallback { outcome, .. } => outcome,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PredictionResult::Fallback { .. })
    }
}

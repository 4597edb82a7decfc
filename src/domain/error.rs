// Error taxonomy shared by the use cases
use crate::domain::prediction::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("machine '{0}' not found")]
    NotFound(String),

    #[error("data source unavailable: {0}")]
    Transport(String),

    #[error("invalid prediction form: {}", format_fields(.0))]
    Validation(Vec<FieldError>),
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = MonitorError::Validation(vec![
            FieldError {
                field: "torque",
                message: "required".to_string(),
            },
            FieldError {
                field: "type",
                message: "required".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "invalid prediction form: torque: required, type: required"
        );
    }
}

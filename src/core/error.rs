use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid condition '{name}': {reason}")]
    InvalidCondition { name: String, reason: String },

    #[error("Duplicate condition name: {0}")]
    DuplicateCondition(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SimulationError {
    pub fn invalid_input(field: &str, reason: &str) -> Self {
        SimulationError::InvalidInput {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(e: serde_json::Error) -> Self {
        SimulationError::Serialization(e.to_string())
    }
}

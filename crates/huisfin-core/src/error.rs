use thiserror::Error;

#[derive(Debug, Error)]
pub enum HuisfinError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl HuisfinError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        HuisfinError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for HuisfinError {
    fn from(e: serde_json::Error) -> Self {
        HuisfinError::SerializationError(e.to_string())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CyberVarError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CyberVarError {
    fn from(e: serde_json::Error) -> Self {
        CyberVarError::SerializationError(e.to_string())
    }
}

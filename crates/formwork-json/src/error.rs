use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid number: cannot represent {0} as JSON number")]
    InvalidNumber(String),

    #[error("Unsupported value type: {0}")]
    UnsupportedValue(String),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

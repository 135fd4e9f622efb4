use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unknown atmosphere table `{0}`")]
    UnknownTable(String),
    #[error("atmosphere table has no field `{0}`")]
    MissingField(String),
    #[error("field `{field}` is malformed: {reason}")]
    Malformed { field: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

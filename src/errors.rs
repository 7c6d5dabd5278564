use thiserror::Error;
use uuid::Uuid;

/// Error type that captures validation, store, and permission failures.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unknown entry: {0}")]
    UnknownEntry(Uuid),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

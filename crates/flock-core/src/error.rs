//! Error types for the platform-free engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlockError {
    #[error("invalid edits payload: {0}")]
    InvalidPayload(&'static str),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest lists no sprite files")]
    EmptyManifest,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, FlockError>;

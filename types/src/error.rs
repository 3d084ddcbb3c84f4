use thiserror::Error;

/// Validation and lifecycle failures (spec §7). Risk rejections and
/// cancel-of-unknown are deliberately not part of this enum — they are
/// ordinary control flow that produces events, not errors.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("event_type must not be empty")]
    EmptyEventType,

    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    #[error("invalid order book level update: {0}")]
    InvalidLevelUpdate(String),

    #[error("malformed replay row at line {line}: {message}")]
    MalformedReplayRow { line: usize, message: String },

    #[error("unknown run mode: {0}")]
    UnknownRunMode(String),

    #[error("invalid run id: {0}")]
    InvalidRunId(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaqError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session {session_id} has an invalid start time '{start}': {source}")]
    InvalidStart {
        session_id: String,
        start: String,
        #[source]
        source: chrono::ParseError,
    },
}

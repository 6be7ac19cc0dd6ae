//! Domain models: the conference schedule and the FAQ records derived from it.

pub mod conference;
pub mod faq;

pub use conference::{Conference, Event, Room, Session, Speaker};
pub use faq::{Category, FaqEntry};

use crate::error::FaqError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FaqError> {
    let raw = std::fs::read_to_string(path).map_err(|source| FaqError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| FaqError::Json {
        path: path.to_path_buf(),
        source,
    })
}

//! Conference schedule as stored in `conference.json`.

use crate::error::FaqError;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The full schedule: event facts, sessions, speakers and rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conference {
    pub event: Event,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Speaker display names; empty for breaks and registration.
    #[serde(default)]
    pub speakers: Vec<String>,
    /// Room display name.
    pub room: String,
    pub room_id: String,
    /// RFC 3339 start instant, e.g. `2026-01-23T08:15:00Z`.
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speaker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
}

impl Conference {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FaqError> {
        super::read_json(path.as_ref())
    }

    /// Sessions with at least one speaker, in schedule order.
    pub fn real_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(|s| s.is_real())
    }
}

impl Session {
    /// Breaks, lunch and registration carry no speakers.
    pub fn is_real(&self) -> bool {
        !self.speakers.is_empty()
    }

    pub fn start_time(&self) -> Result<DateTime<FixedOffset>, FaqError> {
        DateTime::parse_from_rfc3339(&self.start).map_err(|source| FaqError::InvalidStart {
            session_id: self.id.clone(),
            start: self.start.clone(),
            source,
        })
    }

    /// Date, hour and minute of the start string (`YYYY-MM-DDTHH:MM`).
    /// Sessions sharing a key start together.
    pub fn time_key(&self) -> String {
        self.start.chars().take(16).collect()
    }

    pub fn speaker_list(&self) -> String {
        self.speakers.join(", ")
    }
}

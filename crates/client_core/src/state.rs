use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordStatus {
    /// No fetch has settled yet.
    Loading,
    Success { word: String },
    Error { message: String },
}

/// Everything a rendering surface needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSnapshot {
    pub status: WordStatus,
    pub is_fetching: bool,
    pub history: Vec<String>,
    pub polling_enabled: bool,
    pub poll_interval: Duration,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl WordSnapshot {
    pub fn initial(polling_enabled: bool, poll_interval: Duration) -> Self {
        Self {
            status: WordStatus::Loading,
            is_fetching: false,
            history: Vec::new(),
            polling_enabled,
            poll_interval,
            last_updated_at: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, WordStatus::Loading)
    }

    /// A fetch is in flight while an earlier result is on screen.
    pub fn is_refetching(&self) -> bool {
        self.is_fetching && !self.is_loading()
    }

    pub fn word(&self) -> Option<&str> {
        match &self.status {
            WordStatus::Success { word } => Some(word),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            WordStatus::Error { message } => Some(message),
            _ => None,
        }
    }
}

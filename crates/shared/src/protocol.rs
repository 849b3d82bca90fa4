use serde::{Deserialize, Serialize};

use crate::{domain::is_vocabulary_word, error::ErrorCode};

pub const RANDOM_WORD_ROUTE: &str = "/api/random-word";

/// Body of `GET /api/random-word`. Serialized as `{"word": ..}` or
/// `{"error": ..}`; never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordResponse {
    Word { word: String },
    Error { error: String },
}

impl WordResponse {
    pub fn word(word: impl Into<String>) -> Self {
        Self::Word { word: word.into() }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    pub fn from_code(code: ErrorCode) -> Self {
        Self::error(code.message())
    }

    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word { word } => Some(word),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Word { .. } => None,
            Self::Error { error } => Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn is_vocabulary_word(&self) -> bool {
        self.as_word().is_some_and(is_vocabulary_word)
    }
}

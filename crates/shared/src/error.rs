use serde::{Deserialize, Serialize};

/// Client-side fallback when a failure carries no usable message.
pub const GENERIC_FETCH_ERROR: &str = "Could not fetch a new word. Retrying...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The endpoint chose to fail this request.
    SimulatedFailure,
    /// Something went wrong while producing the word.
    Internal,
}

impl ErrorCode {
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::SimulatedFailure => "Failed to fetch word",
            ErrorCode::Internal => "An unexpected error occurred",
        }
    }

    pub fn status(self) -> u16 {
        match self {
            ErrorCode::SimulatedFailure | ErrorCode::Internal => 500,
        }
    }
}

use shared::error::GENERIC_FETCH_ERROR;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
    #[error("invalid word payload: {0}")]
    Decode(String),
    #[error("word fetch task failed: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Message suitable for direct display; never empty.
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FETCH_ERROR.to_string()
        } else {
            message
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("controller command queue is full; please retry")]
    QueueFull,
    #[error("controller is no longer running")]
    Disconnected,
}

//! Client side of the random word service: a fetch capability, a bounded
//! retry wrapper, and the controller that polls, retries, and keeps a short
//! history for a rendering surface.

pub mod controller;
pub mod error;
pub mod fetch;
pub mod history;
pub mod retry;
pub mod state;

pub use controller::{
    ControllerCommand, ControllerConfig, ControllerHandle, WordDisplayController,
    DEFAULT_POLL_INTERVAL,
};
pub use error::{ControllerError, FetchError};
pub use fetch::{HttpWordFetcher, WordFetcher};
pub use history::{WordHistory, DEFAULT_HISTORY_CAPACITY};
pub use retry::{RetryPolicy, RetryingFetcher};
pub use state::{WordSnapshot, WordStatus};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

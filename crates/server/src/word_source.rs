use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use axum::http::StatusCode;
use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::{
    domain::{word_at, VOCABULARY},
    error::ErrorCode,
    protocol::WordResponse,
};
use thiserror::Error;
use tracing::{debug, error};

/// Source of uniform draws on `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

pub struct StdRandom {
    rng: Mutex<StdRng>,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordSourcePolicy {
    pub min_delay: Duration,
    pub delay_spread_ms: u64,
    pub failure_rate: f64,
}

impl Default for WordSourcePolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(500),
            delay_spread_ms: 1000,
            failure_rate: 0.15,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SourceFault {
    #[error("random draw {0} is outside [0, 1)")]
    InvalidDraw(f64),
    #[error("vocabulary index {0} is out of range")]
    IndexOutOfRange(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordReply {
    pub status: StatusCode,
    pub body: WordResponse,
}

impl WordReply {
    pub fn word(word: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: WordResponse::word(word),
        }
    }

    pub fn failure(code: ErrorCode) -> Self {
        Self {
            status: StatusCode::from_u16(code.status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: WordResponse::from_code(code),
        }
    }
}

#[derive(Clone)]
pub struct WordSource {
    random: Arc<dyn RandomSource>,
    policy: WordSourcePolicy,
}

impl WordSource {
    pub fn new(random: Arc<dyn RandomSource>, policy: WordSourcePolicy) -> Self {
        Self { random, policy }
    }

    pub fn policy(&self) -> WordSourcePolicy {
        self.policy
    }

    /// `min_delay + floor(draw * spread)` milliseconds.
    pub fn delay_for(&self, draw: f64) -> Duration {
        let spread = (draw * self.policy.delay_spread_ms as f64).floor() as u64;
        self.policy.min_delay + Duration::from_millis(spread)
    }

    /// Waits out the simulated latency, then answers with a word or an
    /// error body. Never fails: internal faults become the generic 500.
    pub async fn fetch_word(&self) -> WordReply {
        match self.try_fetch_word().await {
            Ok(reply) => reply,
            Err(fault) => {
                error!(%fault, "unexpected error while producing a random word");
                WordReply::failure(ErrorCode::Internal)
            }
        }
    }

    async fn try_fetch_word(&self) -> Result<WordReply, SourceFault> {
        let delay = self.delay_for(self.draw()?);
        tokio::time::sleep(delay).await;

        if self.draw()? < self.policy.failure_rate {
            debug!(delay_ms = delay.as_millis() as u64, "simulating word fetch failure");
            return Ok(WordReply::failure(ErrorCode::SimulatedFailure));
        }

        let index = (self.draw()? * VOCABULARY.len() as f64).floor() as usize;
        let word = word_at(index).ok_or(SourceFault::IndexOutOfRange(index))?;
        debug!(delay_ms = delay.as_millis() as u64, word, "serving random word");
        Ok(WordReply::word(word))
    }

    fn draw(&self) -> Result<f64, SourceFault> {
        let value = self.random.next_unit();
        if (0.0..1.0).contains(&value) {
            Ok(value)
        } else {
            Err(SourceFault::InvalidDraw(value))
        }
    }
}

#[cfg(test)]
#[path = "tests/word_source_tests.rs"]
mod tests;

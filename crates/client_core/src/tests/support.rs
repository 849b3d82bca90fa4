use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{error::FetchError, fetch::WordFetcher};

/// Plays back queued outcomes, then keeps returning `fallback`.
#[derive(Clone)]
pub(crate) struct ScriptedFetcher {
    outcomes: Arc<Mutex<VecDeque<(Duration, Result<String, FetchError>)>>>,
    fallback: Result<String, FetchError>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    pub(crate) fn new(fallback: Result<String, FetchError>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            fallback,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn always_word(word: &str) -> Self {
        Self::new(Ok(word.to_string()))
    }

    pub(crate) fn push(&self, outcome: Result<String, FetchError>) -> &Self {
        self.push_delayed(Duration::ZERO, outcome)
    }

    pub(crate) fn push_delayed(
        &self,
        delay: Duration,
        outcome: Result<String, FetchError>,
    ) -> &Self {
        self.outcomes
            .lock()
            .expect("outcomes")
            .push_back((delay, outcome));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WordFetcher for ScriptedFetcher {
    async fn fetch_word(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.outcomes.lock().expect("outcomes").pop_front();
        match next {
            Some((delay, outcome)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                outcome
            }
            None => self.fallback.clone(),
        }
    }
}

pub(crate) fn server_error(message: &str) -> FetchError {
    FetchError::Server {
        status: 500,
        message: message.to_string(),
    }
}

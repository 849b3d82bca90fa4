use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::ErrorCode,
    protocol::{WordResponse, RANDOM_WORD_ROUTE},
};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// One attempt at retrieving a word. Retries live in
/// [`crate::retry::RetryingFetcher`], not here.
#[async_trait]
pub trait WordFetcher: Send + Sync {
    async fn fetch_word(&self) -> Result<String, FetchError>;
}

pub struct HttpWordFetcher {
    http: Client,
    endpoint: Url,
}

impl HttpWordFetcher {
    pub fn new(server_url: &Url) -> Result<Self, url::ParseError> {
        Ok(Self::with_client(Client::new(), server_url.join(RANDOM_WORD_ROUTE)?))
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl WordFetcher for HttpWordFetcher {
    async fn fetch_word(&self) -> Result<String, FetchError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let parsed = serde_json::from_slice::<WordResponse>(&bytes);
        debug!(status = status.as_u16(), endpoint = %self.endpoint, "word endpoint answered");

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|body| body.error_message().map(str::to_owned))
                .unwrap_or_else(|| ErrorCode::SimulatedFailure.message().to_string());
            return Err(FetchError::Server {
                status: status.as_u16(),
                message,
            });
        }

        match parsed.map_err(|e| FetchError::Decode(e.to_string()))? {
            WordResponse::Word { word } => Ok(word),
            WordResponse::Error { error } => Err(FetchError::Server {
                status: status.as_u16(),
                message: error,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;

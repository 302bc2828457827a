//! Bounded retry around an [`HttpClient`]

use async_trait::async_trait;
use tracing::{debug, warn};

use super::HttpClient;

/// Message the backend answers with while the caller's bearer token is being
/// refreshed. Requests failing with it are expected to succeed on a retry.
pub const BEARER_TOKEN_AUTHORIZATION_IS_REQUIRED_ERROR_MSG: &str =
    "Bearer Token Authorization is required";

/// Retries after the first attempt: 4 calls at most.
pub const MAX_RETRIES: u32 = 3;

/// Wraps a client and repeats failed GETs, immediately and sequentially,
/// up to [`MAX_RETRIES`] times.
///
/// Every failure is retried. The recoverable message only changes how the
/// retry is reported: a match means the caller is refreshing credentials,
/// anything else is treated as a transient failure. Once the budget is spent
/// the error of the last attempt is returned as-is.
#[derive(Debug, Clone)]
pub struct RetryingClient<C> {
    client: C,
    recoverable_error_message: Option<String>,
}

impl<C: HttpClient> RetryingClient<C> {
    /// Retry every failure as transient
    pub fn new(client: C) -> Self {
        Self {
            client,
            recoverable_error_message: None,
        }
    }

    /// Retry, treating failures carrying `message` as recoverable
    pub fn with_recoverable_error(client: C, message: impl Into<String>) -> Self {
        Self {
            client,
            recoverable_error_message: Some(message.into()),
        }
    }

    /// Wrapped client
    pub fn inner(&self) -> &C {
        &self.client
    }

    pub fn recoverable_error_message(&self) -> Option<&str> {
        self.recoverable_error_message.as_deref()
    }

    fn is_recoverable(&self, error: &C::Error) -> bool {
        self.recoverable_error_message
            .as_deref()
            .is_some_and(|message| error.to_string() == message)
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for RetryingClient<C> {
    type Response = C::Response;
    type Error = C::Error;

    async fn get(&self, url: &str) -> Result<C::Response, C::Error> {
        let mut attempt = 0;

        loop {
            match self.client.get(url).await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    // Don't retry on final attempt
                    if attempt == MAX_RETRIES {
                        debug!(url, attempts = attempt + 1, "giving up: {}", error);
                        return Err(error);
                    }
                    attempt += 1;

                    if self.is_recoverable(&error) {
                        debug!(url, attempt, "waiting for token refresh: {}", error);
                    } else {
                        warn!(url, attempt, "request failed, retrying: {}", error);
                    }
                }
            }
        }
    }
}

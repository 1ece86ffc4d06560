use crate::error::FetchError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Default bound on a single scoreboard request
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin HTTP client for the ESPN scoreboard endpoint.
///
/// Returns raw events; turning them into games is the extractor's job.
#[derive(Clone)]
pub struct EspnClient {
    client: Client,
}

impl std::fmt::Debug for EspnClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EspnClient").finish()
    }
}

impl Default for EspnClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EspnClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_FEED_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Fetch the scoreboard at `url` and return its `events` array.
    pub async fn get_events(&self, url: &str) -> Result<Vec<Value>, FetchError> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        parse_scoreboard(&body)
    }
}

/// Pull the `events` array out of a scoreboard body.
pub fn parse_scoreboard(body: &str) -> Result<Vec<Value>, FetchError> {
    let mut data: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    match data.get_mut("events").map(Value::take) {
        Some(Value::Array(events)) => Ok(events),
        _ => Err(FetchError::MissingEvents),
    }
}

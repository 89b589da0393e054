/// HTTP adapter for the upstream device-data API
use std::time::Duration;

use log::debug;
use url::Url;

use crate::error::FetchError;
use crate::models::FeedResponse;

/// Upper bound on one feed request; an expired fetch skips the tick.
const FETCH_TIMEOUT_SECS: u64 = 5;

pub struct FeedClient {
    client: reqwest::Client,
    url: Url,
}

impl FeedClient {
    pub fn new(url: Url) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, url })
    }

    /// One GET against the configured endpoint. Transport failures, non-2xx
    /// statuses and malformed bodies are all typed fetch errors; the caller
    /// treats any of them as "skip this tick".
    pub async fn fetch(&self) -> Result<FeedResponse, FetchError> {
        debug!("Fetching sensor feed from {}", self.url);

        let response = self.client.get(self.url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<FeedResponse>()
            .await
            .map_err(FetchError::Decode)
    }
}

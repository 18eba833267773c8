//! HTTP client with connection pooling and retry logic

use dqa_config::NetworkConfig;
use dqa_errors::{Error, NetworkError};
use reqwest::{Client, Response};
use std::time::Duration;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub retry_count: u32,
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self::from(&NetworkConfig::default())
    }
}

impl From<&NetworkConfig> for NetConfig {
    fn from(config: &NetworkConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout);
        Self {
            timeout,
            connect_timeout: timeout.min(Duration::from_secs(10)),
            pool_idle_timeout: Duration::from_secs(90),
            retry_count: config.retries,
            retry_delay: Duration::from_millis(config.retry_delay),
            user_agent: format!("dqa/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client wrapper with retry logic
#[derive(Clone, Debug)]
pub struct NetClient {
    client: Client,
    config: NetConfig,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ClientInit(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// POST a JSON body with retries.
    ///
    /// Server errors are retried; the last response is returned whatever its
    /// status, so callers decide how to treat non-success codes.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained after all retry
    /// attempts (timeouts, refused connections, malformed URLs).
    pub async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Response, Error> {
        self.retry_request(|| self.client.post(url).json(body).send())
            .await
    }

    /// Execute a request with retries
    async fn retry_request<F, Fut>(&self, mut f: F) -> Result<Response, Error>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Response, reqwest::Error>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.retry_count {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay * attempt).await;
            }

            match f().await {
                Ok(response) => {
                    if response.status().is_server_error() && attempt < self.config.retry_count {
                        tracing::debug!(
                            status = %response.status(),
                            attempt,
                            "retrying after server error"
                        );
                        continue;
                    }
                    return Ok(response);
                }
                Err(e) => {
                    let retry = Self::should_retry(&e);
                    last_error = Some(e);

                    // Don't retry on certain errors
                    if !retry {
                        break;
                    }
                }
            }
        }

        // Convert the last error
        match last_error {
            Some(e) if e.is_timeout() => Err(NetworkError::Timeout {
                url: e
                    .url()
                    .map(std::string::ToString::to_string)
                    .unwrap_or_default(),
            }
            .into()),
            Some(e) if e.is_connect() => Err(NetworkError::ConnectionRefused(e.to_string()).into()),
            Some(e) if e.is_builder() => Err(NetworkError::InvalidUrl(e.to_string()).into()),
            Some(e) => Err(NetworkError::RequestFailed(e.to_string()).into()),
            None => Err(NetworkError::RequestFailed("Unknown error".to_string()).into()),
        }
    }

    /// Determine if an error should be retried
    fn should_retry(error: &reqwest::Error) -> bool {
        // Retry on timeout, connection errors, and server errors
        !error.is_builder()
            && (error.is_timeout()
                || error.is_connect()
                || error.status().is_none_or(|s| s.is_server_error()))
    }
}

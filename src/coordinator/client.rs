//! Poll client for dashboards and headless consumers
//!
//! Fetches full-state snapshots from the coordinator on a fixed cadence and
//! issues actuator control requests on demand. The poll loop is an explicit
//! loop with capped exponential backoff on transport failure; it never
//! terminates and never lets a failed poll crash the consumer.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::mode::ControlMode;

// ============================================================================
// Client Configuration
// ============================================================================

/// Configuration for the poll client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Coordinator base URL
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Happy-path poll cadence
    pub poll_interval: Duration,

    /// Retry count for control requests
    pub retry_count: u32,

    /// Initial delay after a failed poll
    pub retry_delay: Duration,

    /// Backoff ceiling for repeated poll failures
    pub max_retry_delay: Duration,
}

impl ClientConfig {
    /// Create a new client config
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(2),
            retry_count: 2,
            retry_delay: Duration::from_secs(2),
            max_retry_delay: Duration::from_secs(30),
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set poll cadence
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set retry count for control requests
    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// Full-state snapshot as served by GET /status
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusSnapshot {
    pub light_level: u64,
    pub distance: i64,
    pub temperature: f64,
    pub humidity: f64,
    pub led_status: bool,
    pub fan_speed: i64,
    pub buzzer_status: bool,
}

#[derive(Debug, Deserialize)]
struct LedControlResponse {
    status: String,
    led_status: bool,
}

#[derive(Debug, Deserialize)]
struct FanControlResponse {
    status: String,
    fan_speed: i64,
    mode: ControlMode,
}

#[derive(Debug, Deserialize)]
struct ModeControlResponse {
    #[allow(dead_code)]
    status: String,
    mode: ControlMode,
}

#[derive(Debug, Deserialize)]
struct ModeStatusResponse {
    mode: ControlMode,
}

/// Outcome of a fan control request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanWrite {
    /// Whether the coordinator applied the write
    pub applied: bool,

    /// The speed actually stored after the request
    pub fan_speed: i64,

    /// Mode the coordinator was in when it decided
    pub mode: ControlMode,
}

// ============================================================================
// Poll Client
// ============================================================================

/// Client for polling and controlling the coordinator
pub struct PollClient {
    config: ClientConfig,
    http_client: Client,
}

impl PollClient {
    /// Create a new poll client
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetch the current full-state snapshot
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, ClientError> {
        let url = format!("{}/status", self.config.base_url);
        self.get_json(&url).await
    }

    /// Fetch the coordinator's current control mode
    pub async fn fetch_mode(&self) -> Result<ControlMode, ClientError> {
        let url = format!("{}/mode", self.config.base_url);
        let response: ModeStatusResponse = self.get_json(&url).await?;
        Ok(response.mode)
    }

    /// Switch the LED; returns the state the coordinator stored
    pub async fn set_led(&self, on: bool) -> Result<bool, ClientError> {
        let url = format!("{}/control_led", self.config.base_url);
        let response: LedControlResponse = self
            .post_with_retry(&url, &serde_json::json!({ "status": on }))
            .await?;

        if response.status != "success" {
            return Err(ClientError::InvalidResponse(format!(
                "unexpected led status: {}",
                response.status
            )));
        }
        Ok(response.led_status)
    }

    /// Request a fan speed
    ///
    /// A rejection in AUTOMATIC mode is a defined outcome, not an error;
    /// inspect [`FanWrite::applied`] and [`FanWrite::fan_speed`] for what the
    /// coordinator actually stored.
    pub async fn set_fan(&self, speed: i64) -> Result<FanWrite, ClientError> {
        let url = format!("{}/control_fan", self.config.base_url);
        let response: FanControlResponse = self
            .post_with_retry(&url, &serde_json::json!({ "speed": speed }))
            .await?;

        Ok(FanWrite {
            applied: response.status == "success",
            fan_speed: response.fan_speed,
            mode: response.mode,
        })
    }

    /// Toggle the coordinator's control mode, returning the new mode
    pub async fn toggle_mode(&self) -> Result<ControlMode, ClientError> {
        let url = format!("{}/control_mode", self.config.base_url);
        let response: ModeControlResponse =
            self.post_with_retry(&url, &serde_json::json!({})).await?;
        Ok(response.mode)
    }

    /// Poll the coordinator forever, handing each snapshot to `on_snapshot`
    ///
    /// On transport failure the loop logs, sleeps, and retries with capped
    /// exponential backoff; the backoff resets on the next successful poll.
    /// This never returns; run it under `tokio::select!` with a shutdown
    /// signal.
    pub async fn watch<F>(&self, mut on_snapshot: F)
    where
        F: FnMut(&StatusSnapshot),
    {
        let mut delay = self.config.retry_delay;

        loop {
            match self.fetch_status().await {
                Ok(snapshot) => {
                    on_snapshot(&snapshot);
                    delay = self.config.retry_delay;
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, retry_in_secs = delay.as_secs(), "status poll failed");
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, self.config.max_retry_delay);
                }
            }
        }
    }

    // Internal: single GET request
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Http {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    // Internal: POST request with bounded retry
    async fn post_with_retry<T: Serialize, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<R, ClientError> {
        let mut last_error = None;

        for attempt in 0..=self.config.retry_count {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay).await;
            }

            match self.http_client.post(url).json(body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        match response.json::<R>().await {
                            Ok(data) => return Ok(data),
                            Err(e) => {
                                last_error = Some(ClientError::Parse(e.to_string()));
                            }
                        }
                    } else if response.status().is_client_error() {
                        // Our request is malformed; retrying cannot help.
                        return Err(ClientError::Http {
                            status: response.status().as_u16(),
                            message: response.text().await.unwrap_or_default(),
                        });
                    } else {
                        last_error = Some(ClientError::Http {
                            status: response.status().as_u16(),
                            message: response.text().await.unwrap_or_default(),
                        });
                    }
                }
                Err(e) => {
                    last_error = Some(ClientError::Network(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ClientError::Network("unknown error".to_string())))
    }
}

// ============================================================================
// Client Errors
// ============================================================================

/// Client errors
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("initialization error: {0}")]
    Init(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("http error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Tests
// ============================================================================

//! Webhook HTTP client.
//!
//! Async `reqwest` client that posts one JSON payload per notification.
//! `429 Too Many Requests` is retried indefinitely after the wait the server
//! asks for; every other response status ends delivery. Transport failures
//! are returned to the caller and not retried.

use std::time::Duration;

use craftwatch_protocol::{NotificationMessage, WebhookPayload};
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};

/// Headers consulted for the rate-limit wait hint, in order.
const RETRY_AFTER_HEADERS: [&str; 2] = ["retry-after", "x-ratelimit-reset-after"];

/// Wait used when a 429 carries no usable hint.
const DEFAULT_FALLBACK_WAIT: Duration = Duration::from_secs(1);

/// Per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the webhook client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid webhook URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Client tuning.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Wait before retrying a 429 without a parsable hint.
    pub fallback_wait: Duration,
    /// Per-request timeout; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fallback_wait: DEFAULT_FALLBACK_WAIT,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// Outcome of a delivery that reached the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Final (non-429) status code.
    pub status: u16,
    /// Requests sent, including rate-limited ones.
    pub attempts: u32,
    /// Response body of the final request.
    pub body: String,
}

/// Webhook client bound to a single endpoint.
pub struct Client {
    http: reqwest::Client,
    url: Url,
    fallback_wait: Duration,
}

impl Client {
    /// Creates a client for `url`.
    pub fn new(url: &str, config: ClientConfig) -> Result<Self, Error> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            url: parsed,
            fallback_wait: config.fallback_wait,
        })
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Delivers a notification.
    ///
    /// Rate-limited requests are retried without limit. Any other status,
    /// including 4xx/5xx, is treated as final and returned as a [`Delivery`].
    pub async fn send(&self, message: &NotificationMessage) -> Result<Delivery, Error> {
        let payload = WebhookPayload::from(message);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let resp = self.http.post(self.url.clone()).json(&payload).send().await?;
            let status = resp.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_after(resp.headers(), self.fallback_wait);
                drop(resp);

                tracing::warn!(
                    attempts,
                    wait_secs = wait.as_secs(),
                    title = %message.title,
                    "webhook rate limited, backing off"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            let body = resp.text().await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "can't read webhook response body");
                String::new()
            });

            tracing::info!(
                status = status.as_u16(),
                attempts,
                body = %body,
                "webhook responded"
            );

            return Ok(Delivery {
                status: status.as_u16(),
                attempts,
                body,
            });
        }
    }
}

/// Wait requested by a rate-limited response.
///
/// The hint is a number of seconds, possibly fractional, truncated to whole
/// seconds. Missing, unparsable, or negative hints yield `fallback`.
pub fn retry_after(headers: &HeaderMap, fallback: Duration) -> Duration {
    RETRY_AFTER_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_wait)
        .unwrap_or(fallback)
}

fn parse_wait(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.trim().parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some(Duration::from_secs(secs.trunc() as u64))
}

//! Configuration for the sync client.

use crate::error::{SyncError, SyncResult};
use nightsync_protocol::origin;
use std::time::Duration;
use url::Url;

/// Configuration for a [`NightscoutClient`](crate::NightscoutClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address of the remote store.
    pub url: String,
    /// Shared API secret.
    pub secret: Option<String>,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Retry configuration.
    pub retry: RetryConfig,
    /// Maximum number of glucose entries per fetch.
    pub glucose_count: u32,
    /// Local-origin markers used by fetch filters.
    pub origins: OriginMarkers,
}

impl ClientConfig {
    /// Creates a new client configuration.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret: None,
            timeout: Duration::from_secs(60),
            retry: RetryConfig::default(),
            glucose_count: 1600,
            origins: OriginMarkers::default(),
        }
    }

    /// Sets the API secret. Blank secrets are treated as absent.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.secret = (!secret.trim().is_empty()).then_some(secret);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the glucose fetch limit.
    pub fn with_glucose_count(mut self, count: u32) -> Self {
        self.glucose_count = count;
        self
    }

    /// Sets the local-origin markers.
    pub fn with_origins(mut self, origins: OriginMarkers) -> Self {
        self.origins = origins;
        self
    }

    /// Parses and validates the base address.
    pub fn base_url(&self) -> SyncResult<Url> {
        let url = Url::parse(self.url.trim())
            .map_err(|e| SyncError::MissingUrl(format!("{:?}: {}", self.url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SyncError::MissingUrl(format!(
                "unsupported scheme {:?}",
                url.scheme()
            )));
        }
        if url.host_str().filter(|host| !host.is_empty()).is_none() {
            return Err(SyncError::MissingUrl(format!("{:?} has no host", self.url)));
        }

        Ok(url)
    }
}

/// `enteredBy` values identifying records this app created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginMarkers {
    /// Carb entries recorded through the carb-entry path.
    pub carbs: String,
    /// Treatments uploaded through the generic treatment path.
    pub treatment: String,
    /// Remote-command announcements.
    pub announcement: String,
}

impl Default for OriginMarkers {
    fn default() -> Self {
        Self {
            carbs: origin::CARBS_ENTERED_BY.to_string(),
            treatment: origin::TREATMENT_ENTERED_BY.to_string(),
            announcement: origin::ANNOUNCEMENT_ENTERED_BY.to_string(),
        }
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Creates a new retry configuration with no delay between attempts.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }

    /// Creates a configuration with no retries.
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    /// Sets the initial delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the backoff multiplier.
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculates the delay for a given attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 || self.initial_delay.is_zero() {
            return Duration::ZERO;
        }

        let base_delay = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);

        Duration::from_secs_f64(base_delay.min(self.max_delay.as_secs_f64()))
    }
}

impl Default for RetryConfig {
    /// One retry, i.e. at most two attempts.
    fn default() -> Self {
        Self::new(2)
    }
}

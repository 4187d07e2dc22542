use std::time::Duration;

/// Tunable parameters for journey execution.
///
/// Durations are stored as integers so the struct round-trips through TOML
/// without custom (de)serializers; use the accessor methods to get
/// [`Duration`] values.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TravelConfig {
    /// Interaction attempts allowed per hop before the journey fails.
    pub max_attempts: u32,
    /// Upper bound on how long a hop waits for the location to confirm arrival.
    pub verification_delay_ms: u64,
    /// Interval between location reads while verifying a hop.
    pub verification_poll_ms: u64,
    /// Fixed pause before retrying a failed hop.
    pub retry_backoff_ms: u64,
    /// Wall-clock budget for a whole journey, measured from the request.
    pub timeout_seconds: u64,
    /// Capacity of the travel event broadcast channel.
    pub event_buffer_size: usize,
}

impl TravelConfig {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_VERIFICATION_DELAY_MS: u64 = 2_000;
    pub const DEFAULT_VERIFICATION_POLL_MS: u64 = 500;
    pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1_000;
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            verification_delay_ms: Self::DEFAULT_VERIFICATION_DELAY_MS,
            verification_poll_ms: Self::DEFAULT_VERIFICATION_POLL_MS,
            retry_backoff_ms: Self::DEFAULT_RETRY_BACKOFF_MS,
            timeout_seconds: Self::DEFAULT_TIMEOUT_SECONDS,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER_SIZE,
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_verification_delay(mut self, delay: Duration) -> Self {
        self.verification_delay_ms = duration_to_millis(delay);
        self
    }

    #[must_use]
    pub fn with_verification_poll(mut self, poll: Duration) -> Self {
        self.verification_poll_ms = duration_to_millis(poll);
        self
    }

    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff_ms = duration_to_millis(backoff);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_seconds = timeout.as_secs();
        self
    }

    pub fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }

    /// Poll interval, never longer than the verification delay and never zero.
    pub fn verification_poll(&self) -> Duration {
        let poll = self.verification_poll_ms.clamp(1, self.verification_delay_ms.max(1));
        Duration::from_millis(poll)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = TravelConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.verification_delay(), Duration::from_secs(2));
        assert_eq!(config.retry_backoff(), Duration::from_secs(1));
        assert_eq!(config.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn poll_interval_is_clamped_to_delay() {
        let config = TravelConfig::new()
            .with_verification_delay(Duration::from_millis(200))
            .with_verification_poll(Duration::from_secs(5));
        assert_eq!(config.verification_poll(), Duration::from_millis(200));

        let zero = TravelConfig::new()
            .with_verification_delay(Duration::ZERO)
            .with_verification_poll(Duration::ZERO);
        assert_eq!(zero.verification_poll(), Duration::from_millis(1));
    }
}

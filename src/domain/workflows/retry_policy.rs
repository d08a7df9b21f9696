use time::Duration;

/// Retry policy for async deliveries that can be rescheduled after failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u8,
    pub retry_backoff_seconds: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Return the next backoff delay for a given retry attempt.
    ///
    /// `attempt` is the retry number starting at 1 for the first retry.
    pub fn next_delay(&self, attempt: u8) -> Duration {
        // Step 1: Compute the exponential delay (base * 2^(attempt-1)).
        let attempt = attempt.max(1) as u32;
        let base_ms = self.retry_backoff_seconds.saturating_mul(1_000);
        let raw = base_ms.saturating_mul(2_u64.saturating_pow(attempt - 1));

        // Step 2: Cap at the max delay to avoid unbounded backoff.
        let capped = raw.min(self.max_delay_ms);
        Duration::milliseconds(capped as i64)
    }

    /// Returns `true` when another retry is allowed.
    pub fn can_retry(&self, current_retry_count: u8) -> bool {
        current_retry_count < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_backoff_seconds: 10,
            max_delay_ms: 600_000,
        }
    }
}

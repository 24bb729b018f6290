//! Exponential backoff policy shared by the runtime and the tools.

use crate::constants::retry_defaults;
use backon::ExponentialBuilder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay_secs: u64,
    pub max_delay_secs: u64,
    pub backoff_factor: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: retry_defaults::MAX_RETRIES,
            initial_delay_secs: retry_defaults::INITIAL_DELAY_SECS,
            max_delay_secs: retry_defaults::MAX_DELAY_SECS,
            backoff_factor: retry_defaults::BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    /// No retries at all; useful in tests.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff builder with jitter, for use with `backon::Retryable`.
    pub fn builder(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_secs(self.initial_delay_secs))
            .with_max_delay(Duration::from_secs(self.max_delay_secs))
            .with_factor(self.backoff_factor)
            .with_max_times(self.max_retries as usize)
            .with_jitter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backon::Retryable;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn defaults_match_the_shared_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_delay_secs, 1);
        assert_eq!(policy.max_delay_secs, 60);
    }

    #[tokio::test]
    async fn zero_retries_means_exactly_one_attempt() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), &str> = (|| async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err("always fails")
        })
        .retry(&RetryPolicy::none().builder())
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}

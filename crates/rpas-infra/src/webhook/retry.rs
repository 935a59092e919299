use std::future::Future;
use std::time::Duration;

use super::error::{DeliveryError, DeliveryOperation, NotifyError};

/// Attempt budget and backoff base for one delivery.
///
/// The wait after failed attempt `i` (0-based) is `backoff_base * 2^i`, with no
/// cap and no jitter. No wait follows the last attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
}

impl RetryPolicy {
    /// A budget of 0 is treated as 1.
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt_index))
    }
}

/// Run `attempt` until it succeeds or the budget is spent.
///
/// Attempts are strictly sequential. Every failure is logged as a warning; the
/// last one is returned inside [`NotifyError::Exhausted`].
pub async fn retry_with_backoff<T, F, Fut>(
    operation: DeliveryOperation,
    policy: RetryPolicy,
    mut attempt: F,
) -> Result<T, NotifyError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, DeliveryError>>,
{
    let max_attempts = policy.max_attempts();
    let mut index = 0;

    loop {
        match attempt(index).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    operation = %operation,
                    attempt = index + 1,
                    max_attempts,
                    error = %e,
                    "{} attempt {} failed",
                    operation,
                    index + 1
                );

                if index + 1 >= max_attempts {
                    tracing::error!(
                        operation = %operation,
                        attempts = max_attempts,
                        error = %e,
                        "{} failed, retries exhausted",
                        operation
                    );
                    return Err(NotifyError::Exhausted {
                        operation,
                        attempts: max_attempts,
                        last_error: e,
                    });
                }

                tokio::time::sleep(policy.delay_for(index)).await;
                index += 1;
            }
        }
    }
}

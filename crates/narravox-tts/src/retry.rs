//! Reusable retry policy with exponential backoff.
//!
//! One policy serves every call path that talks to the speech service; the
//! caller supplies a failure classifier so the policy itself stays free of
//! error-type specifics.

use narravox_foundation::RetryConfig;
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Abort immediately, never retry.
    Fatal,
    /// Retry after the long fixed quota wait.
    RateLimited,
    /// Retry with exponential backoff.
    Transient,
}

/// How a retried operation ultimately failed.
#[derive(Debug)]
pub enum RetryError<E> {
    /// A non-retryable failure, surfaced from the attempt it occurred on.
    Fatal(E),
    /// All attempts were consumed by retryable failures.
    Exhausted { attempts: u32, last: E },
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub growth_factor: f64,
    pub quota_delay: Duration,
    pub max_jitter: Duration,
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.clamp(3, 10),
            base_delay: cfg.base_delay,
            growth_factor: cfg.growth_factor,
            quota_delay: cfg.quota_delay,
            max_jitter: cfg.max_jitter,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Wait before retry number `attempt` (1-based) for the given class.
    pub fn backoff_delay(&self, attempt: u32, class: FailureClass) -> Duration {
        match class {
            FailureClass::Fatal => Duration::ZERO,
            FailureClass::RateLimited => self.quota_delay,
            FailureClass::Transient => {
                let grown = self.base_delay.as_millis() as f64
                    * self.growth_factor.powi(attempt.saturating_sub(1) as i32);
                let jitter_ms = if self.max_jitter.is_zero() {
                    0
                } else {
                    rand::thread_rng().gen_range(0..=self.max_jitter.as_millis() as u64)
                };
                Duration::from_millis(grown as u64 + jitter_ms)
            }
        }
    }

    /// Run `op` until it succeeds, a fatal failure occurs, or attempts run out.
    pub async fn run<T, E, Fut>(
        &self,
        classify: impl Fn(&E) -> FailureClass,
        mut op: impl FnMut() -> Fut,
    ) -> Result<T, RetryError<E>>
    where
        E: Display,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let class = classify(&err);
                    if class == FailureClass::Fatal {
                        return Err(RetryError::Fatal(err));
                    }
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last: err,
                        });
                    }
                    let delay = self.backoff_delay(attempt, class);
                    tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, error = %err,
                        "retrying after retryable failure");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

//! Retry policy for catalog requests.
//!
//! Only non-200 responses ([`ScraperError::UnexpectedStatus`]) are retried.
//! Transport failures, malformed bodies, and filesystem errors propagate on
//! the first occurrence.

use std::future::Future;
use std::time::Duration;

use catdump_core::{AppConfig, BackoffKind};

use crate::error::ScraperError;

/// How many times, and how patiently, a request is re-issued.
///
/// The default reproduces the legacy dumper: unlimited attempts with a fixed
/// 500 ms pause between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. `None` retries until success.
    pub max_attempts: Option<u32>,
    /// Delay before the first retry.
    pub delay: Duration,
    pub backoff: BackoffKind,
    /// Upper bound for exponential delays. Ignored by [`BackoffKind::Fixed`].
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            delay: Duration::from_millis(500),
            backoff: BackoffKind::Fixed,
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Retry forever with the same `delay` between attempts.
    #[must_use]
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Fixed-delay policy that gives up after `max_attempts` total attempts.
    #[must_use]
    pub fn bounded(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            delay,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.retry_max_attempts,
            delay: Duration::from_millis(config.retry_delay_ms),
            backoff: config.retry_backoff,
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
        }
    }

    /// Delay to sleep before retry number `retry` (0 = first retry).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        match self.backoff {
            BackoffKind::Fixed => self.delay,
            BackoffKind::Exponential => self
                .delay
                .saturating_mul(1u32 << retry.min(31))
                .min(self.max_delay),
        }
    }
}

fn is_retriable(err: &ScraperError) -> bool {
    matches!(err, ScraperError::UnexpectedStatus { .. })
}

/// Executes `operation` until it succeeds, fails with a non-retriable error,
/// or the policy runs out of attempts.
///
/// Exhaustion is reported as [`ScraperError::RetryExhausted`] wrapping the
/// last status error, so callers can tell "the server kept refusing" apart
/// from a single hard failure.
pub(crate) async fn retry_with_policy<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempts = 0u32;

    loop {
        attempts = attempts.saturating_add(1);
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) => return Err(err),
            Err(err) => err,
        };

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(ScraperError::RetryExhausted {
                attempts,
                source: Box::new(err),
            });
        }

        let delay = policy.delay_for(attempts - 1);
        tracing::warn!(
            attempt = attempts,
            max_attempts = ?policy.max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "request refused, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn refused(status: u16) -> ScraperError {
        ScraperError::UnexpectedStatus {
            status,
            url: "https://example.com/api/".to_owned(),
        }
    }

    #[test]
    fn default_policy_is_unbounded_fixed_half_second() {
        let policy = RetryPolicy::default();
        assert!(policy.max_attempts.is_none());
        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(10), Duration::from_millis(500));
    }

    #[test]
    fn exponential_delay_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: Some(10),
            delay: Duration::from_millis(100),
            backoff: BackoffKind::Exponential,
            max_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3), Duration::from_millis(500));
        assert_eq!(policy.delay_for(40), Duration::from_millis(500));
    }

    #[test]
    fn bounded_never_allows_zero_attempts() {
        assert_eq!(RetryPolicy::bounded(0, Duration::ZERO).max_attempts, Some(1));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_policy(&RetryPolicy::unbounded(Duration::ZERO), || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unbounded_policy_keeps_retrying_any_status() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_policy(&RetryPolicy::unbounded(Duration::ZERO), || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                match n {
                    0..=2 => Err(refused(503)),
                    3..=5 => Err(refused(404)),
                    _ => Ok::<u32, ScraperError>(99),
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn sleeps_between_attempts() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let started = std::time::Instant::now();
        let result = retry_with_policy(&RetryPolicy::unbounded(Duration::from_millis(20)), || {
            let cc = Arc::clone(&cc);
            async move {
                if cc.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(refused(500))
                } else {
                    Ok::<(), ScraperError>(())
                }
            }
        })
        .await;
        assert!(result.is_ok());
        assert!(
            started.elapsed() >= Duration::from_millis(40),
            "two retries should have slept at least 2 x 20ms"
        );
    }

    #[tokio::test]
    async fn bounded_policy_reports_exhaustion() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_policy(&RetryPolicy::bounded(3, Duration::ZERO), || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(refused(502))
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        match result {
            Err(ScraperError::RetryExhausted { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(
                    *source,
                    ScraperError::UnexpectedStatus { status: 502, .. }
                ));
            }
            other => panic!("expected RetryExhausted, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn does_not_retry_deserialize_error() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_policy(&RetryPolicy::unbounded(Duration::ZERO), || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                let e = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
                Err::<u32, ScraperError>(ScraperError::Deserialize {
                    context: "test".to_owned(),
                    source: e,
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::Deserialize { .. })));
    }
}

//! Rate-limit retry policy.
//!
//! A bounded state machine: `Attempt(1) .. Attempt(max)` with doubling
//! backoff between attempts, then a single `Fallback` call when the model that
//! ran out is the primary one, ending in `Succeeded` or `Failed`.

use crate::config::RetryConfig;
use crate::error::PipelineError;
use std::time::Duration;

/// Whether an error is the provider telling us to slow down.
///
/// Classified by HTTP 429 when a status is known, otherwise by the
/// `rate_limit_exceeded` error code some providers put in the body.
pub fn is_rate_limited(error: &PipelineError) -> bool {
    match error {
        PipelineError::Llm {
            status_code,
            message,
        } => *status_code == Some(429) || message.contains("rate_limit_exceeded"),
        _ => false,
    }
}

/// Calculate exponential backoff duration for a given retry index.
///
/// Uses `base_delay * 2^retry` with a cap at 30 seconds.
pub fn backoff_duration(retry: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(retry));
    Duration::from_millis(delay.min(30_000))
}

/// Where a call currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// About to issue (or re-issue) attempt `n` against the requested model (1-based)
    Attempt(u32),
    /// Retries exhausted on the primary model; one call to the fallback model
    Fallback,
    /// Terminal: the last error is returned to the caller
    Failed,
    /// Terminal: the last response is returned to the caller
    Succeeded,
}

impl RetryState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RetryState::Failed | RetryState::Succeeded)
    }
}

/// Retry budget and backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per model, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles afterwards
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
        }
    }

    pub fn start(&self) -> RetryState {
        RetryState::Attempt(1)
    }

    /// Advance the machine with the outcome of the call made in `state`.
    ///
    /// `can_fallback` is true when the model just called is the primary model
    /// and a distinct fallback exists.
    pub fn advance<T>(
        &self,
        state: RetryState,
        outcome: &Result<T, PipelineError>,
        can_fallback: bool,
    ) -> RetryState {
        let error = match outcome {
            Ok(_) => return RetryState::Succeeded,
            Err(e) => e,
        };

        match state {
            RetryState::Attempt(n) if is_rate_limited(error) => {
                if n < self.max_attempts {
                    RetryState::Attempt(n + 1)
                } else if can_fallback {
                    RetryState::Fallback
                } else {
                    RetryState::Failed
                }
            }
            _ => RetryState::Failed,
        }
    }

    /// Delay to wait before issuing attempt `n` (zero for the first).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            Duration::ZERO
        } else {
            backoff_duration(attempt - 2, self.base_delay_ms)
        }
    }

    /// Sum of delays consumed when attempt `n` is the last one issued.
    pub fn total_delay_through(&self, attempt: u32) -> Duration {
        (1..=attempt).map(|n| self.delay_before(n)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rate_limited() -> Result<(), PipelineError> {
        Err(PipelineError::Llm {
            message: "HTTP 429: rate limit exceeded".to_string(),
            status_code: Some(429),
        })
    }

    fn unauthorized() -> Result<(), PipelineError> {
        Err(PipelineError::Llm {
            message: "HTTP 401: invalid_api_key".to_string(),
            status_code: Some(401),
        })
    }

    #[test]
    fn test_rate_limit_by_status() {
        assert!(is_rate_limited(&rate_limited().unwrap_err()));
    }

    #[test]
    fn test_rate_limit_by_error_code() {
        let err = PipelineError::Llm {
            message: "Error code: rate_limit_exceeded".to_string(),
            status_code: None,
        };
        assert!(is_rate_limited(&err));
    }

    #[test]
    fn test_server_error_is_not_rate_limit() {
        let err = PipelineError::Llm {
            message: "HTTP 503: service unavailable".to_string(),
            status_code: Some(503),
        };
        assert!(!is_rate_limited(&err));
    }

    #[test]
    fn test_io_error_is_not_rate_limit() {
        let err = PipelineError::FileNotFound(PathBuf::from("x.jpg"));
        assert!(!is_rate_limited(&err));
    }

    #[test]
    fn test_backoff_doubles_from_base() {
        assert_eq!(backoff_duration(0, 2000), Duration::from_secs(2));
        assert_eq!(backoff_duration(1, 2000), Duration::from_secs(4));
        assert_eq!(backoff_duration(2, 2000), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_capped_at_30s() {
        assert_eq!(backoff_duration(10, 2000), Duration::from_millis(30_000));
    }

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_secs(2));
        assert_eq!(policy.delay_before(3), Duration::from_secs(4));
        assert_eq!(policy.total_delay_through(3), Duration::from_secs(6));
    }

    #[test]
    fn test_success_is_terminal_from_any_state() {
        let policy = RetryPolicy::default();
        for state in [RetryState::Attempt(1), RetryState::Attempt(3), RetryState::Fallback] {
            assert_eq!(policy.advance(state, &Ok::<(), _>(()), true), RetryState::Succeeded);
        }
    }

    #[test]
    fn test_rate_limit_walks_attempts_then_falls_back() {
        let policy = RetryPolicy::default();
        let mut state = policy.start();
        let mut visited = vec![state];
        while !state.is_terminal() && state != RetryState::Fallback {
            state = policy.advance(state, &rate_limited(), true);
            visited.push(state);
        }
        assert_eq!(
            visited,
            vec![
                RetryState::Attempt(1),
                RetryState::Attempt(2),
                RetryState::Attempt(3),
                RetryState::Fallback,
            ]
        );
        assert_eq!(
            policy.advance(RetryState::Fallback, &rate_limited(), true),
            RetryState::Failed
        );
    }

    #[test]
    fn test_exhaustion_without_fallback_fails() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.advance(RetryState::Attempt(3), &rate_limited(), false),
            RetryState::Failed
        );
    }

    #[test]
    fn test_other_errors_fail_immediately() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.advance(RetryState::Attempt(1), &unauthorized(), true),
            RetryState::Failed
        );
    }

    #[test]
    fn test_from_config_clamps_zero_attempts() {
        let policy = RetryPolicy::from_config(&RetryConfig {
            max_attempts: 0,
            base_delay_ms: 5,
        });
        assert_eq!(policy.max_attempts, 1);
    }
}

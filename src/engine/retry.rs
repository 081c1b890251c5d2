// src/engine/retry.rs
//! Bounded/unbounded retry with a fixed backoff.

use std::thread;
use std::time::Duration;

use super::error::CollateError;
use crate::core::DocError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` = retry until it works.
    pub max_attempts: Option<u32>,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn unbounded(backoff: Duration) -> Self {
        Self { max_attempts: None, backoff }
    }

    /// At least one attempt.
    pub const fn capped(max: u32, backoff: Duration) -> Self {
        let max = if max == 0 { 1 } else { max };
        Self { max_attempts: Some(max), backoff }
    }

    /// Keeps the backoff, caps (or re-caps) the attempts.
    pub fn with_cap(self, max: u32) -> Self {
        Self::capped(max, self.backoff)
    }

    /// True once `attempt` attempts have been made and no more are allowed.
    pub fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|m| attempt >= m)
    }

    pub fn pause(&self) {
        if !self.backoff.is_zero() {
            thread::sleep(self.backoff);
        }
    }
}

/// Run `op` until it succeeds, a non-transient error occurs, or the policy runs out.
///
/// `op` receives the 1-based attempt number. On exhaustion the last transient
/// error decides between `ElementNotFound` and `StaleReference`.
pub fn retry<T>(
    policy: &RetryPolicy,
    what: &str,
    mut op: impl FnMut(u32) -> Result<T, DocError>,
) -> Result<T, CollateError> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) if !e.is_transient() => return Err(CollateError::Document(e)),
            Err(e) => {
                if policy.exhausted(attempt) {
                    let what = s!(what);
                    return Err(match e {
                        DocError::StaleReference => CollateError::StaleReference { what, attempts: attempt },
                        _ => CollateError::ElementNotFound { what, attempts: attempt },
                    });
                }
                logd!("{what}: attempt {attempt} failed ({e}); retrying");
                policy.pause();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Query;

    const Q: Query = Query::Css(".nothing");

    #[test]
    fn capped_policy_makes_exactly_n_attempts() {
        let policy = RetryPolicy::capped(4, Duration::ZERO);
        let mut calls = 0;
        let err = retry(&policy, "probe", |_| -> Result<(), _> {
            calls += 1;
            Err(DocError::NotFound(Q))
        })
        .unwrap_err();

        assert_eq!(calls, 4);
        assert!(matches!(err, CollateError::ElementNotFound { attempts: 4, .. }));
    }

    #[test]
    fn stale_exhaustion_is_reported_as_stale() {
        let policy = RetryPolicy::capped(2, Duration::ZERO);
        let err = retry(&policy, "probe", |_| -> Result<(), _> { Err(DocError::StaleReference) })
            .unwrap_err();
        assert!(matches!(err, CollateError::StaleReference { attempts: 2, .. }));
    }

    #[test]
    fn session_errors_are_not_retried() {
        let policy = RetryPolicy::unbounded(Duration::ZERO);
        let mut calls = 0;
        let err = retry(&policy, "probe", |_| -> Result<(), _> {
            calls += 1;
            Err(DocError::Session(s!("browser went away")))
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, CollateError::Document(DocError::Session(_))));
    }

    #[test]
    fn unbounded_keeps_going_until_success() {
        let policy = RetryPolicy::unbounded(Duration::ZERO);
        let got = retry(&policy, "probe", |attempt| {
            if attempt < 250 { Err(DocError::NotFound(Q)) } else { Ok(attempt) }
        })
        .unwrap();
        assert_eq!(got, 250);
    }

    #[test]
    fn zero_cap_still_tries_once() {
        let policy = RetryPolicy::capped(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, Some(1));
        assert!(policy.exhausted(1));
        assert!(!RetryPolicy::unbounded(Duration::ZERO).exhausted(u32::MAX));
    }
}

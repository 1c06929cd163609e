use std::time::Duration;

/// Bounded fixed-delay retry policy for the AI call.
///
/// Strictly sequential: attempt → sleep(delay) → retry. No backoff, no
/// jitter. A run that succeeds on attempt k has slept exactly k−1 times;
/// an exhausted run has made `max_attempts` attempts and slept
/// `max_attempts − 1` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        // A zero budget would never attempt the call at all.
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Zero-delay policy for tests.
    pub fn immediate(max_attempts: usize) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_five_attempts_two_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn zero_attempts_clamps_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[test]
    fn immediate_has_no_delay() {
        let policy = RetryPolicy::immediate(3);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::ZERO);
    }
}

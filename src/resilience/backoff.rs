//! Exponential backoff schedule.

use std::time::Duration;

/// Delay to wait after failed attempt `attempt` (0-indexed) before the next one.
///
/// `base * 2^attempt`: with a 1s base this yields 1s, 2s, 4s, ... Saturates
/// instead of overflowing.
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let base = Duration::from_secs(1);
        assert_eq!(backoff_delay(0, base), Duration::from_secs(1));
        assert_eq!(backoff_delay(1, base), Duration::from_secs(2));
        assert_eq!(backoff_delay(2, base), Duration::from_secs(4));
        assert_eq!(backoff_delay(3, base), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_is_strictly_increasing() {
        let base = Duration::from_millis(10);
        let delays: Vec<_> = (0..6).map(|a| backoff_delay(a, base)).collect();
        assert!(delays.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_backoff_saturates() {
        let max = backoff_delay(64, Duration::from_secs(u64::MAX / 2));
        assert_eq!(max, Duration::MAX);
    }
}

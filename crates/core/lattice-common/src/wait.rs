//! Sleep and polling helpers.

use crate::{LatticeError, LatticeResult};
use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

/// Sleeps for `duration`, returning immediately when it is zero.
pub async fn sleep_if_nonzero(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeps a uniformly random span up to `max`.
pub async fn sleep_random(max: Duration) {
    sleep_random_between(Duration::ZERO, max).await;
}

/// Sleeps a uniformly random span in `[min, max)`. Degenerate ranges sleep
/// `min`.
pub async fn sleep_random_between(min: Duration, max: Duration) {
    let span = if max > min {
        let nanos = rand::thread_rng().gen_range(min.as_nanos()..max.as_nanos());
        Duration::from_nanos(nanos as u64)
    } else {
        min
    };
    sleep_if_nonzero(span).await;
}

/// Polls `condition` every `interval` until it returns true, failing with
/// a timeout error once `timeout` has elapsed.
pub async fn wait_until(
    mut condition: impl FnMut() -> bool,
    timeout: Duration,
    interval: Duration,
) -> LatticeResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(LatticeError::timeout(format!(
                "condition not met within {timeout:?}"
            )));
        }
        sleep_if_nonzero(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_zero_sleep_returns_immediately() {
        let start = std::time::Instant::now();
        sleep_if_nonzero(Duration::ZERO).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_random_sleep_bounded() {
        let start = std::time::Instant::now();
        sleep_random(Duration::from_millis(10)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_degenerate_random_range_sleeps_min() {
        let start = std::time::Instant::now();
        sleep_random_between(Duration::from_millis(1), Duration::from_millis(1)).await;
        assert!(start.elapsed() >= Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_wait_until_succeeds() {
        let polls = AtomicUsize::new(0);
        let result = wait_until(
            || polls.fetch_add(1, Ordering::SeqCst) >= 2,
            Duration::from_secs(1),
            Duration::from_millis(1),
        )
        .await;
        assert!(result.is_ok());
        assert!(polls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_wait_until_times_out() {
        let result = wait_until(
            || false,
            Duration::from_millis(20),
            Duration::from_millis(5),
        )
        .await;
        assert!(matches!(result, Err(LatticeError::Timeout(_))));
    }
}

//! Failure-tolerant execution wrappers.
//!
//! For cleanup paths and background work where a failure must not
//! propagate: the error is handed to a callback (or logged) and execution
//! continues with a fallback value. Disposed-object errors are swallowed
//! without invoking the callback, since tearing down something already
//! torn down is routine during shutdown.

use crate::sync::NamedLock;
use crate::{LatticeError, LatticeResult};
use std::future::Future;
use tracing::warn;

/// Runs `f`, logging any failure and returning `None` in its place.
pub fn catch_err<T>(f: impl FnOnce() -> LatticeResult<T>) -> Option<T> {
    catch_err_with(f, |e| warn!(error = %e, "suppressed error"))
}

/// Runs `f`, handing any failure to `on_error` and returning `None`.
///
/// Disposed errors are swallowed without invoking `on_error`.
pub fn catch_err_with<T>(
    f: impl FnOnce() -> LatticeResult<T>,
    on_error: impl FnOnce(&LatticeError),
) -> Option<T> {
    match f() {
        Ok(value) => Some(value),
        Err(e) => {
            if !e.is_disposed() {
                on_error(&e);
            }
            None
        }
    }
}

/// Runs `f`, returning `fallback` on failure.
pub fn catch_err_or<T>(f: impl FnOnce() -> LatticeResult<T>, fallback: T) -> T {
    catch_err(f).unwrap_or(fallback)
}

/// Runs `f`, reporting whether it succeeded.
pub fn catch_err_bool(f: impl FnOnce() -> LatticeResult<()>) -> bool {
    catch_err(f).is_some()
}

/// Awaits `fut`, logging any failure and returning `None` in its place.
pub async fn catch_err_async<T, F>(fut: F) -> Option<T>
where
    F: Future<Output = LatticeResult<T>>,
{
    catch_err_async_with(fut, |e| warn!(error = %e, "suppressed error")).await
}

/// Awaits `fut`, handing any failure to `on_error` and returning `None`.
///
/// Disposed errors are swallowed without invoking `on_error`.
pub async fn catch_err_async_with<T, F>(fut: F, on_error: impl FnOnce(&LatticeError)) -> Option<T>
where
    F: Future<Output = LatticeResult<T>>,
{
    match fut.await {
        Ok(value) => Some(value),
        Err(e) => {
            if !e.is_disposed() {
                on_error(&e);
            }
            None
        }
    }
}

/// Runs `f` while holding `lock`, logging any failure.
pub fn locked_catch_err<T>(lock: &NamedLock, f: impl FnOnce() -> LatticeResult<T>) -> Option<T> {
    lock.with(|| catch_err(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_catch_err_passes_through_success() {
        assert_eq!(catch_err(|| Ok(7)), Some(7));
    }

    #[test]
    fn test_catch_err_suppresses_failure() {
        let result: Option<i32> = catch_err(|| Err(LatticeError::internal("boom")));
        assert_eq!(result, None);
    }

    #[test]
    fn test_catch_err_with_invokes_callback() {
        let seen = Cell::new(false);
        let _: Option<()> = catch_err_with(
            || Err(LatticeError::internal("boom")),
            |e| {
                seen.set(true);
                assert!(e.to_string().contains("boom"));
            },
        );
        assert!(seen.get());
    }

    #[test]
    fn test_disposed_error_skips_callback() {
        let seen = Cell::new(false);
        let result: Option<()> = catch_err_with(
            || Err(LatticeError::disposed("session")),
            |_| seen.set(true),
        );
        assert_eq!(result, None);
        assert!(!seen.get());
    }

    #[test]
    fn test_catch_err_or_fallback() {
        assert_eq!(catch_err_or(|| Err(LatticeError::internal("boom")), 5), 5);
        assert_eq!(catch_err_or(|| Ok(1), 5), 1);
    }

    #[test]
    fn test_catch_err_bool() {
        assert!(catch_err_bool(|| Ok(())));
        assert!(!catch_err_bool(|| Err(LatticeError::internal("boom"))));
    }

    #[tokio::test]
    async fn test_catch_err_async() {
        assert_eq!(catch_err_async(async { Ok(3) }).await, Some(3));
        let failed: Option<i32> =
            catch_err_async(async { Err(LatticeError::timeout("slow")) }).await;
        assert_eq!(failed, None);
    }

    #[tokio::test]
    async fn test_catch_err_async_disposed_skips_callback() {
        let seen = Cell::new(false);
        let result: Option<()> = catch_err_async_with(
            async { Err(LatticeError::disposed("channel")) },
            |_| seen.set(true),
        )
        .await;
        assert_eq!(result, None);
        assert!(!seen.get());
    }

    #[test]
    fn test_locked_catch_err() {
        let lock = NamedLock::of("exec-test-lock");
        assert_eq!(locked_catch_err(&lock, || Ok(11)), Some(11));
    }
}

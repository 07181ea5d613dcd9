//! Value wrappers with change tracking.
//!
//! [`ObservedValue`] notifies registered listeners when its value actually
//! changes and remembers whether it has drifted from its initial state.
//! [`DelayedValue`] debounces writes: each `set` schedules the update
//! after a delay and cancels the previously pending one, so only the last
//! write in a burst lands.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

type Listener<T> = Box<dyn Fn(&T, &T) + Send + Sync>;

/// A value that notifies listeners on change.
pub struct ObservedValue<T> {
    value: T,
    initial: T,
    listeners: Vec<Listener<T>>,
}

impl<T: Clone + PartialEq> ObservedValue<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self { value: initial.clone(), initial, listeners: Vec::new() }
    }

    /// Registers a listener invoked with `(old, new)` on every effective
    /// change.
    pub fn on_change(&mut self, listener: impl Fn(&T, &T) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Sets the value, notifying listeners. Returns whether the value
    /// actually changed; setting the current value is a no-op.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        let old = std::mem::replace(&mut self.value, value);
        for listener in &self.listeners {
            listener(&old, &self.value);
        }
        true
    }

    /// Sets the value without notifying listeners.
    pub fn set_silent(&mut self, value: T) {
        self.value = value;
    }

    /// Whether the value differs from the initial one.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.value != self.initial
    }

    /// Restores the initial value, notifying listeners if it changed.
    pub fn reset(&mut self) -> bool {
        self.set(self.initial.clone())
    }

    /// Makes the current value the new baseline for [`is_modified`].
    ///
    /// [`is_modified`]: ObservedValue::is_modified
    pub fn accept(&mut self) {
        self.initial = self.value.clone();
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservedValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservedValue")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// A value whose writes land only after a quiet period.
pub struct DelayedValue<T> {
    current: Arc<Mutex<T>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    delay: Duration,
}

impl<T: Clone + Send + 'static> DelayedValue<T> {
    #[must_use]
    pub fn new(initial: T, delay: Duration) -> Self {
        Self { current: Arc::new(Mutex::new(initial)), pending: Mutex::new(None), delay }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.current.lock().clone()
    }

    /// Schedules `value` to be applied after the configured delay,
    /// cancelling any previously pending write. Must be called from within
    /// a tokio runtime.
    pub fn set(&self, value: T) {
        let mut pending = self.pending.lock();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let current = Arc::clone(&self.current);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            *current.lock() = value;
            trace!("delayed value applied");
        }));
    }

    /// Applies `value` immediately, cancelling any pending write.
    pub fn set_now(&self, value: T) {
        self.cancel_pending();
        *self.current.lock() = value;
    }

    /// Drops the pending write, if any.
    pub fn cancel_pending(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }

    /// Whether a scheduled write has not yet landed.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.lock().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for DelayedValue<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_observed_set_notifies() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut value = ObservedValue::new(1);
        let calls_inner = Arc::clone(&calls);
        value.on_change(move |old, new| {
            assert_eq!(*old, 1);
            assert_eq!(*new, 2);
            calls_inner.fetch_add(1, Ordering::SeqCst);
        });

        assert!(value.set(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_observed_same_value_is_noop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut value = ObservedValue::new("a".to_string());
        let calls_inner = Arc::clone(&calls);
        value.on_change(move |_, _| {
            calls_inner.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!value.set("a".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_observed_modification_tracking() {
        let mut value = ObservedValue::new(10);
        assert!(!value.is_modified());
        value.set(11);
        assert!(value.is_modified());
        value.reset();
        assert!(!value.is_modified());
        assert_eq!(*value.get(), 10);
    }

    #[test]
    fn test_observed_accept_rebases() {
        let mut value = ObservedValue::new(1);
        value.set(5);
        value.accept();
        assert!(!value.is_modified());
        value.reset();
        assert_eq!(*value.get(), 5);
    }

    #[test]
    fn test_observed_set_silent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut value = ObservedValue::new(0);
        let calls_inner = Arc::clone(&calls);
        value.on_change(move |_, _| {
            calls_inner.fetch_add(1, Ordering::SeqCst);
        });

        value.set_silent(3);
        assert_eq!(*value.get(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delayed_value_applies_after_delay() {
        let value = DelayedValue::new(0, Duration::from_millis(20));
        value.set(1);
        assert_eq!(value.get(), 0);
        assert!(value.has_pending());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(value.get(), 1);
    }

    #[tokio::test]
    async fn test_delayed_value_debounces() {
        let value = DelayedValue::new(0, Duration::from_millis(40));
        value.set(1);
        tokio::time::sleep(Duration::from_millis(10)).await;
        value.set(2);

        tokio::time::sleep(Duration::from_millis(120)).await;
        // only the last write in the burst lands
        assert_eq!(value.get(), 2);
    }

    #[tokio::test]
    async fn test_delayed_value_set_now_cancels_pending() {
        let value = DelayedValue::new(0, Duration::from_millis(20));
        value.set(1);
        value.set_now(9);
        assert_eq!(value.get(), 9);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(value.get(), 9);
    }

    #[tokio::test]
    async fn test_delayed_value_cancel_pending() {
        let value = DelayedValue::new(0, Duration::from_millis(20));
        value.set(1);
        value.cancel_pending();
        assert!(!value.has_pending());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(value.get(), 0);
    }
}

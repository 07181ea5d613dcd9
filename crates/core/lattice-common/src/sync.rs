//! Process-wide named locks.
//!
//! Locks are registered by name on first use and live for the process
//! lifetime. Enforcement can be toggled globally, which allows turning
//! serialization off in deployments where the callers are known to be
//! single-threaded, while an allowlist keeps selected names enforced and a
//! blocklist disables individual names outright.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

static REGISTRY: Lazy<DashMap<String, Arc<LockEntry>>> = Lazy::new(DashMap::new);
static ENABLED: AtomicBool = AtomicBool::new(true);
static ALLOWLIST: Lazy<RwLock<HashSet<String>>> = Lazy::new(|| RwLock::new(HashSet::new()));
static BLOCKLIST: Lazy<RwLock<HashSet<String>>> = Lazy::new(|| RwLock::new(HashSet::new()));

struct LockEntry {
    mutex: ReentrantMutex<()>,
    acquisitions: AtomicU64,
}

/// A handle to a process-wide lock identified by name.
///
/// Two handles with the same name share the same underlying mutex.
#[derive(Clone)]
pub struct NamedLock {
    name: String,
    entry: Arc<LockEntry>,
}

/// Guard returned by [`NamedLock::acquire`]. When enforcement is off for
/// the lock's name the guard is empty and releases nothing on drop.
pub struct NamedLockGuard<'a> {
    _inner: Option<ReentrantMutexGuard<'a, ()>>,
}

impl NamedLock {
    /// Returns the lock registered under `name`, creating it on first use.
    #[must_use]
    pub fn of(name: impl Into<String>) -> Self {
        let name = name.into();
        let entry = REGISTRY
            .entry(name.clone())
            .or_insert_with(|| {
                Arc::new(LockEntry {
                    mutex: ReentrantMutex::new(()),
                    acquisitions: AtomicU64::new(0),
                })
            })
            .clone();
        Self { name, entry }
    }

    /// The registered name of this lock.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquires the lock, blocking until it is available. The lock is
    /// reentrant: a thread that already holds it may acquire it again.
    /// When enforcement is off for this name the call returns immediately
    /// with an empty guard.
    pub fn acquire(&self) -> NamedLockGuard<'_> {
        if !is_enforced(&self.name) {
            return NamedLockGuard { _inner: None };
        }

        let guard = self.entry.mutex.lock();
        self.entry.acquisitions.fetch_add(1, Ordering::Relaxed);
        debug!(lock = %self.name, "named lock acquired");
        NamedLockGuard { _inner: Some(guard) }
    }

    /// Runs `f` while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.acquire();
        f()
    }

    /// Number of times this lock has actually been acquired. Calls made
    /// while enforcement was off are not counted.
    #[must_use]
    pub fn acquisitions(&self) -> u64 {
        self.entry.acquisitions.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for NamedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedLock")
            .field("name", &self.name)
            .field("acquisitions", &self.acquisitions())
            .finish()
    }
}

/// Whether the lock registered under `name` is currently enforced.
///
/// Blocklisted names are never enforced. Otherwise enforcement follows the
/// global flag, with allowlisted names enforced even while the flag is
/// off.
#[must_use]
pub fn is_enforced(name: &str) -> bool {
    if BLOCKLIST.read().contains(name) {
        return false;
    }
    if ENABLED.load(Ordering::Relaxed) {
        return true;
    }
    ALLOWLIST.read().contains(name)
}

/// Toggles global lock enforcement.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Current state of the global enforcement flag.
#[must_use]
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Keeps `name` enforced even while global enforcement is off.
pub fn allow(name: impl Into<String>) {
    ALLOWLIST.write().insert(name.into());
}

/// Disables enforcement for `name` regardless of the global flag.
pub fn block(name: impl Into<String>) {
    BLOCKLIST.write().insert(name.into());
}

/// Clears the allowlist and blocklist.
pub fn clear_lists() {
    ALLOWLIST.write().clear();
    BLOCKLIST.write().clear();
}

/// One status line per registered lock, sorted by name, followed by dumps
/// of the allowlist and blocklist.
#[must_use]
pub fn status_report() -> Vec<String> {
    let mut lines: Vec<String> = REGISTRY
        .iter()
        .map(|entry| {
            format!(
                "{}: acquisitions={} enforced={}",
                entry.key(),
                entry.value().acquisitions.load(Ordering::Relaxed),
                is_enforced(entry.key()),
            )
        })
        .collect();
    lines.sort();
    lines.push(list_line("allowlist", &ALLOWLIST));
    lines.push(list_line("blocklist", &BLOCKLIST));
    lines
}

fn list_line(label: &str, list: &RwLock<HashSet<String>>) -> String {
    let mut names: Vec<&str> = Vec::new();
    let list = list.read();
    names.extend(list.iter().map(String::as_str));
    names.sort_unstable();
    format!("{label} ({}): {}", names.len(), names.join(", "))
}

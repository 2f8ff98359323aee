//! A source of "now", injected into [`crate::write::WriteEngine`] so that
//! the default timestamp assigned to a write is deterministic in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: std::fmt::Debug + Send + Sync + 'static {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

pub type DynClock = Arc<dyn Clock>;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is set before the unix epoch")
            .as_millis() as u64
    }
}

/// A clock that always returns an explicitly set value. Useful for tests
/// that need to control version ordering without sleeping.
#[derive(Debug)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    pub fn new(timestamp_ms: u64) -> Self {
        Self(AtomicU64::new(timestamp_ms))
    }

    pub fn set(&self, timestamp_ms: u64) {
        self.0.store(timestamp_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

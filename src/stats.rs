/*!
 * Dispatch Statistics
 * Lock-free counters updated from signal-handler context
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of dispatch counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    /// Hang-signal deliveries observed by the dispatch core
    pub received: u64,
    /// Notifications delivered to the listener
    pub notified: u64,
    /// Notifications skipped on a degraded path (no runtime, no listener, attach failure)
    pub notify_skipped: u64,
    /// Deliveries chained to a prior handler
    pub chained: u64,
    /// Deliveries whose prior disposition was default/ignore and was suppressed
    pub suppressed: u64,
}

/// Atomic dispatch statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - Relaxed ordering throughout: counters are diagnostics, not synchronization
#[repr(C, align(64))]
pub(crate) struct AtomicDispatchStats {
    received: AtomicU64,
    notified: AtomicU64,
    notify_skipped: AtomicU64,
    chained: AtomicU64,
    suppressed: AtomicU64,
}

impl AtomicDispatchStats {
    pub const fn new() -> Self {
        Self {
            received: AtomicU64::new(0),
            notified: AtomicU64::new(0),
            notify_skipped: AtomicU64::new(0),
            chained: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        }
    }

    #[inline(always)]
    pub fn inc_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_notified(&self) {
        self.notified.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_notify_skipped(&self) {
        self.notify_skipped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_chained(&self) {
        self.chained.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough snapshot for diagnostics
    pub fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            received: self.received.load(Ordering::Relaxed),
            notified: self.notified.load(Ordering::Relaxed),
            notify_skipped: self.notify_skipped.load(Ordering::Relaxed),
            chained: self.chained.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
        }
    }
}

/*!
 * Listener Registry
 * Owns the single long-lived listener reference between init and teardown
 */

use arc_swap::ArcSwapOption;
use log::debug;
use std::sync::Arc;

/// Receiver of hang notifications.
///
/// `on_hang` runs synchronously on whatever thread the OS interrupted, with
/// the hang signal still on that thread's stack. Implementations must not
/// block, allocate, or panic; anything heavier than handing off to another
/// thread belongs behind [`DeferredListener`](crate::DeferredListener).
pub trait HangListener: Send + Sync {
    /// Zero-argument notification entry point
    fn on_hang(&self);
}

impl<F> HangListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_hang(&self) {
        self()
    }
}

// arc-swap needs a sized pointee
struct Registered {
    listener: Arc<dyn HangListener>,
}

/// Single-slot listener registry.
///
/// The first registration wins and stays in place until [`unregister`]
/// releases it; the dispatch path reads the slot lock-free.
///
/// [`unregister`]: ListenerRegistry::unregister
pub struct ListenerRegistry {
    slot: ArcSwapOption<Registered>,
}

impl ListenerRegistry {
    pub const fn new() -> Self {
        Self {
            slot: ArcSwapOption::const_empty(),
        }
    }

    /// Take ownership of `listener`. Returns whether this call newly
    /// registered it; an occupied slot is left untouched.
    pub fn register(&self, listener: Arc<dyn HangListener>) -> bool {
        if self.slot.load().is_some() {
            debug!("listener already registered, keeping the first");
            return false;
        }
        self.slot.store(Some(Arc::new(Registered { listener })));
        debug!("listener registered");
        true
    }

    /// Release the registered listener; no-op when nothing is registered.
    pub fn unregister(&self) {
        if self.slot.swap(None).is_some() {
            debug!("listener released");
        }
    }

    /// Lock-free load of the current listener
    pub fn current(&self) -> Option<Arc<dyn HangListener>> {
        self.slot.load_full().map(|entry| entry.listener.clone())
    }

    pub fn is_registered(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/*!
 * Registration API
 * Arms and disarms the hang-signal bridge for the embedding application
 */

use crate::chain;
use crate::config::MonitorConfig;
use crate::dispatch::BridgeState;
use crate::registry::HangListener;
use crate::runtime::{Runtime, RuntimeCell};
use crate::stats::DispatchStats;
use crate::types::BridgeResult;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Serializes init/teardown. The dispatch core never takes this lock.
static LIFECYCLE: Mutex<()> = Mutex::new(());

/// Register `listener` and arm the hang-signal handler.
///
/// Idempotent: a second call while armed succeeds without replacing the
/// listener (the first registration wins until [`teardown`]). If the OS
/// rejects the disposition swap the registration is rolled back and the
/// bridge stays fully disarmed; that rejection is the only error this
/// crate surfaces.
pub fn init(
    config: MonitorConfig,
    runtime: Arc<dyn Runtime>,
    listener: Arc<dyn HangListener>,
) -> BridgeResult<()> {
    let _lifecycle = LIFECYCLE.lock();
    let state = BridgeState::global();

    if state.armed.load(Ordering::Acquire) {
        debug!("bridge already armed, keeping existing listener");
        return Ok(());
    }

    // The runtime handle outlives teardown; while disarmed it may be
    // replaced by the next init.
    state.runtime.store(Some(Arc::new(RuntimeCell { runtime })));
    let newly_registered = state.registry.register(listener);

    match chain::install(config.signal) {
        Ok(saved) => {
            state.saved.store(Some(Arc::new(saved)));
            state.armed.store(true, Ordering::Release);
            info!("hang bridge armed on {}", config.signal);
            Ok(())
        }
        Err(err) => {
            if newly_registered {
                state.registry.unregister();
            }
            warn!("hang bridge init failed: {err}");
            Err(err)
        }
    }
}

/// Disarm the bridge: restore the prior disposition exactly, then release
/// the listener. Safe to call when never armed; idempotent.
pub fn teardown() {
    let _lifecycle = LIFECYCLE.lock();
    let state = BridgeState::global();

    if !state.armed.load(Ordering::Acquire) {
        debug!("teardown while disarmed is a no-op");
        return;
    }

    // Restore first so the dispatch core stops running, then release the
    // listener it would have notified.
    if let Some(saved) = state.saved.swap(None) {
        chain::uninstall(&saved);
    }
    state.registry.unregister();
    state.armed.store(false, Ordering::Release);
    info!("hang bridge disarmed");
}

/// Whether the bridge is currently armed
pub fn is_armed() -> bool {
    BridgeState::global().armed.load(Ordering::Acquire)
}

/// Snapshot of the dispatch counters
pub fn stats() -> DispatchStats {
    BridgeState::global().stats.snapshot()
}

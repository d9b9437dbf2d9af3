/*!
 * Signal Dispatch Core
 * Runs on the interrupted thread at signal-delivery time
 */

use crate::registry::ListenerRegistry;
use crate::runtime::{RuntimeBridge, RuntimeCell};
use crate::stats::AtomicDispatchStats;
use crate::types::{Disposition, SavedHandler};
use arc_swap::ArcSwapOption;
use std::sync::atomic::AtomicBool;

/// Process-wide bridge state.
///
/// Written only by `monitor::init`/`monitor::teardown` under the lifecycle
/// lock; between install and uninstall the dispatch path treats it as
/// read-only and reaches every field through an atomic or arc-swap load.
pub(crate) struct BridgeState {
    pub(crate) runtime: ArcSwapOption<RuntimeCell>,
    pub(crate) registry: ListenerRegistry,
    pub(crate) saved: ArcSwapOption<SavedHandler>,
    pub(crate) armed: AtomicBool,
    pub(crate) stats: AtomicDispatchStats,
}

impl BridgeState {
    const fn new() -> Self {
        Self {
            runtime: ArcSwapOption::const_empty(),
            registry: ListenerRegistry::new(),
            saved: ArcSwapOption::const_empty(),
            armed: AtomicBool::new(false),
            stats: AtomicDispatchStats::new(),
        }
    }

    #[inline]
    pub(crate) fn global() -> &'static BridgeState {
        &STATE
    }
}

static STATE: BridgeState = BridgeState::new();

/// Low-level diagnostic marker. `write(2)` is async-signal-safe; `log` is
/// not and stays out of this path.
fn signal_marker() {
    const MARKER: &[u8] = b"hangbridge: hang signal received\n";
    // SAFETY: writes a static buffer to stderr; the result is intentionally
    // ignored, a lost marker must not disturb dispatch.
    unsafe {
        libc::write(libc::STDERR_FILENO, MARKER.as_ptr().cast(), MARKER.len());
    }
}

/// Dispatch routine for the hang signal.
///
/// Notifies the listener through the runtime bridge, then chains to the
/// disposition that was in place before ours, exactly as the OS would have
/// invoked it. Default and ignore dispositions are deliberately not
/// re-raised: the default action of a hang signal terminates the process,
/// and the monitored process must survive long enough for diagnostics to be
/// collected and delivered.
pub(crate) extern "C" fn dispatch_signal(
    signo: libc::c_int,
    info: *mut libc::siginfo_t,
    context: *mut libc::c_void,
) {
    let state = BridgeState::global();
    state.stats.inc_received();
    signal_marker();

    match RuntimeBridge::new(&state.runtime, &state.registry).notify() {
        Ok(()) => state.stats.inc_notified(),
        Err(_) => state.stats.inc_notify_skipped(),
    }

    let saved = state.saved.load_full();
    match saved.as_deref().map(SavedHandler::disposition) {
        Some(Disposition::Extended(handler)) => {
            state.stats.inc_chained();
            handler(signo, info, context);
        }
        Some(Disposition::Simple(handler)) => {
            state.stats.inc_chained();
            handler(signo);
        }
        // Default or ignore would at best do nothing and at worst terminate
        // the process; either way the hang signal ends here.
        Some(Disposition::Default) | Some(Disposition::Ignore) | None => {
            state.stats.inc_suppressed();
        }
    }
}

/*!
 * Handler Chain Manager
 * Installs the dispatch disposition and restores the prior one on teardown
 */

use crate::dispatch;
use crate::types::{BridgeError, BridgeResult, SavedHandler};
use log::{debug, error};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

/// Extended handler form, alternate stack when the interrupted thread has
/// one, restartable syscalls for whatever the signal interrupted.
const DISPATCH_FLAGS: SaFlags = SaFlags::SA_SIGINFO
    .union(SaFlags::SA_ONSTACK)
    .union(SaFlags::SA_RESTART);

/// Swap `signal`'s disposition to the dispatch core, returning the prior
/// disposition captured by the same `sigaction(2)` call.
pub(crate) fn install(signal: Signal) -> BridgeResult<SavedHandler> {
    let action = SigAction::new(
        SigHandler::SigAction(dispatch::dispatch_signal),
        DISPATCH_FLAGS,
        SigSet::empty(),
    );
    // SAFETY: dispatch_signal confines itself to async-signal-safe work plus
    // the documented runtime crossing, and the returned prior action is
    // preserved verbatim for chaining and restore.
    let previous = unsafe { sigaction(signal, &action) }.map_err(|errno| {
        error!("failed to install {signal} disposition: {errno}");
        BridgeError::InstallFailed { signal, errno }
    })?;
    debug!("installed {signal} dispatch handler");
    Ok(SavedHandler::new(signal, previous))
}

/// Restore a saved disposition exactly (handler pointer, flags, mask).
///
/// Failures are logged and swallowed; teardown must not leave the bridge
/// half-armed over an errno.
pub(crate) fn uninstall(saved: &SavedHandler) {
    // SAFETY: restores the exact action captured at install time.
    match unsafe { sigaction(saved.signal(), saved.raw()) } {
        Ok(_) => debug!("restored prior {} disposition", saved.signal()),
        Err(errno) => error!("failed to restore {} disposition: {errno}", saved.signal()),
    }
}

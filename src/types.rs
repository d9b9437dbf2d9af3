/*!
 * Bridge Types
 * Error, result, and saved-disposition types shared across the bridge
 */

use libc::{c_int, c_void, siginfo_t};
use nix::sys::signal::{SigAction, SigHandler, Signal};
use std::fmt;
use thiserror::Error;

/// Bridge operation result
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge errors
///
/// Only [`BridgeError::InstallFailed`] is ever surfaced to a caller; every
/// other variant is recovered where it occurs and degrades to "notification
/// not delivered" plus a log line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("managed runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("failed to attach thread to managed runtime: {0}")]
    AttachFailed(String),

    #[error("no listener registered")]
    ListenerMissing,

    #[error("failed to install disposition for {signal}: {errno}")]
    InstallFailed { signal: Signal, errno: nix::Error },

    #[error("listener notification entry point unresolved: {0}")]
    EntryPointUnresolved(String),
}

/// Chaining form of a saved signal disposition.
///
/// The dispatch core re-invokes `Simple` and `Extended` handlers exactly as
/// the OS would have; `Default` and `Ignore` are never re-raised, since the
/// default action of a hang signal would terminate the process before
/// diagnostics are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// OS default action
    Default,
    /// Signal was ignored
    Ignore,
    /// Plain handler taking only the signal number
    Simple(extern "C" fn(c_int)),
    /// `SA_SIGINFO` handler taking signal number, info, and machine context
    Extended(extern "C" fn(c_int, *mut siginfo_t, *mut c_void)),
}

/// Prior disposition captured by the same `sigaction(2)` call that installed
/// the dispatch handler. The raw action (handler pointer, flags, mask) is
/// kept verbatim so teardown restores it exactly.
#[derive(Clone, Copy)]
pub struct SavedHandler {
    signal: Signal,
    raw: SigAction,
}

impl SavedHandler {
    pub fn new(signal: Signal, raw: SigAction) -> Self {
        Self { signal, raw }
    }

    /// Signal this disposition belongs to
    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub(crate) fn raw(&self) -> &SigAction {
        &self.raw
    }

    /// Classify the saved action for chaining
    pub fn disposition(&self) -> Disposition {
        match self.raw.handler() {
            SigHandler::SigDfl => Disposition::Default,
            SigHandler::SigIgn => Disposition::Ignore,
            SigHandler::Handler(handler) => Disposition::Simple(handler),
            SigHandler::SigAction(handler) => Disposition::Extended(handler),
        }
    }
}

impl fmt::Debug for SavedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedHandler")
            .field("signal", &self.signal)
            .field("disposition", &self.disposition())
            .finish()
    }
}

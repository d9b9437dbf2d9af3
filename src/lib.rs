/*!
 * Hangbridge Library
 * Hang-signal interception and dispatch bridge for embedded-runtime processes
 *
 * Claims the OS hang-diagnostic signal (SIGQUIT by convention), notifies a
 * listener living in the managed runtime that embeds this process, then
 * chains to whatever disposition was installed before so that coexisting
 * diagnostic tools keep working. Unix only.
 */

mod chain;
mod dispatch;

pub mod config;
pub mod deferred;
pub mod monitor;
pub mod registry;
pub mod runtime;
pub mod stats;
pub mod types;

// Re-export public API
pub use config::MonitorConfig;
pub use deferred::DeferredListener;
pub use monitor::{init, is_armed, teardown};
pub use nix::sys::signal::Signal;
pub use registry::{HangListener, ListenerRegistry};
pub use runtime::{AttachGuard, ProcessRuntime, Runtime};
pub use stats::DispatchStats;
pub use types::{BridgeError, BridgeResult, Disposition, SavedHandler};

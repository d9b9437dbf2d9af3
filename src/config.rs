/*!
 * Monitor Configuration
 * Selects the hang-diagnostic signal the bridge claims
 */

use nix::sys::signal::Signal;

/// Bridge configuration.
///
/// The signal is negotiable: `SIGQUIT` is the conventional choice on
/// platforms where an external watchdog requests a diagnostic dump from an
/// unresponsive process, but an embedder may point the bridge at any
/// catchable signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Signal whose disposition the bridge claims while armed
    pub signal: Signal,
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self {
            signal: Signal::SIGQUIT,
        }
    }

    /// Use a different hang-diagnostic signal
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = signal;
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}

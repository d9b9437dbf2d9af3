/*!
 * Process Runtime Bridge
 * Attach/detach of interrupted threads to the embedding managed runtime
 */

use crate::registry::ListenerRegistry;
use crate::types::{BridgeError, BridgeResult};
use arc_swap::ArcSwapOption;
use log::warn;
use std::sync::Arc;

/// Handle to the managed execution environment embedding this process.
///
/// Implementations wrap whatever lets a native thread call into the runtime
/// (a VM invocation interface, a scripting-engine context). All three
/// methods are called from signal-handler context on an arbitrary
/// interrupted thread; implementations must confine themselves to
/// async-signal-safe work or accept the risk their embedding documents.
///
/// An implementation whose callback routing can fail (a proxy object the
/// runtime dropped, an entry point that no longer resolves) should report
/// that from [`attach`](Runtime::attach) as
/// [`BridgeError::EntryPointUnresolved`]; the notification is then skipped
/// without affecting handler chaining.
pub trait Runtime: Send + Sync {
    /// Whether the calling thread is already associated with the runtime
    fn is_attached(&self) -> bool;

    /// Associate the calling thread with the runtime
    fn attach(&self) -> BridgeResult<()>;

    /// Drop the calling thread's association
    fn detach(&self);
}

/// Host-process runtime for embeddings with no managed VM in between.
/// Every thread counts as attached; attach and detach are no-ops.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRuntime;

impl Runtime for ProcessRuntime {
    fn is_attached(&self) -> bool {
        true
    }

    fn attach(&self) -> BridgeResult<()> {
        Ok(())
    }

    fn detach(&self) {}
}

/// Scoped runtime-thread association.
///
/// Detach runs on every exit path via `Drop`; a thread that was already
/// attached when the guard was acquired is left attached.
pub struct AttachGuard<'r> {
    runtime: &'r dyn Runtime,
    owns_attachment: bool,
}

impl<'r> AttachGuard<'r> {
    pub fn acquire(runtime: &'r dyn Runtime) -> BridgeResult<Self> {
        if runtime.is_attached() {
            return Ok(Self {
                runtime,
                owns_attachment: false,
            });
        }
        runtime.attach()?;
        Ok(Self {
            runtime,
            owns_attachment: true,
        })
    }
}

impl Drop for AttachGuard<'_> {
    fn drop(&mut self) {
        if self.owns_attachment {
            self.runtime.detach();
        }
    }
}

// arc-swap needs a sized pointee
pub(crate) struct RuntimeCell {
    pub(crate) runtime: Arc<dyn Runtime>,
}

/// Notification path across the native/runtime boundary: resolve the runtime
/// handle and the listener, attach the calling thread, invoke, detach.
pub(crate) struct RuntimeBridge<'a> {
    runtime: &'a ArcSwapOption<RuntimeCell>,
    registry: &'a ListenerRegistry,
}

impl<'a> RuntimeBridge<'a> {
    pub(crate) fn new(
        runtime: &'a ArcSwapOption<RuntimeCell>,
        registry: &'a ListenerRegistry,
    ) -> Self {
        Self { runtime, registry }
    }

    /// Deliver one zero-argument notification to the registered listener.
    ///
    /// No failure propagates past this function: every degraded path logs,
    /// returns `Err` for the caller's counters, and leaves no thread
    /// attached that this call attached.
    pub(crate) fn notify(&self) -> BridgeResult<()> {
        let Some(cell) = self.runtime.load_full() else {
            warn!("hang notification skipped: managed runtime unavailable");
            return Err(BridgeError::RuntimeUnavailable(
                "no runtime handle".into(),
            ));
        };
        let Some(listener) = self.registry.current() else {
            warn!("hang notification skipped: no listener registered");
            return Err(BridgeError::ListenerMissing);
        };
        let _attachment = match AttachGuard::acquire(cell.runtime.as_ref()) {
            Ok(guard) => guard,
            Err(err) => {
                warn!("hang notification skipped: {err}");
                return Err(err);
            }
        };
        listener.on_hang();
        Ok(())
    }
}

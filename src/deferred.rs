/*!
 * Deferred Listener
 * Self-pipe hand-off from signal context to a dedicated notifier thread
 */

use crate::registry::HangListener;
use log::{debug, error, warn};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

/// Listener adapter that runs the real callback outside signal context.
///
/// The in-context step of `on_hang` is a single nonblocking `write(2)` on a
/// private pipe, the only async-signal-safe part; a dedicated notifier
/// thread blocks on the read end and invokes the callback once per wakeup.
/// Dropping the adapter closes the write end and joins the thread.
pub struct DeferredListener {
    write_fd: libc::c_int,
    dropped: AtomicU64,
    worker: Option<JoinHandle<()>>,
}

impl DeferredListener {
    /// Spawn the notifier thread around `callback`.
    pub fn spawn<F>(callback: F) -> io::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let mut fds: [libc::c_int; 2] = [0; 2];
        // SAFETY: plain pipe(2) into a stack buffer.
        if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let (read_fd, write_fd) = (fds[0], fds[1]);

        // Close-on-exec for both ends; nonblocking write end so a full pipe
        // drops the wakeup instead of stalling the interrupted thread.
        // SAFETY: fcntl on the fds created above.
        unsafe {
            libc::fcntl(read_fd, libc::F_SETFD, libc::FD_CLOEXEC);
            libc::fcntl(write_fd, libc::F_SETFD, libc::FD_CLOEXEC);
            let flags = libc::fcntl(write_fd, libc::F_GETFL);
            libc::fcntl(write_fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
        }

        let worker = std::thread::Builder::new()
            .name("hang-notifier".into())
            .spawn(move || notifier_loop(read_fd, callback))
            .map_err(|err| {
                // SAFETY: the fds are ours and unused past this point.
                unsafe {
                    libc::close(read_fd);
                    libc::close(write_fd);
                }
                err
            })?;

        Ok(Self {
            write_fd,
            dropped: AtomicU64::new(0),
            worker: Some(worker),
        })
    }

    /// Wakeups dropped because the pipe was full or closing down
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

fn notifier_loop<F: Fn()>(read_fd: libc::c_int, callback: F) {
    debug!("hang notifier thread started");
    let mut byte = 0u8;
    loop {
        // SAFETY: blocking one-byte read on the pipe's read end, owned by
        // this thread.
        let n = unsafe { libc::read(read_fd, (&mut byte as *mut u8).cast(), 1) };
        match n {
            1.. => callback(),
            // Write end closed
            0 => break,
            _ => {
                let err = io::Error::last_os_error();
                if err.raw_os_error() == Some(libc::EINTR) {
                    continue;
                }
                error!("hang notifier read failed: {err}");
                break;
            }
        }
    }
    // SAFETY: this thread owns the read end.
    unsafe {
        libc::close(read_fd);
    }
    debug!("hang notifier thread stopped");
}

impl HangListener for DeferredListener {
    fn on_hang(&self) {
        // SAFETY: single-byte write on a nonblocking pipe; async-signal-safe.
        let n = unsafe { libc::write(self.write_fd, b"!".as_ptr().cast(), 1) };
        if n != 1 {
            // Counting is all that is safe to do here.
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Drop for DeferredListener {
    fn drop(&mut self) {
        // SAFETY: closing the write end delivers EOF to the notifier.
        unsafe {
            libc::close(self.write_fd);
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("hang notifier thread panicked");
            }
        }
    }
}

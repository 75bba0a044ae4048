// SPDX-License-Identifier: MPL-2.0
//! Console output suppression around native engine calls.
//!
//! The engine prints device probing and progress noise straight to file
//! descriptors 1 and 2, bypassing Rust's `std::io` handles. [`OutputSuppressor`]
//! points both descriptors at the null device while it is alive and puts the
//! originals back when it drops, whether the wrapped call returned, failed or
//! panicked.
//!
//! # Thread Safety
//!
//! The descriptors are process-wide. Engagements are serialized through a
//! global lock so two threads can never interleave their save/restore pairs,
//! but anything the process writes while a guard is alive is discarded.
//! Guards must not be nested on the same thread.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

static SUPPRESS_LOCK: Mutex<()> = Mutex::new(());

fn lock_descriptors() -> MutexGuard<'static, ()> {
    SUPPRESS_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scoped redirection of stdout/stderr to the null device.
#[must_use = "output is only suppressed while the guard is alive"]
pub struct OutputSuppressor {
    #[cfg(unix)]
    saved: Option<unix::SavedDescriptors>,
    // Dropped after `Drop::drop` has restored the descriptors.
    _lock: MutexGuard<'static, ()>,
}

impl OutputSuppressor {
    /// Redirects descriptors 1 and 2 to the null device.
    ///
    /// Blocks while another guard is alive.
    ///
    /// # Errors
    ///
    /// Returns an error if the null device cannot be opened or a descriptor
    /// cannot be duplicated. Nothing is redirected in that case.
    pub fn engage() -> io::Result<Self> {
        let lock = lock_descriptors();
        flush_std_handles();
        Ok(Self {
            #[cfg(unix)]
            saved: Some(unix::SavedDescriptors::redirect_to_null()?),
            _lock: lock,
        })
    }
}

impl Drop for OutputSuppressor {
    fn drop(&mut self) {
        flush_std_handles();
        #[cfg(unix)]
        if let Some(saved) = self.saved.take() {
            saved.restore();
        }
    }
}

fn flush_std_handles() {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
}

/// Runs `call` under an [`OutputSuppressor`].
///
/// If suppression cannot be set up the call still runs, unsuppressed.
pub fn suppress_output<T>(call: impl FnOnce() -> T) -> T {
    match OutputSuppressor::engage() {
        Ok(_guard) => call(),
        Err(err) => {
            log::debug!("Output suppression unavailable: {err}");
            call()
        }
    }
}

#[cfg(unix)]
mod unix {
    use std::fs::OpenOptions;
    use std::io;
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

    const STDOUT_FD: RawFd = 1;
    const STDERR_FD: RawFd = 2;

    /// Duplicates of the original stdout/stderr descriptors.
    pub(super) struct SavedDescriptors {
        stdout: OwnedFd,
        stderr: OwnedFd,
    }

    fn dup(fd: RawFd) -> io::Result<OwnedFd> {
        // SAFETY: dup has no memory-safety preconditions; a non-negative
        // return is a fresh descriptor we exclusively own.
        let duplicated = unsafe { libc::dup(fd) };
        if duplicated < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: `duplicated` is valid and not owned elsewhere.
        Ok(unsafe { OwnedFd::from_raw_fd(duplicated) })
    }

    fn dup2(source: RawFd, target: RawFd) -> io::Result<()> {
        // SAFETY: both descriptors are open for the duration of the call.
        if unsafe { libc::dup2(source, target) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    impl SavedDescriptors {
        pub(super) fn redirect_to_null() -> io::Result<Self> {
            let null = OpenOptions::new().write(true).open("/dev/null")?;
            let saved = Self {
                stdout: dup(STDOUT_FD)?,
                stderr: dup(STDERR_FD)?,
            };
            if let Err(err) = dup2(null.as_raw_fd(), STDOUT_FD)
                .and_then(|()| dup2(null.as_raw_fd(), STDERR_FD))
            {
                saved.restore();
                return Err(err);
            }
            Ok(saved)
        }

        pub(super) fn restore(&self) {
            // Nothing sensible to report to if this fails: stderr is what
            // we are trying to restore.
            let _ = dup2(self.stdout.as_raw_fd(), STDOUT_FD);
            let _ = dup2(self.stderr.as_raw_fd(), STDERR_FD);
        }
    }
}

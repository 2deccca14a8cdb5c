// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Counting wake signal backed by a semaphore-mode `eventfd`.
//!
//! Every [`EventFd::notify`] adds one token; every read removes exactly one.
//! The descriptor stays readable while tokens remain, so one notification maps
//! to one dispatched event.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use super::source::{consume_token, SourceHandle};

const EVENTFD_FLAGS: libc::c_int = libc::EFD_NONBLOCK | libc::EFD_CLOEXEC | libc::EFD_SEMAPHORE;

/// Semaphore-mode eventfd.
#[derive(Debug)]
pub struct EventFd {
    fd: OwnedFd,
}

impl EventFd {
    /// Create a new signal with zero pending tokens.
    pub fn new() -> io::Result<Self> {
        // SAFETY: eventfd is invoked with valid flags and no shared state.
        let fd = unsafe { libc::eventfd(0, EVENTFD_FLAGS) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: fd was just returned by eventfd and is owned by nobody else.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(Self { fd })
    }

    /// Handle to register with the multiplexer.
    pub fn handle(&self) -> SourceHandle {
        SourceHandle::new(self.fd.as_raw_fd())
    }

    /// Add one token.
    pub fn notify(&self) {
        let value: u64 = 1;
        let payload = value.to_ne_bytes();
        loop {
            // SAFETY: payload references a stack buffer with the 8-byte eventfd payload.
            let ret =
                unsafe { libc::write(self.fd.as_raw_fd(), payload.as_ptr().cast(), payload.len()) };
            if ret >= 0 {
                break;
            }

            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::Interrupted => continue,
                // Counter saturated: the reader is already guaranteed to wake.
                io::ErrorKind::WouldBlock => break,
                _ => {
                    log::debug!("[rt] eventfd write failed: {}", err);
                    break;
                }
            }
        }
    }

    /// Remove one token. Returns `false` if none was pending.
    pub fn consume(&self) -> bool {
        match consume_token(self.fd.as_raw_fd()) {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(err) => {
                log::debug!("[rt] eventfd read failed: {}", err);
                false
            }
        }
    }
}

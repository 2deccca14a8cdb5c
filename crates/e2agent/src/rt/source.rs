// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Event-source handles.

use std::fmt;
use std::io;
use std::os::fd::RawFd;

use mio::Token;

/// Pollable event source (socket, timer or wake signal) known to the reactor.
///
/// Wraps the raw descriptor. A handle is always strictly positive; building
/// one from `0` or a negative value is a contract violation and panics.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceHandle(RawFd);

impl SourceHandle {
    /// Wrap a raw descriptor.
    ///
    /// # Panics
    ///
    /// Panics if `fd <= 0`.
    pub fn new(fd: RawFd) -> Self {
        assert!(fd > 0, "source handles must be larger than zero (got {})", fd);
        Self(fd)
    }

    /// Raw descriptor value.
    #[inline]
    pub fn raw(self) -> RawFd {
        self.0
    }

    #[inline]
    pub(crate) fn token(self) -> Token {
        Token(self.0 as usize)
    }

    #[inline]
    pub(crate) fn from_token(token: Token) -> Self {
        Self::new(token.0 as RawFd)
    }
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fd#{}", self.0)
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read and discard the 8-byte readiness token of a timer or eventfd.
///
/// Returns `Ok(None)` when nothing was pending.
pub(crate) fn consume_token(fd: RawFd) -> io::Result<Option<u64>> {
    let mut payload = [0u8; 8];
    loop {
        // SAFETY: payload is a stack buffer sized to the timerfd/eventfd read requirements (8 bytes).
        let ret = unsafe { libc::read(fd, payload.as_mut_ptr().cast(), payload.len()) };
        if ret >= 0 {
            return Ok(Some(u64::from_ne_bytes(payload)));
        }

        let err = io::Error::last_os_error();
        match err.kind() {
            io::ErrorKind::Interrupted => continue,
            io::ErrorKind::WouldBlock => return Ok(None),
            _ => return Err(err),
        }
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Monotonic `timerfd` sources.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::time::Duration;

use super::source::SourceHandle;

const TIMERFD_FLAGS: libc::c_int = libc::TFD_NONBLOCK | libc::TFD_CLOEXEC;

/// Timer descriptor. Closed on drop.
#[derive(Debug)]
pub struct TimerFd {
    fd: OwnedFd,
}

impl TimerFd {
    /// Create a timer that is not armed. It never becomes readable until
    /// [`TimerFd::arm`] is called.
    pub fn idle() -> io::Result<Self> {
        // SAFETY: timerfd_create is invoked with a valid clock id and flags.
        let fd = unsafe { libc::timerfd_create(libc::CLOCK_MONOTONIC, TIMERFD_FLAGS) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: fd was just returned by timerfd_create and is owned by nobody else.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(Self { fd })
    }

    /// Create a timer that first fires after `interval` and then every
    /// `interval`.
    pub fn recurring(interval: Duration) -> io::Result<Self> {
        let timer = Self::idle()?;
        timer.arm(interval, interval)?;
        Ok(timer)
    }

    /// (Re)arm the timer. A zero `initial` disarms it.
    pub fn arm(&self, initial: Duration, interval: Duration) -> io::Result<()> {
        let value = libc::itimerspec {
            it_interval: to_timespec(interval),
            it_value: to_timespec(initial),
        };
        // SAFETY: value is a valid itimerspec on the stack; old_value may be null.
        let ret = unsafe { libc::timerfd_settime(self.fd.as_raw_fd(), 0, &value, std::ptr::null_mut()) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// Stop the timer without closing it.
    pub fn disarm(&self) -> io::Result<()> {
        self.arm(Duration::ZERO, Duration::ZERO)
    }

    /// Handle to register with the multiplexer.
    pub fn handle(&self) -> SourceHandle {
        SourceHandle::new(self.fd.as_raw_fd())
    }
}

fn to_timespec(d: Duration) -> libc::timespec {
    libc::timespec {
        tv_sec: d.as_secs() as libc::time_t,
        tv_nsec: d.subsec_nanos() as libc::c_long,
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Readiness multiplexer for the agent reactor.
//!
//! Wraps a `mio::Poll` and hands out one ready source at a time:
//!
//! ```text
//! +-----------------------------------------------------------+
//! |                      Multiplexer                          |
//! |  +-----------------------------------------------------+  |
//! |  |                    mio::Poll                        |  |
//! |  |  - transport endpoint (SourceFd)                    |  |
//! |  |  - aperiodic wake signal (eventfd)                  |  |
//! |  |  - subscription / setup-retry timers (timerfd)      |  |
//! |  +-----------------------------------------------------+  |
//! |                          |                                |
//! |                          v                                |
//! |            ready: VecDeque<SourceHandle>                  |
//! |                          |                                |
//! |                          v                                |
//! |                wait_next() -> one handle                  |
//! +-----------------------------------------------------------+
//! ```
//!
//! mio registrations are edge-triggered. [`Multiplexer::drain`] consumes one
//! readiness token and then re-registers the source, which makes the kernel
//! report it again if it is still ready. The reactor therefore sees one event
//! per token, as with a level-triggered poller.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

use mio::unix::SourceFd;
use mio::{Events, Interest, Poll};

use super::source::{consume_token, SourceHandle};
use super::timer::TimerFd;

/// Default number of readiness events fetched per poll.
pub const DEFAULT_MAX_EVENTS: usize = 128;

/// Single-threaded readiness multiplexer.
pub struct Multiplexer {
    poll: Poll,
    events: Events,
    /// Sources reported by the last poll and not yet handed out.
    ready: VecDeque<SourceHandle>,
    /// Timers created (and owned) by this multiplexer.
    timers: HashMap<SourceHandle, TimerFd>,
}

impl Multiplexer {
    /// Create an empty multiplexer.
    pub fn new(max_events: usize) -> io::Result<Self> {
        Ok(Self {
            poll: Poll::new()?,
            events: Events::with_capacity(max_events.max(1)),
            ready: VecDeque::new(),
            timers: HashMap::new(),
        })
    }

    /// Watch an externally owned source for readability.
    pub fn register(&mut self, handle: SourceHandle) -> io::Result<()> {
        let fd: RawFd = handle.raw();
        self.poll
            .registry()
            .register(&mut SourceFd(&fd), handle.token(), Interest::READABLE)
    }

    /// Stop watching a source and forget any pending readiness for it.
    pub fn deregister(&mut self, handle: SourceHandle) -> io::Result<()> {
        self.ready.retain(|h| *h != handle);
        let fd: RawFd = handle.raw();
        self.poll.registry().deregister(&mut SourceFd(&fd))
    }

    /// Create and register a timer that fires every `interval`.
    pub fn create_recurring_timer(&mut self, interval: Duration) -> io::Result<SourceHandle> {
        let timer = TimerFd::recurring(interval)?;
        self.adopt_timer(timer)
    }

    /// Create and register a timer that is never armed.
    ///
    /// Gives a subscription a unique source handle without periodic wake-ups.
    pub fn create_idle_timer(&mut self) -> io::Result<SourceHandle> {
        let timer = TimerFd::idle()?;
        self.adopt_timer(timer)
    }

    fn adopt_timer(&mut self, timer: TimerFd) -> io::Result<SourceHandle> {
        let handle = timer.handle();
        self.register(handle)?;
        self.timers.insert(handle, timer);
        log::debug!("[rt] timer {} registered", handle);
        Ok(handle)
    }

    /// Disarm, deregister and close a timer created by this multiplexer.
    ///
    /// Returns `false` if `handle` is not one of our timers.
    pub fn cancel_timer(&mut self, handle: SourceHandle) -> bool {
        let Some(timer) = self.timers.remove(&handle) else {
            return false;
        };
        if let Err(err) = timer.disarm() {
            log::debug!("[rt] timer {} disarm failed: {}", handle, err);
        }
        if let Err(err) = self.deregister(handle) {
            log::debug!("[rt] timer {} deregister failed: {}", handle, err);
        }
        log::debug!("[rt] timer {} cancelled", handle);
        true
    }

    /// Number of live timers.
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Whether `handle` is a live timer of this multiplexer.
    pub fn is_timer(&self, handle: SourceHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    /// Next ready source, blocking up to `timeout`.
    ///
    /// `Ok(None)` means the timeout elapsed (or the wait was interrupted)
    /// without any source becoming ready.
    pub fn wait_next(&mut self, timeout: Duration) -> io::Result<Option<SourceHandle>> {
        if let Some(handle) = self.ready.pop_front() {
            return Ok(Some(handle));
        }

        if let Err(e) = self.poll.poll(&mut self.events, Some(timeout)) {
            if e.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(e);
        }

        for event in self.events.iter() {
            let handle = SourceHandle::from_token(event.token());
            if !self.ready.contains(&handle) {
                self.ready.push_back(handle);
            }
        }

        Ok(self.ready.pop_front())
    }

    /// Consume one readiness token of a timer or signal source and re-arm it.
    pub fn drain(&mut self, handle: SourceHandle) {
        if let Err(err) = consume_token(handle.raw()) {
            log::debug!("[rt] drain of {} failed: {}", handle, err);
        }
        self.rearm(handle);
    }

    /// Re-register a source so that remaining readiness is reported again.
    pub fn rearm(&mut self, handle: SourceHandle) {
        let fd: RawFd = handle.raw();
        if let Err(err) =
            self.poll
                .registry()
                .reregister(&mut SourceFd(&fd), handle.token(), Interest::READABLE)
        {
            log::debug!("[rt] rearm of {} failed: {}", handle, err);
        }
    }
}

impl Drop for Multiplexer {
    fn drop(&mut self) {
        let handles: Vec<SourceHandle> = self.timers.keys().copied().collect();
        for handle in handles {
            self.cancel_timer(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rt::signal::EventFd;

    #[test]
    fn test_timeout_yields_none() {
        let mut mux = Multiplexer::new(DEFAULT_MAX_EVENTS).expect("mux");
        let next = mux.wait_next(Duration::from_millis(5)).expect("wait");
        assert_eq!(next, None);
    }

    #[test]
    fn test_recurring_timer_reported() {
        let mut mux = Multiplexer::new(DEFAULT_MAX_EVENTS).expect("mux");
        let timer = mux
            .create_recurring_timer(Duration::from_millis(5))
            .expect("timer");

        let next = mux.wait_next(Duration::from_secs(1)).expect("wait");
        assert_eq!(next, Some(timer));
        mux.drain(timer);
        assert_eq!(mux.timer_count(), 1);
    }

    #[test]
    fn test_drain_reports_remaining_tokens() {
        let mut mux = Multiplexer::new(DEFAULT_MAX_EVENTS).expect("mux");
        let signal = EventFd::new().expect("eventfd");
        mux.register(signal.handle()).expect("register");

        signal.notify();
        signal.notify();

        // Both notifications arrive before the first poll: one edge only.
        assert_eq!(
            mux.wait_next(Duration::from_secs(1)).expect("wait"),
            Some(signal.handle())
        );
        mux.drain(signal.handle());

        // Re-registration surfaces the second token.
        assert_eq!(
            mux.wait_next(Duration::from_secs(1)).expect("wait"),
            Some(signal.handle())
        );
        mux.drain(signal.handle());

        assert_eq!(mux.wait_next(Duration::from_millis(10)).expect("wait"), None);
    }

    #[test]
    fn test_cancel_timer_purges_ready_list() {
        let mut mux = Multiplexer::new(DEFAULT_MAX_EVENTS).expect("mux");
        let a = mux
            .create_recurring_timer(Duration::from_millis(1))
            .expect("timer a");
        let b = mux
            .create_recurring_timer(Duration::from_millis(1))
            .expect("timer b");
        std::thread::sleep(Duration::from_millis(10));

        let first = mux.wait_next(Duration::from_secs(1)).expect("wait");
        let other = if first == Some(a) { b } else { a };
        assert!(mux.cancel_timer(other));
        assert!(!mux.cancel_timer(other));
        assert!(!mux.ready.contains(&other));
        assert!(!mux.is_timer(other));
    }

    #[test]
    fn test_idle_timer_is_silent() {
        let mut mux = Multiplexer::new(DEFAULT_MAX_EVENTS).expect("mux");
        let idle = mux.create_idle_timer().expect("idle");
        assert!(mux.is_timer(idle));
        assert_eq!(mux.wait_next(Duration::from_millis(20)).expect("wait"), None);
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handshake retry obligations.

use std::time::Instant;

use super::DualKeyRegistry;

/// Retry obligation armed on a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PendingEvent {
    /// Resend the E2 setup request until a response arrives.
    SetupRequest,
}

/// Bookkeeping kept with a pending event.
#[derive(Clone, Copy, Debug)]
pub struct PendingRecord {
    pub event: PendingEvent,
    pub armed_at: Instant,
    /// Resends performed so far.
    pub resends: u32,
}

impl PendingRecord {
    pub fn new(event: PendingEvent) -> Self {
        Self {
            event,
            armed_at: Instant::now(),
            resends: 0,
        }
    }
}

/// Pending events keyed by timer handle and by event kind.
///
/// Owned by the reactor thread only. Holds at most one entry in this design.
pub type PendingRegistry = DualKeyRegistry<PendingEvent, PendingRecord>;

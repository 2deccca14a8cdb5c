// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Classified readiness events.

use crate::registry::{AperiodicIndicationEvent, IndicationTarget, PendingEvent};
use crate::rt::SourceHandle;

/// What a ready source means for the reactor.
///
/// There is no "unclassifiable" variant: a source that matches nothing
/// aborts classification.
#[derive(Debug)]
pub enum AsyncEvent {
    /// A complete PDU arrived from the RIC.
    NetworkMessage { source: SourceHandle, payload: Vec<u8> },
    /// The transport association is gone.
    SessionEnded { source: SourceHandle, reason: String },
    /// A subscription timer fired.
    PeriodicIndicationDue {
        source: SourceHandle,
        target: IndicationTarget,
    },
    /// A producer thread requested one indication.
    AperiodicIndicationDue {
        source: SourceHandle,
        event: AperiodicIndicationEvent,
    },
    /// The retry timer of a pending event fired.
    PendingRetryDue {
        source: SourceHandle,
        event: PendingEvent,
    },
    /// Nothing to do besides re-checking the stop flag.
    NoOp { source: Option<SourceHandle> },
}

impl AsyncEvent {
    /// Source that triggered the event, acknowledged after dispatch.
    pub fn source(&self) -> Option<SourceHandle> {
        match self {
            AsyncEvent::NetworkMessage { source, .. }
            | AsyncEvent::SessionEnded { source, .. }
            | AsyncEvent::PeriodicIndicationDue { source, .. }
            | AsyncEvent::AperiodicIndicationDue { source, .. }
            | AsyncEvent::PendingRetryDue { source, .. } => Some(*source),
            AsyncEvent::NoOp { source } => *source,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AsyncEvent::NetworkMessage { .. } => "network-message",
            AsyncEvent::SessionEnded { .. } => "session-ended",
            AsyncEvent::PeriodicIndicationDue { .. } => "periodic-indication",
            AsyncEvent::AperiodicIndicationDue { .. } => "aperiodic-indication",
            AsyncEvent::PendingRetryDue { .. } => "pending-retry",
            AsyncEvent::NoOp { .. } => "no-op",
        }
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reactor loop: wait, classify, dispatch, acknowledge.
//!
//! ```text
//!   wait_next(poll_timeout)
//!        |
//!        v
//!   classify(source)            network endpoint?  -> NetworkMessage / SessionEnded
//!        |                      wake signal?       -> AperiodicIndicationDue
//!        |                      indication timer?  -> PeriodicIndicationDue
//!        |                      pending timer?     -> PendingRetryDue
//!        |                      none of the above  -> panic
//!        v
//!   dispatch(event)
//!        |
//!        v
//!   acknowledge(source)         drain one token, re-arm
//! ```

use std::sync::atomic::Ordering;

use super::event::AsyncEvent;
use super::E2Agent;
use crate::error::Result;
use crate::registry::PendingEvent;
use crate::rt::SourceHandle;
use crate::sm::IndicationTrigger;
use crate::transport::TransportMessage;

impl E2Agent {
    /// Loop until the stop flag is raised.
    pub(crate) fn run(&mut self) -> Result<()> {
        while !self.shared.stop.load(Ordering::Acquire) {
            self.run_once()?;
        }
        log::debug!("[e2-agent] stop flag observed");
        Ok(())
    }

    /// Handle at most one ready source, waiting up to `poll_timeout`.
    pub(crate) fn run_once(&mut self) -> Result<()> {
        let event = self.next_event()?;
        let source = event.source();
        if source.is_some() {
            log::debug!("[e2-agent] {} on {:?}", event.kind(), source);
        }
        self.dispatch(event);
        if let Some(source) = source {
            self.acknowledge(source);
        }
        Ok(())
    }

    fn next_event(&mut self) -> Result<AsyncEvent> {
        match self.mux.wait_next(self.poll_timeout)? {
            Some(source) => Ok(self.classify(source)),
            None => Ok(AsyncEvent::NoOp { source: None }),
        }
    }

    /// Map a ready source to the event it represents.
    ///
    /// # Panics
    ///
    /// Panics if the source was not registered by the agent, or if the
    /// pending registry holds more than one entry.
    pub(crate) fn classify(&mut self, source: SourceHandle) -> AsyncEvent {
        if source == self.net {
            return match self.transport.receive() {
                Some(TransportMessage::Payload(payload)) => {
                    AsyncEvent::NetworkMessage { source, payload }
                }
                Some(TransportMessage::SessionEnded { reason }) => {
                    AsyncEvent::SessionEnded { source, reason }
                }
                None => AsyncEvent::NoOp {
                    source: Some(source),
                },
            };
        }

        if source == self.shared.queue.source() {
            return match self.shared.queue.pop() {
                Some(event) => AsyncEvent::AperiodicIndicationDue { source, event },
                None => {
                    log::debug!("[e2-agent] wake signal without queued indication");
                    AsyncEvent::NoOp {
                        source: Some(source),
                    }
                }
            };
        }

        if let Some(target) = self.shared.indications.lock().target(source) {
            return AsyncEvent::PeriodicIndicationDue { source, target };
        }

        if !self.pending.is_empty() {
            assert_eq!(
                self.pending.len(),
                1,
                "pending registry must hold exactly one entry"
            );
            if let Some(record) = self.pending.find_by_source(source) {
                return AsyncEvent::PendingRetryDue {
                    source,
                    event: record.event,
                };
            }
        }

        panic!("unclassifiable readiness event on {:?}", source);
    }

    pub(crate) fn dispatch(&mut self, event: AsyncEvent) {
        match event {
            AsyncEvent::NetworkMessage { payload, .. } => self.handle_network_message(&payload),
            AsyncEvent::SessionEnded { source, reason } => {
                log::warn!("[e2-agent] transport session ended: {}", reason);
                if let Err(e) = self.mux.deregister(source) {
                    log::debug!("[e2-agent] deregister of {} failed: {}", source, e);
                }
                self.net_open = false;
            }
            AsyncEvent::PeriodicIndicationDue { target, .. } => {
                self.emit_indication(
                    target.ric_id,
                    target.action_id,
                    target.ran_func_id,
                    &target.sm,
                    IndicationTrigger::Periodic {
                        action_definition: target.action_definition.as_deref(),
                    },
                );
            }
            AsyncEvent::AperiodicIndicationDue { event, .. } => {
                self.emit_indication(
                    event.ric_id,
                    event.action_id,
                    event.ran_func_id,
                    &event.sm,
                    IndicationTrigger::Aperiodic {
                        payload: &event.payload,
                    },
                );
            }
            AsyncEvent::PendingRetryDue { source, event } => match event {
                PendingEvent::SetupRequest => self.resend_setup(source),
            },
            AsyncEvent::NoOp { .. } => {}
        }
    }

    /// Consume the readiness token of the triggering source.
    fn acknowledge(&mut self, source: SourceHandle) {
        if source == self.net {
            if self.net_open {
                self.mux.rearm(source);
            }
        } else if source == self.shared.queue.source() || self.mux.is_timer(source) {
            self.mux.drain(source);
        }
    }

    /// Release everything the reactor owns before reporting itself stopped.
    pub(crate) fn teardown(&mut self) {
        let subscriptions = self.shared.indications.lock().drain();
        let n_subscriptions = subscriptions.len();
        for entry in subscriptions {
            self.mux.cancel_timer(entry.source);
        }

        for entry in self.pending.drain() {
            self.mux.cancel_timer(entry.source);
        }

        let discarded = self.shared.queue.clear();
        log::info!(
            "[e2-agent] teardown: {} subscription(s) released, {} aperiodic request(s) discarded",
            n_subscriptions,
            discarded
        );
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! E2 setup handshake.
//!
//! ```text
//!  NotStarted --begin_setup--> AwaitingResponse --setup response--> Established
//!                                 |        ^
//!                                 +--------+
//!                              retry timer fired: resend
//! ```

use super::E2Agent;
use crate::e2ap::{E2SetupRequest, E2SetupResponse, E2apMessage};
use crate::error::{Error, Result};
use crate::registry::{PendingEvent, PendingRecord};
use crate::rt::SourceHandle;

/// Handshake progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupState {
    NotStarted,
    AwaitingResponse,
    Established,
}

impl E2Agent {
    /// Build a setup request from the current plugin descriptors.
    ///
    /// # Panics
    ///
    /// Panics if no service model is registered.
    pub(crate) fn build_setup_request(&self) -> E2SetupRequest {
        assert!(
            !self.models.is_empty(),
            "an E2 agent needs at least one RAN function"
        );
        E2SetupRequest {
            node_id: self.node_id.clone(),
            ran_functions: self.models.setup_descriptors(),
        }
    }

    /// Send the first setup request and arm the retry timer.
    pub(crate) fn begin_setup(&mut self) -> Result<()> {
        if self.setup != SetupState::NotStarted {
            return Err(Error::InvalidState(format!(
                "setup already started ({:?})",
                self.setup
            )));
        }

        let request = self.build_setup_request();
        log::info!(
            "[e2-agent] sending E2 setup request for {} with {} RAN function(s)",
            self.node_id,
            request.ran_functions.len()
        );
        self.send_pdu(E2apMessage::SetupRequest(request));

        let timer = self.mux.create_recurring_timer(self.setup_retry_interval)?;
        let displaced = self.pending.insert(
            timer,
            PendingEvent::SetupRequest,
            PendingRecord::new(PendingEvent::SetupRequest),
        );
        assert!(displaced.is_empty(), "setup retry armed twice");
        assert_eq!(
            self.pending.len(),
            1,
            "pending registry must hold exactly one entry"
        );
        self.setup = SetupState::AwaitingResponse;
        Ok(())
    }

    /// Retry timer fired without a response: rebuild and resend.
    pub(crate) fn resend_setup(&mut self, source: SourceHandle) {
        if self.setup != SetupState::AwaitingResponse {
            log::debug!("[e2-agent] stale setup retry on {} ignored", source);
            return;
        }

        let resends = match self.pending.find_by_source_mut(source) {
            Some(record) => {
                record.resends += 1;
                record.resends
            }
            None => return,
        };
        log::info!(
            "[e2-agent] no E2 setup response after {:?}, resending (attempt {})",
            self.setup_retry_interval,
            resends + 1
        );
        let request = self.build_setup_request();
        self.send_pdu(E2apMessage::SetupRequest(request));
    }

    /// Setup response received: drop the retry obligation.
    pub(crate) fn complete_setup(&mut self, response: &E2SetupResponse) {
        if self.setup != SetupState::AwaitingResponse {
            log::warn!(
                "[e2-agent] E2 setup response received in state {:?}, ignored",
                self.setup
            );
            return;
        }

        if let Some(entry) = self.pending.remove_by_key(&PendingEvent::SetupRequest) {
            self.mux.cancel_timer(entry.source);
        }
        assert!(
            self.pending.is_empty(),
            "pending registry not empty after setup completion"
        );

        self.setup = SetupState::Established;
        if !response.rejected.is_empty() {
            log::warn!(
                "[e2-agent] RIC rejected RAN functions {:?}",
                response.rejected
            );
        }
        log::info!(
            "[e2-agent] E2 setup established with RIC {} (accepted {:?})",
            response.ric_id.near_ric_id,
            response.accepted
        );
    }

    pub fn setup_state(&self) -> SetupState {
        self.setup
    }
}

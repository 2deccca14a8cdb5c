// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode-and-transmit helpers.
//!
//! Every helper owns the encoded buffer for the duration of the call only;
//! send failures are logged and the PDU is dropped.

use std::sync::Arc;

use super::E2Agent;
use crate::e2ap::{
    ActionNotAdmitted, Cause, E2apMessage, IndicationType, RicControlAcknowledge,
    RicControlFailure, RicIndication, RicRequestId, RicServiceUpdate,
    RicSubscriptionDeleteFailure, RicSubscriptionDeleteResponse, RicSubscriptionFailure,
    RicSubscriptionResponse,
};
use crate::sm::{IndicationTrigger, ServiceModel};

impl E2Agent {
    /// Encode and transmit one PDU. Returns whether it left the agent.
    pub(crate) fn send_pdu(&mut self, msg: E2apMessage) -> bool {
        let bytes = match self.codec.encode(&msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("[e2ap] {} dropped: {}", msg.name(), e);
                return false;
            }
        };
        match self.transport.send(&bytes) {
            Ok(()) => {
                log::debug!("[e2ap] sent {} ({} bytes)", msg.name(), bytes.len());
                true
            }
            Err(e) => {
                log::warn!("[e2-agent] send of {} failed: {}", msg.name(), e);
                false
            }
        }
    }

    pub(crate) fn send_subscription_response(
        &mut self,
        ric_id: RicRequestId,
        ran_func_id: u16,
        admitted: Vec<u8>,
        not_admitted: Vec<ActionNotAdmitted>,
    ) {
        self.send_pdu(E2apMessage::SubscriptionResponse(RicSubscriptionResponse {
            ric_id,
            ran_func_id,
            admitted,
            not_admitted,
        }));
    }

    pub(crate) fn send_subscription_failure(
        &mut self,
        ric_id: RicRequestId,
        ran_func_id: u16,
        cause: Cause,
    ) {
        log::info!(
            "[e2-agent] subscription {} on RAN function {} refused: {}",
            ric_id,
            ran_func_id,
            cause
        );
        self.send_pdu(E2apMessage::SubscriptionFailure(RicSubscriptionFailure {
            ric_id,
            ran_func_id,
            cause,
        }));
    }

    pub(crate) fn send_subscription_delete_response(&mut self, ric_id: RicRequestId, ran_func_id: u16) {
        self.send_pdu(E2apMessage::SubscriptionDeleteResponse(
            RicSubscriptionDeleteResponse {
                ric_id,
                ran_func_id,
            },
        ));
    }

    pub(crate) fn send_subscription_delete_failure(
        &mut self,
        ric_id: RicRequestId,
        ran_func_id: u16,
        cause: Cause,
    ) {
        self.send_pdu(E2apMessage::SubscriptionDeleteFailure(
            RicSubscriptionDeleteFailure {
                ric_id,
                ran_func_id,
                cause,
            },
        ));
    }

    pub(crate) fn send_control_acknowledge(&mut self, ack: RicControlAcknowledge) {
        self.send_pdu(E2apMessage::ControlAcknowledge(ack));
    }

    pub(crate) fn send_control_failure(&mut self, failure: RicControlFailure) {
        self.send_pdu(E2apMessage::ControlFailure(failure));
    }

    pub(crate) fn send_service_update(&mut self, update: RicServiceUpdate) {
        self.send_pdu(E2apMessage::ServiceUpdate(update));
    }

    pub(crate) fn send_indication(&mut self, indication: RicIndication) {
        self.send_pdu(E2apMessage::Indication(indication));
    }

    /// Run a plugin's indication procedure and transmit the result.
    pub(crate) fn emit_indication(
        &mut self,
        ric_id: RicRequestId,
        action_id: u8,
        ran_func_id: u16,
        sm: &Arc<dyn ServiceModel>,
        trigger: IndicationTrigger<'_>,
    ) {
        let data = sm.on_indication(trigger);
        let sequence_number = self.next_indication_sn;
        self.next_indication_sn = self.next_indication_sn.wrapping_add(1);

        self.send_indication(RicIndication {
            ric_id,
            ran_func_id,
            action_id,
            sequence_number: Some(sequence_number),
            kind: IndicationType::Report,
            header: data.header,
            message: data.message,
            call_process_id: data.call_process_id,
        });
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handling of PDUs received from the RIC.

use std::sync::Arc;

use super::E2Agent;
use crate::e2ap::{
    ActionNotAdmitted, Cause, E2apMessage, RicControlAcknowledge, RicControlFailure,
    RicControlRequest, RicServiceQuery, RicServiceUpdate, RicSubscriptionDeleteRequest,
    RicSubscriptionRequest,
};
use crate::registry::IndicationEvent;
use crate::sm::SubscriptionTiming;

impl E2Agent {
    /// Decode one received PDU and run its procedure.
    pub(crate) fn handle_network_message(&mut self, payload: &[u8]) {
        let msg = match self.codec.decode(payload) {
            Ok(msg) => msg,
            Err(e) => {
                log::warn!("[e2ap] undecodable PDU ({} bytes) dropped: {}", payload.len(), e);
                return;
            }
        };
        log::debug!("[e2ap] received {}", msg.name());

        match msg {
            E2apMessage::SetupResponse(response) => self.complete_setup(&response),
            E2apMessage::SetupFailure(failure) => {
                log::warn!(
                    "[e2-agent] E2 setup failure from RIC (cause {}), retry continues",
                    failure.cause
                );
            }
            E2apMessage::SubscriptionRequest(request) => self.handle_subscription(request),
            E2apMessage::SubscriptionDeleteRequest(request) => {
                self.handle_subscription_delete(&request);
            }
            E2apMessage::ControlRequest(request) => self.handle_control(request),
            E2apMessage::ServiceQuery(query) => self.handle_service_query(&query),
            E2apMessage::ServiceUpdateAcknowledge(ack) => {
                log::info!(
                    "[e2-agent] RIC service update acknowledged (accepted {:?}, rejected {:?})",
                    ack.accepted,
                    ack.rejected
                );
            }
            other => {
                log::warn!("[e2ap] unexpected {} from RIC dropped", other.name());
            }
        }
    }

    fn handle_subscription(&mut self, request: RicSubscriptionRequest) {
        let RicSubscriptionRequest {
            ric_id,
            ran_func_id,
            event_trigger,
            actions,
        } = request;

        let Some(sm) = self.models.get(ran_func_id).map(Arc::clone) else {
            self.send_subscription_failure(ric_id, ran_func_id, Cause::RanFunctionIdInvalid);
            return;
        };
        let Some((first, rest)) = actions.split_first() else {
            self.send_subscription_failure(ric_id, ran_func_id, Cause::ActionNotSupported);
            return;
        };

        let timing = match sm.on_subscription(&event_trigger) {
            Ok(timing) => timing,
            Err(cause) => {
                self.send_subscription_failure(ric_id, ran_func_id, cause);
                return;
            }
        };

        let timer = match timing {
            SubscriptionTiming::Periodic(interval) if !interval.is_zero() => {
                self.mux.create_recurring_timer(interval)
            }
            _ => self.mux.create_idle_timer(),
        };
        let timer = match timer {
            Ok(timer) => timer,
            Err(e) => {
                log::error!("[e2-agent] no timer for subscription {}: {}", ric_id, e);
                self.send_subscription_failure(ric_id, ran_func_id, Cause::FunctionResourceLimit);
                return;
            }
        };

        let event = IndicationEvent::new(ric_id, first.id, sm, first.definition.clone());
        let displaced = self.shared.indications.lock().insert(timer, event);
        for entry in displaced {
            log::info!(
                "[e2-agent] subscription {}/{} replaced",
                entry.key.ric_id,
                entry.key.action_id
            );
            self.mux.cancel_timer(entry.source);
        }

        log::info!(
            "[e2-agent] subscription {}/{} added on RAN function {} ({:?})",
            ric_id,
            first.id,
            ran_func_id,
            timing
        );
        let not_admitted = rest
            .iter()
            .map(|action| ActionNotAdmitted {
                id: action.id,
                cause: Cause::ExcessiveActions,
            })
            .collect();
        self.send_subscription_response(ric_id, ran_func_id, vec![first.id], not_admitted);
    }

    fn handle_subscription_delete(&mut self, request: &RicSubscriptionDeleteRequest) {
        let removed = self.shared.indications.lock().remove_request(request.ric_id);
        if removed.is_empty() {
            self.send_subscription_delete_failure(
                request.ric_id,
                request.ran_func_id,
                Cause::RequestIdUnknown,
            );
            return;
        }

        for entry in removed {
            self.mux.cancel_timer(entry.source);
            log::info!(
                "[e2-agent] subscription {}/{} removed",
                entry.key.ric_id,
                entry.key.action_id
            );
        }
        self.send_subscription_delete_response(request.ric_id, request.ran_func_id);
    }

    fn handle_control(&mut self, request: RicControlRequest) {
        let RicControlRequest {
            ric_id,
            ran_func_id,
            call_process_id,
            header,
            message,
        } = request;

        let outcome = match self.models.get(ran_func_id) {
            Some(sm) => sm.on_control(&header, &message),
            None => Err(Cause::RanFunctionIdInvalid),
        };
        match outcome {
            Ok(outcome) => {
                log::info!("[e2-agent] control {} on RAN function {} applied", ric_id, ran_func_id);
                self.send_control_acknowledge(RicControlAcknowledge {
                    ric_id,
                    ran_func_id,
                    call_process_id,
                    outcome,
                });
            }
            Err(cause) => {
                log::info!(
                    "[e2-agent] control {} on RAN function {} failed: {}",
                    ric_id,
                    ran_func_id,
                    cause
                );
                self.send_control_failure(RicControlFailure {
                    ric_id,
                    ran_func_id,
                    call_process_id,
                    cause,
                });
            }
        }
    }

    /// Answer a service query with every plugin's current descriptor.
    ///
    /// Functions the RIC already lists are reported as modified, the others
    /// as added.
    fn handle_service_query(&mut self, query: &RicServiceQuery) {
        let (modified, added): (Vec<_>, Vec<_>) = self
            .models
            .service_update_descriptors()
            .into_iter()
            .partition(|rf| query.accepted.contains(&rf.id));

        log::info!(
            "[e2-agent] RIC service query: {} added, {} modified",
            added.len(),
            modified.len()
        );
        self.send_service_update(RicServiceUpdate {
            added,
            modified,
            deleted: Vec::new(),
        });
    }
}

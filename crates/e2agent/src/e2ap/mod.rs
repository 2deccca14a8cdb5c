// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! E2AP protocol data units exchanged between the agent and the RIC.
//!
//! The types model message content only. Their wire layout belongs to the
//! [`E2apCodec`] in use.
//!
//! | Direction     | PDUs                                                        |
//! |---------------|-------------------------------------------------------------|
//! | agent -> RIC  | setup request, subscription response/failure, indication,   |
//! |               | subscription delete response/failure, control ack/failure,  |
//! |               | RIC service update                                          |
//! | RIC -> agent  | setup response/failure, subscription request, subscription  |
//! |               | delete request, control request, RIC service query,         |
//! |               | RIC service update acknowledge                              |

pub mod codec;
pub mod types;

use serde::{Deserialize, Serialize};

pub use codec::{E2apCodec, JsonCodec};
pub use types::{Cause, GlobalNodeId, GlobalRicId, NodeType, Plmn, RanFunction, RicRequestId};

// ============================================================================
// Setup
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct E2SetupRequest {
    pub node_id: GlobalNodeId,
    /// One descriptor per registered RAN function, in registration order.
    pub ran_functions: Vec<RanFunction>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct E2SetupResponse {
    pub ric_id: GlobalRicId,
    pub accepted: Vec<u16>,
    #[serde(default)]
    pub rejected: Vec<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct E2SetupFailure {
    pub cause: Cause,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_wait_ms: Option<u32>,
}

// ============================================================================
// Subscription
// ============================================================================

/// Action kind requested in a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Report,
    Insert,
    Policy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicAction {
    pub id: u8,
    pub kind: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicSubscriptionRequest {
    pub ric_id: RicRequestId,
    pub ran_func_id: u16,
    pub event_trigger: Vec<u8>,
    pub actions: Vec<RicAction>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionNotAdmitted {
    pub id: u8,
    pub cause: Cause,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicSubscriptionResponse {
    pub ric_id: RicRequestId,
    pub ran_func_id: u16,
    pub admitted: Vec<u8>,
    #[serde(default)]
    pub not_admitted: Vec<ActionNotAdmitted>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicSubscriptionFailure {
    pub ric_id: RicRequestId,
    pub ran_func_id: u16,
    pub cause: Cause,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicSubscriptionDeleteRequest {
    pub ric_id: RicRequestId,
    pub ran_func_id: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicSubscriptionDeleteResponse {
    pub ric_id: RicRequestId,
    pub ran_func_id: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicSubscriptionDeleteFailure {
    pub ric_id: RicRequestId,
    pub ran_func_id: u16,
    pub cause: Cause,
}

// ============================================================================
// Indication
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicationType {
    Report,
    Insert,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicIndication {
    pub ric_id: RicRequestId,
    pub ran_func_id: u16,
    pub action_id: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u32>,
    pub kind: IndicationType,
    pub header: Vec<u8>,
    pub message: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_process_id: Option<Vec<u8>>,
}

// ============================================================================
// Control
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicControlRequest {
    pub ric_id: RicRequestId,
    pub ran_func_id: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_process_id: Option<Vec<u8>>,
    pub header: Vec<u8>,
    pub message: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicControlAcknowledge {
    pub ric_id: RicRequestId,
    pub ran_func_id: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_process_id: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicControlFailure {
    pub ric_id: RicRequestId,
    pub ran_func_id: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_process_id: Option<Vec<u8>>,
    pub cause: Cause,
}

// ============================================================================
// RIC service update
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicServiceQuery {
    /// RAN functions the RIC already knows about.
    #[serde(default)]
    pub accepted: Vec<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicServiceUpdate {
    #[serde(default)]
    pub added: Vec<RanFunction>,
    #[serde(default)]
    pub modified: Vec<RanFunction>,
    #[serde(default)]
    pub deleted: Vec<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicServiceUpdateAcknowledge {
    pub accepted: Vec<u16>,
    #[serde(default)]
    pub rejected: Vec<u16>,
}

// ============================================================================
// Envelope
// ============================================================================

/// Any E2AP PDU handled by the agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "snake_case")]
pub enum E2apMessage {
    SetupRequest(E2SetupRequest),
    SetupResponse(E2SetupResponse),
    SetupFailure(E2SetupFailure),
    SubscriptionRequest(RicSubscriptionRequest),
    SubscriptionResponse(RicSubscriptionResponse),
    SubscriptionFailure(RicSubscriptionFailure),
    SubscriptionDeleteRequest(RicSubscriptionDeleteRequest),
    SubscriptionDeleteResponse(RicSubscriptionDeleteResponse),
    SubscriptionDeleteFailure(RicSubscriptionDeleteFailure),
    Indication(RicIndication),
    ControlRequest(RicControlRequest),
    ControlAcknowledge(RicControlAcknowledge),
    ControlFailure(RicControlFailure),
    ServiceQuery(RicServiceQuery),
    ServiceUpdate(RicServiceUpdate),
    ServiceUpdateAcknowledge(RicServiceUpdateAcknowledge),
}

impl E2apMessage {
    /// Short PDU name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            E2apMessage::SetupRequest(_) => "E2SetupRequest",
            E2apMessage::SetupResponse(_) => "E2SetupResponse",
            E2apMessage::SetupFailure(_) => "E2SetupFailure",
            E2apMessage::SubscriptionRequest(_) => "RICsubscriptionRequest",
            E2apMessage::SubscriptionResponse(_) => "RICsubscriptionResponse",
            E2apMessage::SubscriptionFailure(_) => "RICsubscriptionFailure",
            E2apMessage::SubscriptionDeleteRequest(_) => "RICsubscriptionDeleteRequest",
            E2apMessage::SubscriptionDeleteResponse(_) => "RICsubscriptionDeleteResponse",
            E2apMessage::SubscriptionDeleteFailure(_) => "RICsubscriptionDeleteFailure",
            E2apMessage::Indication(_) => "RICindication",
            E2apMessage::ControlRequest(_) => "RICcontrolRequest",
            E2apMessage::ControlAcknowledge(_) => "RICcontrolAcknowledge",
            E2apMessage::ControlFailure(_) => "RICcontrolFailure",
            E2apMessage::ServiceQuery(_) => "RICserviceQuery",
            E2apMessage::ServiceUpdate(_) => "RICserviceUpdate",
            E2apMessage::ServiceUpdateAcknowledge(_) => "RICserviceUpdateAcknowledge",
        }
    }
}

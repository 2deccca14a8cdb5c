// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! E2AP identifiers and shared information elements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Public Land Mobile Network identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plmn {
    /// Mobile country code.
    pub mcc: u16,
    /// Mobile network code.
    pub mnc: u16,
    /// Number of MNC digits (2 or 3).
    pub mnc_digit_len: u8,
}

/// Kind of RAN node hosting the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Gnb,
    GnbCu,
    GnbDu,
    Enb,
    NgEnb,
}

/// Global E2 node identifier, sent in the setup request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalNodeId {
    pub node_type: NodeType,
    pub plmn: Plmn,
    /// gNB/eNB identifier.
    pub nb_id: u32,
    /// CU/DU unit id when the node is split.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<u64>,
}

impl fmt::Display for GlobalNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}/{:03}-{:0width$}/{}",
            self.node_type,
            self.plmn.mcc,
            self.plmn.mnc,
            self.nb_id,
            width = usize::from(self.plmn.mnc_digit_len)
        )
    }
}

/// Global RIC identifier returned in the setup response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalRicId {
    pub plmn: Plmn,
    pub near_ric_id: u32,
}

/// RIC request identifier of a subscription or control procedure.
///
/// Ordered by `(ric_req_id, ric_inst_id)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RicRequestId {
    pub ric_req_id: u32,
    pub ric_inst_id: u16,
}

impl RicRequestId {
    pub fn new(ric_req_id: u32, ric_inst_id: u16) -> Self {
        Self {
            ric_req_id,
            ric_inst_id,
        }
    }
}

impl fmt::Display for RicRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.ric_req_id, self.ric_inst_id)
    }
}

/// RAN function capability descriptor advertised by a service model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RanFunction {
    pub id: u16,
    pub revision: u16,
    /// Service-model-specific definition bytes.
    pub definition: Vec<u8>,
    /// Object identifier of the service model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid: Option<String>,
}

/// Failure cause carried in failure PDUs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    RanFunctionIdInvalid,
    ActionNotSupported,
    ExcessiveActions,
    RequestIdUnknown,
    EventTriggerNotSupported,
    ControlMessageInvalid,
    ControlTimerExpired,
    FunctionResourceLimit,
    Unspecified,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cause::RanFunctionIdInvalid => "ran-function-id-invalid",
            Cause::ActionNotSupported => "action-not-supported",
            Cause::ExcessiveActions => "excessive-actions",
            Cause::RequestIdUnknown => "request-id-unknown",
            Cause::EventTriggerNotSupported => "event-trigger-not-supported",
            Cause::ControlMessageInvalid => "control-message-invalid",
            Cause::ControlTimerExpired => "control-timer-expired",
            Cause::FunctionResourceLimit => "function-resource-limit",
            Cause::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}

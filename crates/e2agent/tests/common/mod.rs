// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use e2agent::e2ap::{E2apMessage, GlobalRicId};
use e2agent::{
    Cause, ChannelPeer, E2apCodec, GlobalNodeId, IndicationData, IndicationTrigger, JsonCodec,
    NodeType, Plmn, RanFunction, ServiceModel, SubscriptionTiming,
};
use parking_lot::Mutex;

pub const PLMN: Plmn = Plmn {
    mcc: 208,
    mnc: 95,
    mnc_digit_len: 2,
};

pub fn node() -> GlobalNodeId {
    GlobalNodeId {
        node_type: NodeType::Gnb,
        plmn: PLMN,
        nb_id: 0xe00,
        unit_id: None,
    }
}

pub fn ric_id() -> GlobalRicId {
    GlobalRicId {
        plmn: PLMN,
        near_ric_id: 15,
    }
}

/// Service model counting the indications it produced.
pub struct CounterModel {
    pub id: u16,
    pub timing: SubscriptionTiming,
    pub produced: AtomicU32,
    pub released: Mutex<Vec<Vec<u8>>>,
}

impl CounterModel {
    pub fn new(id: u16, timing: SubscriptionTiming) -> Self {
        Self {
            id,
            timing,
            produced: AtomicU32::new(0),
            released: Mutex::new(Vec::new()),
        }
    }
}

impl ServiceModel for CounterModel {
    fn ran_function_id(&self) -> u16 {
        self.id
    }

    fn name(&self) -> &str {
        "counter"
    }

    fn on_setup(&self) -> RanFunction {
        RanFunction {
            id: self.id,
            revision: 1,
            definition: b"counter-sm".to_vec(),
            oid: None,
        }
    }

    fn on_subscription(&self, _event_trigger: &[u8]) -> Result<SubscriptionTiming, Cause> {
        Ok(self.timing)
    }

    fn on_indication(&self, trigger: IndicationTrigger<'_>) -> IndicationData {
        let n = self.produced.fetch_add(1, Ordering::SeqCst);
        let message = match trigger {
            IndicationTrigger::Periodic { .. } => n.to_be_bytes().to_vec(),
            IndicationTrigger::Aperiodic { payload } => payload.to_vec(),
        };
        IndicationData {
            header: b"counter".to_vec(),
            message,
            call_process_id: None,
        }
    }

    fn on_control(&self, _header: &[u8], _message: &[u8]) -> Result<Option<Vec<u8>>, Cause> {
        Err(Cause::ControlMessageInvalid)
    }

    fn on_service_update(&self) -> RanFunction {
        self.on_setup()
    }

    fn release_action_definition(&self, definition: Vec<u8>) {
        self.released.lock().push(definition);
    }
}

pub fn send(peer: &ChannelPeer, msg: &E2apMessage) {
    peer.send(JsonCodec.encode(msg).expect("encode"))
        .expect("send to agent");
}

/// Wait for the next PDU from the agent accepted by `want`, skipping others.
pub fn expect_pdu(
    peer: &ChannelPeer,
    timeout: Duration,
    want: impl Fn(&E2apMessage) -> bool,
) -> E2apMessage {
    let deadline = Instant::now() + timeout;
    loop {
        let left = deadline.saturating_duration_since(Instant::now());
        assert!(!left.is_zero(), "expected PDU not received in {:?}", timeout);
        if let Some(bytes) = peer.recv_timeout(left) {
            let msg = JsonCodec.decode(&bytes).expect("decode");
            if want(&msg) {
                return msg;
            }
        }
    }
}

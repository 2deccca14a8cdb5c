// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Example code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Examples panic on failure

//! Dummy E2 agent.
//!
//! Connects to a RIC, advertises one "traffic counter" RAN function and, once
//! subscribed, reports a synthetic byte counter every interval plus an
//! aperiodic event every few seconds from a separate RAN thread.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p e2agent --example dummy_agent -- 127.0.0.1 36421
//! ```

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use e2agent::{
    AgentConfig, Cause, E2Agent, GlobalNodeId, IndicationData, IndicationTrigger, NodeType, Plmn,
    RanFunction, ServiceModel, ServiceModelRegistry, SubscriptionTiming, E2AP_DEFAULT_PORT,
};

const TRAFFIC_RAN_FUNC_ID: u16 = 148;

/// Pretend RAN function: counts "bytes" and reports them.
struct TrafficCounter {
    bytes: AtomicU64,
}

impl ServiceModel for TrafficCounter {
    fn ran_function_id(&self) -> u16 {
        TRAFFIC_RAN_FUNC_ID
    }

    fn name(&self) -> &str {
        "traffic-counter"
    }

    fn on_setup(&self) -> RanFunction {
        RanFunction {
            id: TRAFFIC_RAN_FUNC_ID,
            revision: 1,
            definition: b"TRAFFIC_COUNTER".to_vec(),
            oid: Some("1.3.6.1.4.1.53148.1.1.2.148".to_string()),
        }
    }

    /// Event trigger: interval in milliseconds as a big-endian u32, or empty
    /// for aperiodic reporting.
    fn on_subscription(&self, event_trigger: &[u8]) -> Result<SubscriptionTiming, Cause> {
        match event_trigger {
            [] => Ok(SubscriptionTiming::Aperiodic),
            [a, b, c, d] => Ok(SubscriptionTiming::Periodic(Duration::from_millis(
                u64::from(u32::from_be_bytes([*a, *b, *c, *d])),
            ))),
            _ => Err(Cause::EventTriggerNotSupported),
        }
    }

    fn on_indication(&self, trigger: IndicationTrigger<'_>) -> IndicationData {
        let bytes = self.bytes.fetch_add(1500, Ordering::Relaxed);
        let message = match trigger {
            IndicationTrigger::Periodic { .. } => bytes.to_be_bytes().to_vec(),
            IndicationTrigger::Aperiodic { payload } => payload.to_vec(),
        };
        IndicationData {
            header: b"traffic".to_vec(),
            message,
            call_process_id: None,
        }
    }

    fn on_control(&self, _header: &[u8], message: &[u8]) -> Result<Option<Vec<u8>>, Cause> {
        if message == b"reset" {
            self.bytes.store(0, Ordering::Relaxed);
            Ok(None)
        } else {
            Err(Cause::ControlMessageInvalid)
        }
    }

    fn on_service_update(&self) -> RanFunction {
        self.on_setup()
    }
}

fn main() -> e2agent::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let address = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args
        .next()
        .and_then(|p| p.parse().ok())
        .unwrap_or(E2AP_DEFAULT_PORT);

    let config = AgentConfig::default().with_ric(address, port);
    let node = GlobalNodeId {
        node_type: NodeType::Gnb,
        plmn: Plmn {
            mcc: 1,
            mnc: 1,
            mnc_digit_len: 2,
        },
        nb_id: 3584,
        unit_id: None,
    };

    let mut models = ServiceModelRegistry::new();
    models.register(Arc::new(TrafficCounter {
        bytes: AtomicU64::new(0),
    }))?;

    let agent = E2Agent::initialize(&config, node, models)?;
    let handle = agent.handle();

    // RAN thread raising an event on RIC request 1 every 5 s.
    let ran = handle.clone();
    thread::spawn(move || loop {
        thread::sleep(Duration::from_secs(5));
        if ran.is_stopped() {
            break;
        }
        if let Err(e) = ran.try_deliver_aperiodic_indication(1, b"handover".to_vec()) {
            log::debug!("no subscription for the event yet: {}", e);
        }
    });

    agent.start()
}

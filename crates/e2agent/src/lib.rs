// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # e2agent - O-RAN E2 agent endpoint
//!
//! The node side of the E2 interface: connects to a near-RT RIC, advertises
//! the RAN functions served by pluggable service models, answers
//! subscription, control and service-query procedures, and emits indications
//! either periodically or when the RAN asks for one.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use e2agent::{AgentConfig, E2Agent, GlobalNodeId, NodeType, Plmn, ServiceModelRegistry};
//! use std::time::Duration;
//!
//! # fn plugins() -> ServiceModelRegistry { ServiceModelRegistry::new() }
//! fn main() -> e2agent::Result<()> {
//!     let config = AgentConfig::default().with_ric("10.0.2.10", 36421);
//!     let node = GlobalNodeId {
//!         node_type: NodeType::Gnb,
//!         plmn: Plmn { mcc: 1, mnc: 1, mnc_digit_len: 2 },
//!         nb_id: 3584,
//!         unit_id: None,
//!     };
//!
//!     let agent = E2Agent::initialize(&config, node, plugins())?;
//!     let handle = agent.handle();
//!     let reactor = std::thread::spawn(move || agent.start());
//!
//!     // ... RAN threads call handle.deliver_aperiodic_indication(..)
//!
//!     handle.request_shutdown();
//!     handle.await_termination(Duration::from_secs(1));
//!     let _ = reactor.join();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                     E2Agent reactor (one thread)                    |
//! |   classify -> dispatch -> acknowledge, setup handshake, teardown    |
//! +---------------------------------------------------------------------+
//! |   IndicationRegistry (locked)  |  PendingRegistry  |  IndicationQueue |
//! +---------------------------------------------------------------------+
//! |   Multiplexer (mio) : transport fd | eventfd | timerfd              |
//! +---------------------------------------------------------------------+
//! |   Transport (TCP / in-process)  |  E2apCodec  |  ServiceModel plugins |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`agent`] - Reactor, setup handshake, [`AgentHandle`]
//! - [`registry`] - Dual-key event registries
//! - [`sm`] - Service model contract and registry
//! - [`e2ap`] - PDU types and codec
//! - [`transport`] - TCP and in-process endpoints
//! - [`rt`] - Timers, wake signals and the readiness multiplexer (Linux)

pub mod agent;
pub mod config;
pub mod e2ap;
mod error;
pub mod queue;
pub mod registry;
pub mod rt;
pub mod sm;
pub mod transport;

pub use agent::{AgentHandle, AsyncEvent, E2Agent, SetupState};
pub use config::{AgentConfig, E2AP_DEFAULT_PORT};
#[cfg(feature = "config-loaders")]
pub use config::AgentConfigDocument;
pub use e2ap::{Cause, E2apCodec, GlobalNodeId, JsonCodec, NodeType, Plmn, RanFunction, RicRequestId};
pub use error::{Error, Result};
pub use registry::IndicationKey;
pub use sm::{IndicationData, IndicationTrigger, ServiceModel, ServiceModelRegistry, SubscriptionTiming};
pub use transport::{ChannelPeer, ChannelTransport, TcpEndpoint, Transport};

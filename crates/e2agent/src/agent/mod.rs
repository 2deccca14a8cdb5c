// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! E2 agent: reactor context and thread-safe control handle.
//!
//! # Architecture
//!
//! ```text
//!  RAN threads                          reactor thread (E2Agent::start)
//!  -----------                          -------------------------------
//!  AgentHandle                          Multiplexer
//!   |  deliver_aperiodic_indication       |- transport endpoint
//!   |    lock(indications) resolve        |- queue wake signal
//!   |    queue.push + notify  ----------> |- subscription timers
//!   |                                     '- setup retry timer
//!   |  request_shutdown -> stop flag      |
//!   '  await_termination <- stopped flag  v
//!                                      classify -> dispatch -> acknowledge
//! ```
//!
//! The indication registry is the only state shared with other threads and
//! sits behind a single lock. The pending registry belongs to the reactor.

mod event;
mod handler;
mod reactor;
mod send;
mod setup;

pub use event::AsyncEvent;
pub use setup::SetupState;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::AgentConfig;
use crate::e2ap::{E2apCodec, GlobalNodeId, JsonCodec};
use crate::error::{Error, Result};
use crate::queue::IndicationQueue;
use crate::registry::{AperiodicIndicationEvent, IndicationKey, IndicationRegistry, PendingRegistry};
use crate::rt::{Multiplexer, SourceHandle};
use crate::sm::ServiceModelRegistry;
use crate::transport::{TcpEndpoint, Transport};

/// State reachable from both the reactor and producer threads.
pub(crate) struct AgentShared {
    pub(crate) indications: Mutex<IndicationRegistry>,
    pub(crate) queue: IndicationQueue,
    pub(crate) stop: AtomicBool,
    pub(crate) stopped: AtomicBool,
    lookup_attempts: u32,
    lookup_backoff: Duration,
    shutdown_poll_interval: Duration,
}

/// Agent reactor context. Consumed by [`E2Agent::start`].
pub struct E2Agent {
    node_id: GlobalNodeId,
    models: ServiceModelRegistry,
    transport: Box<dyn Transport>,
    codec: Box<dyn E2apCodec>,
    mux: Multiplexer,
    pending: PendingRegistry,
    setup: SetupState,
    shared: Arc<AgentShared>,
    net: SourceHandle,
    net_open: bool,
    setup_retry_interval: Duration,
    poll_timeout: Duration,
    next_indication_sn: u32,
}

impl E2Agent {
    /// Connect to the RIC over TCP and prepare the reactor.
    ///
    /// PDUs are encoded with [`JsonCodec`].
    pub fn initialize(
        config: &AgentConfig,
        node_id: GlobalNodeId,
        models: ServiceModelRegistry,
    ) -> Result<Self> {
        config.validate()?;
        let endpoint = TcpEndpoint::connect(config)?;
        Self::with_transport(config, node_id, models, Box::new(endpoint), Box::new(JsonCodec))
    }

    /// Prepare the reactor on an already connected endpoint.
    pub fn with_transport(
        config: &AgentConfig,
        node_id: GlobalNodeId,
        models: ServiceModelRegistry,
        transport: Box<dyn Transport>,
        codec: Box<dyn E2apCodec>,
    ) -> Result<Self> {
        config.validate()?;

        let shared = Arc::new(AgentShared {
            indications: Mutex::new(IndicationRegistry::new()),
            queue: IndicationQueue::new()?,
            stop: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            lookup_attempts: config.aperiodic_lookup_attempts,
            lookup_backoff: config.aperiodic_lookup_backoff,
            shutdown_poll_interval: config.shutdown_poll_interval,
        });

        let mut mux = Multiplexer::new(config.max_events)?;
        let net = transport.source();
        mux.register(net)?;
        mux.register(shared.queue.source())?;

        log::debug!(
            "[e2-agent] initialized {} with {} RAN function(s)",
            node_id,
            models.len()
        );
        Ok(Self {
            node_id,
            models,
            transport,
            codec,
            mux,
            pending: PendingRegistry::new(),
            setup: SetupState::NotStarted,
            shared,
            net,
            net_open: true,
            setup_retry_interval: config.setup_retry_interval,
            poll_timeout: config.poll_timeout,
            next_indication_sn: 0,
        })
    }

    /// Control handle usable from any thread.
    pub fn handle(&self) -> AgentHandle {
        AgentHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Send the setup request and run the reactor until shutdown is requested.
    ///
    /// Blocks the calling thread. The stopped flag is raised once every timer
    /// and subscription has been released, whatever the outcome.
    ///
    /// # Panics
    ///
    /// Panics if no service model is registered.
    pub fn start(mut self) -> Result<()> {
        let result = self.begin_setup().and_then(|()| self.run());
        if let Err(e) = &result {
            log::error!("[e2-agent] reactor aborted: {}", e);
        }
        self.teardown();
        self.shared.stopped.store(true, Ordering::Release);
        log::info!("[e2-agent] reactor stopped");
        result
    }
}

/// Cloneable, thread-safe handle on a running agent.
#[derive(Clone)]
pub struct AgentHandle {
    shared: Arc<AgentShared>,
}

impl AgentHandle {
    /// Ask the reactor to stop. Returns immediately.
    pub fn request_shutdown(&self) {
        log::debug!("[e2-agent] shutdown requested");
        self.shared.stop.store(true, Ordering::Release);
    }

    /// Whether the reactor has finished and released its state.
    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Poll the stopped flag until it is set or `timeout` elapses.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_stopped() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(self.shared.shutdown_poll_interval);
        }
    }

    /// Queue one indication for an established subscription.
    ///
    /// The subscription may have been accepted an instant ago, so the lookup
    /// is retried a bounded number of times (see
    /// [`AgentConfig::aperiodic_lookup_budget`]).
    pub fn try_deliver_aperiodic_indication(&self, ric_req_id: u32, payload: Vec<u8>) -> Result<()> {
        for attempt in 0..self.shared.lookup_attempts {
            if attempt > 0 {
                thread::sleep(self.shared.lookup_backoff);
            }

            let resolved = {
                let indications = self.shared.indications.lock();
                indications
                    .resolve_request(ric_req_id)
                    .map(|(_, ev)| (ev.ric_id, ev.action_id, ev.ran_func_id, Arc::clone(&ev.sm)))
            };

            if let Some((ric_id, action_id, ran_func_id, sm)) = resolved {
                self.shared.queue.push(AperiodicIndicationEvent {
                    ric_id,
                    action_id,
                    ran_func_id,
                    sm,
                    payload,
                });
                return Ok(());
            }
        }
        Err(Error::UnknownRicRequest(ric_req_id))
    }

    /// Queue one indication for an established subscription.
    ///
    /// # Panics
    ///
    /// Panics if no subscription carries `ric_req_id` once the lookup budget
    /// is spent.
    pub fn deliver_aperiodic_indication(&self, ric_req_id: u32, payload: Vec<u8>) {
        if let Err(e) = self.try_deliver_aperiodic_indication(ric_req_id, payload) {
            panic!(
                "aperiodic indication requested before its subscription exists: {} ({} lookups)",
                e, self.shared.lookup_attempts
            );
        }
    }

    /// Keys of the active subscriptions, in key order.
    pub fn active_subscriptions(&self) -> Vec<IndicationKey> {
        self.shared.indications.lock().keys()
    }
}

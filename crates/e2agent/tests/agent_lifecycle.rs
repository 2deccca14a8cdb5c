// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::too_many_lines)] // Scenario tests

//! End-to-end agent lifecycle over the in-process transport.
//!
//! The reactor runs on its own thread, the test plays the RIC through a
//! `ChannelPeer`.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{expect_pdu, node, ric_id, send, CounterModel};
use e2agent::e2ap::{
    ActionType, E2SetupResponse, E2apMessage, RicAction, RicSubscriptionDeleteRequest,
    RicSubscriptionRequest,
};
use e2agent::{
    AgentConfig, ChannelTransport, E2Agent, JsonCodec, RicRequestId, ServiceModel,
    ServiceModelRegistry, SubscriptionTiming,
};

const WAIT: Duration = Duration::from_secs(3);

fn config() -> AgentConfig {
    AgentConfig::default()
        .with_setup_retry_interval(Duration::from_millis(50))
        .with_poll_timeout(Duration::from_millis(10))
}

fn subscription(req: u32, ran_func_id: u16, definition: &[u8]) -> E2apMessage {
    E2apMessage::SubscriptionRequest(RicSubscriptionRequest {
        ric_id: RicRequestId::new(req, 0),
        ran_func_id,
        event_trigger: Vec::new(),
        actions: vec![RicAction {
            id: 1,
            kind: ActionType::Report,
            definition: Some(definition.to_vec()),
        }],
    })
}

#[test]
fn test_full_session() {
    let periodic = Arc::new(CounterModel::new(
        2,
        SubscriptionTiming::Periodic(Duration::from_millis(20)),
    ));
    let aperiodic = Arc::new(CounterModel::new(3, SubscriptionTiming::Aperiodic));
    let mut models = ServiceModelRegistry::new();
    models.register(periodic.clone() as Arc<dyn ServiceModel>).expect("sm 2");
    models.register(aperiodic.clone() as Arc<dyn ServiceModel>).expect("sm 3");

    let (transport, peer) = ChannelTransport::pair().expect("pair");
    let agent = E2Agent::with_transport(
        &config(),
        node(),
        models,
        Box::new(transport),
        Box::new(JsonCodec),
    )
    .expect("agent");
    let handle = agent.handle();
    let reactor = thread::spawn(move || agent.start());

    // Setup handshake.
    let setup = expect_pdu(&peer, WAIT, |m| matches!(m, E2apMessage::SetupRequest(_)));
    let E2apMessage::SetupRequest(setup) = setup else {
        unreachable!()
    };
    assert_eq!(setup.node_id, node());
    assert_eq!(
        setup.ran_functions.iter().map(|rf| rf.id).collect::<Vec<_>>(),
        vec![2, 3]
    );
    send(
        &peer,
        &E2apMessage::SetupResponse(E2SetupResponse {
            ric_id: ric_id(),
            accepted: vec![2, 3],
            rejected: Vec::new(),
        }),
    );

    // Periodic subscription.
    send(&peer, &subscription(100, 2, b"periodic-def"));
    expect_pdu(&peer, WAIT, |m| matches!(m, E2apMessage::SubscriptionResponse(_)));
    for _ in 0..2 {
        let msg = expect_pdu(&peer, WAIT, |m| matches!(m, E2apMessage::Indication(_)));
        let E2apMessage::Indication(ind) = msg else {
            unreachable!()
        };
        assert_eq!((ind.ric_id.ric_req_id, ind.action_id, ind.ran_func_id), (100, 1, 2));
    }

    // Aperiodic subscription, triggered from this thread.
    send(&peer, &subscription(200, 3, b"aperiodic-def"));
    expect_pdu(&peer, WAIT, |m| {
        matches!(m, E2apMessage::SubscriptionResponse(r) if r.ric_id.ric_req_id == 200)
    });
    handle.deliver_aperiodic_indication(200, b"event".to_vec());
    let msg = expect_pdu(&peer, WAIT, |m| {
        matches!(m, E2apMessage::Indication(ind) if ind.ric_id.ric_req_id == 200)
    });
    let E2apMessage::Indication(ind) = msg else {
        unreachable!()
    };
    assert_eq!(ind.action_id, 1);
    assert_eq!(ind.message, b"event".to_vec());
    assert_eq!(aperiodic.produced.load(Ordering::SeqCst), 1);

    // Remove the periodic stream; the aperiodic one is released at shutdown.
    send(
        &peer,
        &E2apMessage::SubscriptionDeleteRequest(RicSubscriptionDeleteRequest {
            ric_id: RicRequestId::new(100, 0),
            ran_func_id: 2,
        }),
    );
    expect_pdu(&peer, WAIT, |m| {
        matches!(m, E2apMessage::SubscriptionDeleteResponse(_))
    });
    assert_eq!(periodic.released.lock().as_slice(), &[b"periodic-def".to_vec()]);
    assert_eq!(handle.active_subscriptions().len(), 1);

    handle.request_shutdown();
    assert!(handle.await_termination(WAIT));
    assert!(handle.is_stopped());
    reactor.join().expect("reactor thread").expect("reactor result");

    assert_eq!(aperiodic.released.lock().as_slice(), &[b"aperiodic-def".to_vec()]);
    assert!(handle.active_subscriptions().is_empty());

    // Nothing leaves the agent once it reported itself stopped.
    while peer.try_recv().is_some() {}
    thread::sleep(Duration::from_millis(50));
    assert!(peer.try_recv().is_none());
}

#[test]
fn test_setup_resent_until_answered() {
    let sm = Arc::new(CounterModel::new(1, SubscriptionTiming::Aperiodic));
    let mut models = ServiceModelRegistry::new();
    models.register(sm as Arc<dyn ServiceModel>).expect("sm");

    let (transport, peer) = ChannelTransport::pair().expect("pair");
    let agent = E2Agent::with_transport(
        &config(),
        node(),
        models,
        Box::new(transport),
        Box::new(JsonCodec),
    )
    .expect("agent");
    let handle = agent.handle();
    let reactor = thread::spawn(move || agent.start());

    let is_setup = |m: &E2apMessage| matches!(m, E2apMessage::SetupRequest(_));
    let first = expect_pdu(&peer, WAIT, is_setup);
    let second = expect_pdu(&peer, WAIT, is_setup);
    let third = expect_pdu(&peer, WAIT, is_setup);
    assert_eq!(first, second);
    assert_eq!(second, third);

    handle.request_shutdown();
    assert!(handle.await_termination(WAIT));
    reactor.join().expect("reactor thread").expect("reactor result");
}

#[test]
fn test_session_end_keeps_reactor_alive() {
    let sm = Arc::new(CounterModel::new(1, SubscriptionTiming::Aperiodic));
    let mut models = ServiceModelRegistry::new();
    models.register(sm as Arc<dyn ServiceModel>).expect("sm");

    let (transport, peer) = ChannelTransport::pair().expect("pair");
    let agent = E2Agent::with_transport(
        &config(),
        node(),
        models,
        Box::new(transport),
        Box::new(JsonCodec),
    )
    .expect("agent");
    let handle = agent.handle();
    let reactor = thread::spawn(move || agent.start());

    expect_pdu(&peer, WAIT, |m| matches!(m, E2apMessage::SetupRequest(_)));
    drop(peer);

    thread::sleep(Duration::from_millis(100));
    assert!(!handle.is_stopped());

    handle.request_shutdown();
    assert!(handle.await_termination(WAIT));
    reactor.join().expect("reactor thread").expect("reactor result");
}

#[test]
fn test_await_termination_times_out_while_running() {
    let sm = Arc::new(CounterModel::new(1, SubscriptionTiming::Aperiodic));
    let mut models = ServiceModelRegistry::new();
    models.register(sm as Arc<dyn ServiceModel>).expect("sm");

    let (transport, _peer) = ChannelTransport::pair().expect("pair");
    let agent = E2Agent::with_transport(
        &config(),
        node(),
        models,
        Box::new(transport),
        Box::new(JsonCodec),
    )
    .expect("agent");
    let handle = agent.handle();
    let reactor = thread::spawn(move || agent.start());

    assert!(!handle.await_termination(Duration::from_millis(30)));

    handle.request_shutdown();
    assert!(handle.await_termination(WAIT));
    reactor.join().expect("reactor thread").expect("reactor result");
}

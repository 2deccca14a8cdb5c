// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Active indication subscriptions.

use std::fmt;
use std::sync::Arc;

use super::{DualKeyRegistry, RegistryEntry};
use crate::e2ap::RicRequestId;
use crate::rt::SourceHandle;
use crate::sm::ServiceModel;

/// Logical key of a subscription's indication stream.
///
/// Ordered lexicographically by request id, then action id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndicationKey {
    pub ric_id: RicRequestId,
    pub action_id: u8,
}

impl IndicationKey {
    pub fn new(ric_id: RicRequestId, action_id: u8) -> Self {
        Self { ric_id, action_id }
    }

    /// Smallest key carrying `ric_req_id`.
    fn first_of(ric_req_id: u32) -> Self {
        Self::new(RicRequestId::new(ric_req_id, 0), 0)
    }

    /// Largest key carrying `ric_req_id`.
    fn last_of(ric_req_id: u32) -> Self {
        Self::new(RicRequestId::new(ric_req_id, u16::MAX), u8::MAX)
    }
}

/// One active subscription.
///
/// Owns the action definition received at subscription time; dropping the
/// event hands it back to the service model.
pub struct IndicationEvent {
    pub ric_id: RicRequestId,
    pub action_id: u8,
    pub ran_func_id: u16,
    pub sm: Arc<dyn ServiceModel>,
    action_definition: Option<Vec<u8>>,
}

impl IndicationEvent {
    pub fn new(
        ric_id: RicRequestId,
        action_id: u8,
        sm: Arc<dyn ServiceModel>,
        action_definition: Option<Vec<u8>>,
    ) -> Self {
        Self {
            ric_id,
            action_id,
            ran_func_id: sm.ran_function_id(),
            sm,
            action_definition,
        }
    }

    pub fn key(&self) -> IndicationKey {
        IndicationKey::new(self.ric_id, self.action_id)
    }

    pub fn action_definition(&self) -> Option<&[u8]> {
        self.action_definition.as_deref()
    }

    /// Copy of what the reactor needs to emit one indication outside the lock.
    pub fn target(&self) -> IndicationTarget {
        IndicationTarget {
            ric_id: self.ric_id,
            action_id: self.action_id,
            ran_func_id: self.ran_func_id,
            sm: Arc::clone(&self.sm),
            action_definition: self.action_definition.clone(),
        }
    }
}

impl Drop for IndicationEvent {
    fn drop(&mut self) {
        if let Some(def) = self.action_definition.take() {
            self.sm.release_action_definition(def);
        }
    }
}

impl fmt::Debug for IndicationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndicationEvent")
            .field("ric_id", &self.ric_id)
            .field("action_id", &self.action_id)
            .field("ran_func_id", &self.ran_func_id)
            .field("sm", &self.sm.name())
            .finish_non_exhaustive()
    }
}

/// Snapshot of a subscription, detached from the registry.
#[derive(Clone)]
pub struct IndicationTarget {
    pub ric_id: RicRequestId,
    pub action_id: u8,
    pub ran_func_id: u16,
    pub sm: Arc<dyn ServiceModel>,
    pub action_definition: Option<Vec<u8>>,
}

impl fmt::Debug for IndicationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndicationTarget")
            .field("ric_id", &self.ric_id)
            .field("action_id", &self.action_id)
            .field("ran_func_id", &self.ran_func_id)
            .finish_non_exhaustive()
    }
}

/// Request for one externally triggered indication.
///
/// Built on the caller's thread, consumed once by the reactor.
pub struct AperiodicIndicationEvent {
    pub ric_id: RicRequestId,
    pub action_id: u8,
    pub ran_func_id: u16,
    pub sm: Arc<dyn ServiceModel>,
    pub payload: Vec<u8>,
}

impl fmt::Debug for AperiodicIndicationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AperiodicIndicationEvent")
            .field("ric_id", &self.ric_id)
            .field("action_id", &self.action_id)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

/// Subscriptions keyed by timer handle and by `{request id, action id}`.
///
/// Shared with producer threads behind the agent's single indication lock.
#[derive(Default)]
pub struct IndicationRegistry {
    inner: DualKeyRegistry<IndicationKey, IndicationEvent>,
}

impl IndicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscription triggered by `source`. Returns displaced entries.
    pub fn insert(
        &mut self,
        source: SourceHandle,
        event: IndicationEvent,
    ) -> Vec<RegistryEntry<IndicationKey, IndicationEvent>> {
        let key = event.key();
        self.inner.insert(source, key, event)
    }

    /// Subscription fired by `source`.
    pub fn target(&self, source: SourceHandle) -> Option<IndicationTarget> {
        self.inner.find_by_source(source).map(IndicationEvent::target)
    }

    /// First subscription (lowest instance and action id) of a RIC request.
    pub fn resolve_request(&self, ric_req_id: u32) -> Option<(SourceHandle, &IndicationEvent)> {
        self.inner
            .find_first_in(IndicationKey::first_of(ric_req_id)..=IndicationKey::last_of(ric_req_id))
            .map(|(src, _, ev)| (src, ev))
    }

    pub fn find(&self, key: &IndicationKey) -> Option<(SourceHandle, &IndicationEvent)> {
        self.inner.find_by_key(key)
    }

    /// Remove every action of one RIC request.
    pub fn remove_request(
        &mut self,
        ric_id: RicRequestId,
    ) -> Vec<RegistryEntry<IndicationKey, IndicationEvent>> {
        let first = IndicationKey::new(ric_id, 0);
        let last = IndicationKey::new(ric_id, u8::MAX);
        self.inner
            .sources_in(first..=last)
            .into_iter()
            .filter_map(|src| self.inner.remove_by_source(src))
            .collect()
    }

    pub fn remove_by_source(
        &mut self,
        source: SourceHandle,
    ) -> Option<RegistryEntry<IndicationKey, IndicationEvent>> {
        self.inner.remove_by_source(source)
    }

    pub fn drain(&mut self) -> Vec<RegistryEntry<IndicationKey, IndicationEvent>> {
        self.inner.drain()
    }

    pub fn contains_source(&self, source: SourceHandle) -> bool {
        self.inner.contains_source(source)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Logical keys of all subscriptions, in key order.
    pub fn keys(&self) -> Vec<IndicationKey> {
        self.inner.iter().map(|(_, k, _)| *k).collect()
    }
}

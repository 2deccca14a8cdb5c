// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Service models: per-RAN-function capability plugins.
//!
//! A service model implements five procedures (E2 setup, subscription,
//! indication, control, RIC service update) plus an optional release hook for
//! the action definitions it receives. The agent reaches plugins only through
//! the [`ServiceModelRegistry`], which keeps them in registration order.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ServiceModelRegistry::new();
//! registry.register(Arc::new(MacStats::new(ran_io)))?;
//! registry.register(Arc::new(KpmMonitor::new(ran_io)))?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::e2ap::{Cause, RanFunction};
use crate::error::{Error, Result};

/// How a subscription produces indications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionTiming {
    /// Emit an indication every interval.
    Periodic(Duration),
    /// Emit indications only when the RAN calls
    /// [`AgentHandle::deliver_aperiodic_indication`](crate::AgentHandle::deliver_aperiodic_indication).
    Aperiodic,
}

/// Input of the indication procedure.
#[derive(Clone, Copy, Debug)]
pub enum IndicationTrigger<'a> {
    /// Subscription timer fired; carries the stored action definition.
    Periodic { action_definition: Option<&'a [u8]> },
    /// External event; carries the payload supplied by the RAN thread.
    Aperiodic { payload: &'a [u8] },
}

/// Output of the indication procedure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndicationData {
    pub header: Vec<u8>,
    pub message: Vec<u8>,
    pub call_process_id: Option<Vec<u8>>,
}

/// Contract every RAN function plugin implements.
pub trait ServiceModel: Send + Sync {
    /// RAN function id. Must equal the key the plugin is registered under.
    fn ran_function_id(&self) -> u16;

    /// Short name for logs.
    fn name(&self) -> &str;

    /// Capability descriptor for the E2 setup request.
    fn on_setup(&self) -> RanFunction;

    /// Decode an event trigger and decide how the subscription fires.
    fn on_subscription(&self, event_trigger: &[u8]) -> core::result::Result<SubscriptionTiming, Cause>;

    /// Produce one indication.
    fn on_indication(&self, trigger: IndicationTrigger<'_>) -> IndicationData;

    /// Apply a control request; returns the optional outcome bytes.
    fn on_control(&self, header: &[u8], message: &[u8]) -> core::result::Result<Option<Vec<u8>>, Cause>;

    /// Descriptor for a RIC service update.
    fn on_service_update(&self) -> RanFunction;

    /// Take back an action definition handed over at subscription time.
    ///
    /// Called exactly once per stored definition when the subscription is
    /// removed. The default just drops it.
    fn release_action_definition(&self, definition: Vec<u8>) {
        drop(definition);
    }
}

/// Registered service models, unique by RAN function id, in registration order.
#[derive(Default)]
pub struct ServiceModelRegistry {
    models: Vec<Arc<dyn ServiceModel>>,
    by_id: HashMap<u16, usize>,
}

impl ServiceModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin. Rejects a second plugin for the same RAN function id.
    pub fn register(&mut self, model: Arc<dyn ServiceModel>) -> Result<()> {
        let id = model.ran_function_id();
        if self.by_id.contains_key(&id) {
            return Err(Error::DuplicateRanFunction(id));
        }
        log::debug!("[sm] registered RAN function {} ({})", id, model.name());
        self.by_id.insert(id, self.models.len());
        self.models.push(model);
        Ok(())
    }

    /// Plugin serving `ran_func_id`.
    pub fn get(&self, ran_func_id: u16) -> Option<&Arc<dyn ServiceModel>> {
        self.by_id.get(&ran_func_id).map(|&idx| &self.models[idx])
    }

    /// `(id, plugin)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Arc<dyn ServiceModel>)> {
        self.models.iter().map(|m| (m.ran_function_id(), m))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Setup descriptors of every plugin, in registration order.
    ///
    /// # Panics
    ///
    /// Panics if a plugin reports a descriptor for another RAN function id.
    pub fn setup_descriptors(&self) -> Vec<RanFunction> {
        self.iter()
            .map(|(id, sm)| {
                let rf = sm.on_setup();
                assert_eq!(rf.id, id, "RAN function mismatch in setup descriptor of {}", sm.name());
                rf
            })
            .collect()
    }

    /// Service update descriptors of every plugin, in registration order.
    pub fn service_update_descriptors(&self) -> Vec<RanFunction> {
        self.iter().map(|(_, sm)| sm.on_service_update()).collect()
    }
}

impl fmt::Debug for ServiceModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|(id, sm)| (id, sm.name().to_string())))
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted service model shared by the crate's unit tests.

    use super::*;
    use parking_lot::Mutex;

    /// Test plugin recording every call it receives.
    pub struct ScriptedModel {
        pub id: u16,
        pub timing: core::result::Result<SubscriptionTiming, Cause>,
        pub control: core::result::Result<Option<Vec<u8>>, Cause>,
        pub setup_calls: Mutex<u32>,
        pub released: Mutex<Vec<Vec<u8>>>,
        pub triggers: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn new(id: u16) -> Self {
            Self {
                id,
                timing: Ok(SubscriptionTiming::Periodic(Duration::from_secs(3600))),
                control: Ok(Some(b"done".to_vec())),
                setup_calls: Mutex::new(0),
                released: Mutex::new(Vec::new()),
                triggers: Mutex::new(Vec::new()),
            }
        }

        pub fn aperiodic(id: u16) -> Self {
            Self {
                timing: Ok(SubscriptionTiming::Aperiodic),
                ..Self::new(id)
            }
        }
    }

    impl ServiceModel for ScriptedModel {
        fn ran_function_id(&self) -> u16 {
            self.id
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn on_setup(&self) -> RanFunction {
            *self.setup_calls.lock() += 1;
            RanFunction {
                id: self.id,
                revision: 1,
                definition: format!("sm-{}", self.id).into_bytes(),
                oid: Some(format!("1.3.6.1.4.1.53148.1.1.2.{}", self.id)),
            }
        }

        fn on_subscription(&self, _event_trigger: &[u8]) -> core::result::Result<SubscriptionTiming, Cause> {
            self.timing
        }

        fn on_indication(&self, trigger: IndicationTrigger<'_>) -> IndicationData {
            let (tag, body) = match trigger {
                IndicationTrigger::Periodic { action_definition } => {
                    ("periodic", action_definition.unwrap_or_default().to_vec())
                }
                IndicationTrigger::Aperiodic { payload } => ("aperiodic", payload.to_vec()),
            };
            self.triggers.lock().push(tag.to_string());
            IndicationData {
                header: tag.as_bytes().to_vec(),
                message: body,
                call_process_id: None,
            }
        }

        fn on_control(&self, _header: &[u8], _message: &[u8]) -> core::result::Result<Option<Vec<u8>>, Cause> {
            self.control.clone()
        }

        fn on_service_update(&self) -> RanFunction {
            let mut rf = self.on_setup();
            rf.revision = 2;
            rf
        }

        fn release_action_definition(&self, definition: Vec<u8>) {
            self.released.lock().push(definition);
        }
    }
}

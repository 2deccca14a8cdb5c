// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cross-thread queue of aperiodic indication requests.
//!
//! Producers (RAN threads) push under a short lock and post one token on the
//! queue's wake signal; the reactor sees the signal become readable and pops
//! exactly one request per token.

use std::collections::VecDeque;
use std::io;

use parking_lot::Mutex;

use crate::registry::AperiodicIndicationEvent;
use crate::rt::{EventFd, SourceHandle};

/// FIFO of [`AperiodicIndicationEvent`] paired with a semaphore wake signal.
#[derive(Debug)]
pub struct IndicationQueue {
    items: Mutex<VecDeque<AperiodicIndicationEvent>>,
    signal: EventFd,
}

impl IndicationQueue {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            items: Mutex::new(VecDeque::new()),
            signal: EventFd::new()?,
        })
    }

    /// Handle of the wake signal, registered with the reactor multiplexer.
    pub fn source(&self) -> SourceHandle {
        self.signal.handle()
    }

    /// Append a request and wake the reactor.
    ///
    /// The item is visible before the token is posted, so a woken reactor
    /// always finds it.
    pub fn push(&self, event: AperiodicIndicationEvent) {
        self.items.lock().push_back(event);
        self.signal.notify();
    }

    /// Oldest pending request.
    ///
    /// Does not touch the wake signal; the reactor consumes the token through
    /// the multiplexer.
    pub fn pop(&self) -> Option<AperiodicIndicationEvent> {
        self.items.lock().pop_front()
    }

    /// Drop every pending request. Returns how many were discarded.
    pub fn clear(&self) -> usize {
        let mut items = self.items.lock();
        let n = items.len();
        items.clear();
        while self.signal.consume() {}
        n
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::e2ap::RicRequestId;
    use crate::rt::source::consume_token;
    use crate::sm::testing::ScriptedModel;
    use crate::sm::ServiceModel;
    use std::sync::Arc;
    use std::thread;

    fn request(sm: &Arc<dyn ServiceModel>, req: u32, payload: &[u8]) -> AperiodicIndicationEvent {
        AperiodicIndicationEvent {
            ric_id: RicRequestId::new(req, 0),
            action_id: 1,
            ran_func_id: sm.ran_function_id(),
            sm: Arc::clone(sm),
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn test_fifo_order_and_one_token_per_push() {
        let sm: Arc<dyn ServiceModel> = Arc::new(ScriptedModel::aperiodic(2));
        let queue = IndicationQueue::new().expect("queue");
        queue.push(request(&sm, 7, b"a"));
        queue.push(request(&sm, 8, b"b"));

        let fd = queue.source().raw();
        assert!(consume_token(fd).expect("read").is_some());
        assert!(consume_token(fd).expect("read").is_some());
        assert!(consume_token(fd).expect("read").is_none());

        assert_eq!(queue.pop().map(|e| e.payload), Some(b"a".to_vec()));
        assert_eq!(queue.pop().map(|e| e.payload), Some(b"b".to_vec()));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_concurrent_producers() {
        let sm: Arc<dyn ServiceModel> = Arc::new(ScriptedModel::aperiodic(2));
        let queue = Arc::new(IndicationQueue::new().expect("queue"));

        let workers: Vec<_> = (0..4u32)
            .map(|t| {
                let queue = Arc::clone(&queue);
                let sm = Arc::clone(&sm);
                thread::spawn(move || {
                    for i in 0..50u32 {
                        queue.push(request(&sm, t * 100 + i, &i.to_be_bytes()));
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().expect("producer");
        }

        assert_eq!(queue.len(), 200);
        let mut tokens = 0;
        while consume_token(queue.source().raw()).expect("read").is_some() {
            tokens += 1;
        }
        assert_eq!(tokens, 200);
    }

    #[test]
    fn test_clear_discards_items_and_tokens() {
        let sm: Arc<dyn ServiceModel> = Arc::new(ScriptedModel::aperiodic(2));
        let queue = IndicationQueue::new().expect("queue");
        queue.push(request(&sm, 7, b"a"));
        queue.push(request(&sm, 7, b"b"));

        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
        assert!(consume_token(queue.source().raw()).expect("read").is_none());
    }
}

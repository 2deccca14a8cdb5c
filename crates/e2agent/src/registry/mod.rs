// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dual-key event registries.
//!
//! A [`DualKeyRegistry`] stores each record once and indexes it twice:
//!
//! ```text
//!   by_source: HashMap<SourceHandle, slot>      by_key: BTreeMap<K, slot>
//!                     \                                 /
//!                      +---------> slots[slot] <-------+
//!                                  { source, key, value }
//! ```
//!
//! The source side answers "which record does this ready descriptor
//! represent" once per reactor wake-up; the key side answers "which
//! descriptor serves this logical key" and supports ordered range scans.
//! Both indexes always describe the same set of entries: every mutation goes
//! through a method that updates both.
//!
//! Two instances exist in the agent: [`PendingRegistry`] for handshake
//! retries and [`IndicationRegistry`] for active subscriptions.

mod indication;
mod pending;

pub use indication::{
    AperiodicIndicationEvent, IndicationEvent, IndicationKey, IndicationRegistry, IndicationTarget,
};
pub use pending::{PendingEvent, PendingRecord, PendingRegistry};

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeBounds;

use crate::rt::SourceHandle;

/// An entry taken out of a registry.
#[derive(Debug)]
pub struct RegistryEntry<K, V> {
    pub source: SourceHandle,
    pub key: K,
    pub value: V,
}

struct Slot<K, V> {
    source: SourceHandle,
    key: K,
    value: V,
}

/// Bidirectional map `SourceHandle <-> K` with one value per entry.
pub struct DualKeyRegistry<K, V> {
    slots: Vec<Option<Slot<K, V>>>,
    free: Vec<usize>,
    by_source: HashMap<SourceHandle, usize>,
    by_key: BTreeMap<K, usize>,
}

impl<K: Ord + Clone, V> DualKeyRegistry<K, V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            by_source: HashMap::new(),
            by_key: BTreeMap::new(),
        }
    }

    /// Insert a record reachable from both `source` and `key`.
    ///
    /// Any existing entry using the same source handle, or the same logical
    /// key, is removed first and returned: the registry never holds two
    /// entries for one handle or one key.
    pub fn insert(&mut self, source: SourceHandle, key: K, value: V) -> Vec<RegistryEntry<K, V>> {
        let mut displaced = Vec::new();
        if let Some(old) = self.remove_by_source(source) {
            displaced.push(old);
        }
        if let Some(old) = self.remove_by_key(&key) {
            displaced.push(old);
        }

        let slot = Slot {
            source,
            key: key.clone(),
            value,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                idx
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };
        self.by_source.insert(source, idx);
        self.by_key.insert(key, idx);
        self.debug_check();
        displaced
    }

    /// Record registered for a source handle.
    pub fn find_by_source(&self, source: SourceHandle) -> Option<&V> {
        let idx = *self.by_source.get(&source)?;
        self.slot(idx).map(|s| &s.value)
    }

    /// Mutable access to the record of a source handle. Keys stay fixed.
    pub fn find_by_source_mut(&mut self, source: SourceHandle) -> Option<&mut V> {
        let idx = *self.by_source.get(&source)?;
        self.slots
            .get_mut(idx)
            .and_then(Option::as_mut)
            .map(|s| &mut s.value)
    }

    /// Source handle and record registered for a logical key.
    pub fn find_by_key(&self, key: &K) -> Option<(SourceHandle, &V)> {
        let idx = *self.by_key.get(key)?;
        self.slot(idx).map(|s| (s.source, &s.value))
    }

    /// First entry (in key order) whose key falls within `range`.
    pub fn find_first_in<R>(&self, range: R) -> Option<(SourceHandle, &K, &V)>
    where
        R: RangeBounds<K>,
    {
        let (_, &idx) = self.by_key.range(range).next()?;
        self.slot(idx).map(|s| (s.source, &s.key, &s.value))
    }

    /// Handles of every entry whose key falls within `range`, in key order.
    pub fn sources_in<R>(&self, range: R) -> Vec<SourceHandle>
    where
        R: RangeBounds<K>,
    {
        self.by_key
            .range(range)
            .filter_map(|(_, &idx)| self.slot(idx).map(|s| s.source))
            .collect()
    }

    /// Remove the entry registered for `source`.
    pub fn remove_by_source(&mut self, source: SourceHandle) -> Option<RegistryEntry<K, V>> {
        let idx = self.by_source.remove(&source)?;
        let slot = self.take_slot(idx);
        self.by_key.remove(&slot.key);
        self.debug_check();
        Some(RegistryEntry {
            source: slot.source,
            key: slot.key,
            value: slot.value,
        })
    }

    /// Remove the entry registered for `key`.
    pub fn remove_by_key(&mut self, key: &K) -> Option<RegistryEntry<K, V>> {
        let idx = self.by_key.remove(key)?;
        let slot = self.take_slot(idx);
        self.by_source.remove(&slot.source);
        self.debug_check();
        Some(RegistryEntry {
            source: slot.source,
            key: slot.key,
            value: slot.value,
        })
    }

    /// Remove every entry, in key order.
    pub fn drain(&mut self) -> Vec<RegistryEntry<K, V>> {
        let keys: Vec<K> = self.by_key.keys().cloned().collect();
        keys.iter().filter_map(|k| self.remove_by_key(k)).collect()
    }

    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }

    pub fn contains_source(&self, source: SourceHandle) -> bool {
        self.by_source.contains_key(&source)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (SourceHandle, &K, &V)> {
        self.by_key
            .values()
            .filter_map(move |&idx| self.slot(idx).map(|s| (s.source, &s.key, &s.value)))
    }

    fn slot(&self, idx: usize) -> Option<&Slot<K, V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn take_slot(&mut self, idx: usize) -> Slot<K, V> {
        let Some(slot) = self.slots.get_mut(idx).and_then(Option::take) else {
            panic!("registry index points at an empty slot ({})", idx);
        };
        self.free.push(idx);
        slot
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert_eq!(
            self.by_source.len(),
            self.by_key.len(),
            "registry views diverged"
        );
    }
}

impl<K: Ord + Clone, V> Default for DualKeyRegistry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(fd: i32) -> SourceHandle {
        SourceHandle::new(fd)
    }

    #[test]
    fn test_both_views_reach_same_record() {
        let mut reg: DualKeyRegistry<(u32, u8), &str> = DualKeyRegistry::new();
        assert!(reg.insert(h(10), (7, 1), "sub-7").is_empty());

        assert_eq!(reg.find_by_source(h(10)), Some(&"sub-7"));
        assert_eq!(reg.find_by_key(&(7, 1)), Some((h(10), &"sub-7")));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_remove_via_either_side_clears_both() {
        let mut reg: DualKeyRegistry<(u32, u8), u32> = DualKeyRegistry::new();
        reg.insert(h(10), (7, 1), 70);
        reg.insert(h(11), (8, 1), 80);

        let removed = reg.remove_by_key(&(7, 1)).expect("by key");
        assert_eq!(removed.source, h(10));
        assert!(reg.find_by_source(h(10)).is_none());

        let removed = reg.remove_by_source(h(11)).expect("by source");
        assert_eq!(removed.key, (8, 1));
        assert!(reg.find_by_key(&(8, 1)).is_none());
        assert!(reg.is_empty());
        assert!(reg.remove_by_source(h(11)).is_none());
    }

    #[test]
    fn test_colliding_source_replaces() {
        let mut reg: DualKeyRegistry<(u32, u8), u32> = DualKeyRegistry::new();
        reg.insert(h(10), (7, 1), 70);
        let displaced = reg.insert(h(10), (9, 1), 90);

        assert_eq!(displaced.len(), 1);
        assert_eq!(displaced[0].key, (7, 1));
        assert_eq!(reg.len(), 1);
        assert!(reg.find_by_key(&(7, 1)).is_none());
        assert_eq!(reg.find_by_source(h(10)), Some(&90));
    }

    #[test]
    fn test_colliding_key_replaces() {
        let mut reg: DualKeyRegistry<(u32, u8), u32> = DualKeyRegistry::new();
        reg.insert(h(10), (7, 1), 70);
        let displaced = reg.insert(h(12), (7, 1), 71);

        assert_eq!(displaced.len(), 1);
        assert_eq!(displaced[0].source, h(10));
        assert!(!reg.contains_source(h(10)));
        assert_eq!(reg.find_by_key(&(7, 1)), Some((h(12), &71)));
    }

    #[test]
    fn test_double_collision_displaces_two() {
        let mut reg: DualKeyRegistry<(u32, u8), u32> = DualKeyRegistry::new();
        reg.insert(h(10), (7, 1), 70);
        reg.insert(h(11), (8, 1), 80);
        let displaced = reg.insert(h(10), (8, 1), 99);
        assert_eq!(displaced.len(), 2);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_range_lookup_is_lexicographic() {
        let mut reg: DualKeyRegistry<(u32, u8), u32> = DualKeyRegistry::new();
        reg.insert(h(20), (8, 2), 82);
        reg.insert(h(21), (7, 3), 73);
        reg.insert(h(22), (8, 1), 81);

        let (src, key, _) = reg.find_first_in((8, 0)..=(8, u8::MAX)).expect("range");
        assert_eq!((src, *key), (h(22), (8, 1)));
        assert_eq!(reg.sources_in((8, 0)..=(8, u8::MAX)), vec![h(22), h(20)]);
        assert!(reg.find_first_in((9, 0)..=(9, u8::MAX)).is_none());

        let order: Vec<(u32, u8)> = reg.iter().map(|(_, k, _)| *k).collect();
        assert_eq!(order, vec![(7, 3), (8, 1), (8, 2)]);
    }

    #[test]
    fn test_slots_reused_after_removal() {
        let mut reg: DualKeyRegistry<u32, u32> = DualKeyRegistry::new();
        reg.insert(h(1), 1, 1);
        reg.remove_by_source(h(1));
        reg.insert(h(2), 2, 2);
        assert_eq!(reg.slots.len(), 1);
    }

    #[test]
    fn test_drain_empties_in_key_order() {
        let mut reg: DualKeyRegistry<u32, u32> = DualKeyRegistry::new();
        reg.insert(h(5), 3, 30);
        reg.insert(h(6), 1, 10);
        let drained: Vec<u32> = reg.drain().into_iter().map(|e| e.value).collect();
        assert_eq!(drained, vec![10, 30]);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_random_operations_keep_views_consistent() {
        let mut reg: DualKeyRegistry<(u32, u8), u64> = DualKeyRegistry::new();
        let mut rng = fastrand::Rng::with_seed(0x5eed);

        for step in 0..2000u64 {
            let fd = rng.i32(1..40);
            let key = (rng.u32(0..20), rng.u8(0..3));
            match rng.u8(0..3) {
                0 => {
                    reg.insert(h(fd), key, step);
                }
                1 => {
                    reg.remove_by_source(h(fd));
                }
                _ => {
                    reg.remove_by_key(&key);
                }
            }

            assert_eq!(reg.by_source.len(), reg.by_key.len());
            for (src, k, v) in reg.iter() {
                assert_eq!(reg.find_by_source(src), Some(v));
                assert_eq!(reg.find_by_key(k).map(|(s, _)| s), Some(src));
            }
        }
    }
}

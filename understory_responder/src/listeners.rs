// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener table: which handlers are attached to which nodes.
//!
//! Listeners are plain data. The table stores a caller-defined payload `P`
//! per registration (for example "which binding, which command") and hands
//! back a generational [`ListenerId`] that detaches it again. Invoking the
//! payload is left to whoever walks the dispatch sequence, so the table never
//! holds closures that borrow application state.
//!
//! ```
//! use understory_responder::listeners::ListenerTable;
//! use understory_responder::types::{EventKind, Listen, Phase};
//!
//! let mut table: ListenerTable<u32, &str> = ListenerTable::new();
//! let a = table.add(7, EventKind::Activate, Listen::Bubble, "select");
//! let _b = table.add(7, EventKind::Activate, Listen::Capture, "log");
//!
//! let at_target: Vec<_> = table
//!     .matching(&7, EventKind::Activate, Phase::Target)
//!     .into_iter()
//!     .filter_map(|id| table.get(id).map(|l| l.payload))
//!     .collect();
//! assert_eq!(at_target, ["select", "log"]);
//!
//! assert_eq!(table.remove(a).map(|l| l.payload), Some("select"));
//! assert!(table.remove(a).is_none());
//! ```

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::types::{EventKind, Listen, Phase};

/// Identifier of a registered listener (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(u32, u32);

impl ListenerId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A registered listener.
#[derive(Clone, Debug)]
pub struct Listener<K, P> {
    /// Node the listener is attached to.
    pub node: K,
    /// Event it subscribes to.
    pub kind: EventKind,
    /// Phase it is registered for.
    pub listen: Listen,
    /// Caller-defined payload.
    pub payload: P,
}

#[derive(Clone, Debug)]
struct Slot<K, P> {
    generation: u32,
    listener: Listener<K, P>,
}

/// Listeners indexed by node.
#[derive(Clone, Debug)]
pub struct ListenerTable<K, P> {
    slots: Vec<Option<Slot<K, P>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    by_node: HashMap<K, SmallVec<[ListenerId; 4]>>,
}

impl<K: Copy + Eq + Hash, P> Default for ListenerTable<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash, P> ListenerTable<K, P> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            by_node: HashMap::new(),
        }
    }

    /// Attach a listener to `node`.
    ///
    /// Registering the same payload twice yields two listeners; both fire.
    pub fn add(&mut self, node: K, kind: EventKind, listen: Listen, payload: P) -> ListenerId {
        let listener = Listener {
            node,
            kind,
            listen,
            payload,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(Slot {
                generation,
                listener,
            });
            (idx, generation)
        } else {
            self.slots.push(Some(Slot {
                generation: 1,
                listener,
            }));
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ListenerId uses 32-bit indices by design."
        )]
        let id = ListenerId(idx as u32, generation);
        self.by_node.entry(node).or_default().push(id);
        id
    }

    /// Detach a listener, returning it. Stale ids return `None`.
    pub fn remove(&mut self, id: ListenerId) -> Option<Listener<K, P>> {
        if !self.is_live(id) {
            return None;
        }
        let slot = self.slots[id.idx()].take()?;
        self.free_list.push(id.idx());
        let node = slot.listener.node;
        if let Some(ids) = self.by_node.get_mut(&node) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_node.remove(&node);
            }
        }
        Some(slot.listener)
    }

    /// Detach every listener attached to `node`; returns how many were removed.
    pub fn remove_node(&mut self, node: &K) -> usize {
        let Some(ids) = self.by_node.remove(node) else {
            return 0;
        };
        for id in &ids {
            self.slots[id.idx()] = None;
            self.free_list.push(id.idx());
        }
        ids.len()
    }

    /// Detach every listener for which `keep` returns false; returns how many
    /// were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&Listener<K, P>) -> bool) -> usize {
        let doomed: Vec<ListenerId> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let slot = slot.as_ref()?;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "ListenerId uses 32-bit indices by design."
                )]
                let id = ListenerId(idx as u32, slot.generation);
                (!keep(&slot.listener)).then_some(id)
            })
            .collect();
        doomed.into_iter().filter_map(|id| self.remove(id)).count()
    }

    /// Returns true if `id` refers to an attached listener.
    pub fn is_live(&self, id: ListenerId) -> bool {
        self.slots
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .is_some_and(|s| s.generation == id.1)
    }

    /// Access an attached listener.
    pub fn get(&self, id: ListenerId) -> Option<&Listener<K, P>> {
        if !self.is_live(id) {
            return None;
        }
        self.slots[id.idx()].as_ref().map(|s| &s.listener)
    }

    /// Snapshot of listeners on `node` that fire for `kind` during `phase`,
    /// in registration order.
    ///
    /// The snapshot is taken by id so callers can mutate the table while
    /// invoking; re-check with [`ListenerTable::get`] to skip listeners
    /// removed by an earlier handler.
    pub fn matching(&self, node: &K, kind: EventKind, phase: Phase) -> SmallVec<[ListenerId; 4]> {
        let Some(ids) = self.by_node.get(node) else {
            return SmallVec::new();
        };
        ids.iter()
            .copied()
            .filter(|&id| {
                self.get(id)
                    .is_some_and(|l| l.kind == kind && l.listen.fires_in(phase))
            })
            .collect()
    }

    /// Number of attached listeners.
    pub fn len(&self) -> usize {
        self.by_node.values().map(|ids| ids.len()).sum()
    }

    /// Returns true if no listener is attached.
    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_respects_kind_and_phase() {
        let mut table: ListenerTable<u32, u8> = ListenerTable::new();
        let bubble = table.add(1, EventKind::Activate, Listen::Bubble, 0);
        let capture = table.add(1, EventKind::Activate, Listen::Capture, 1);
        let custom = table.add(1, EventKind::Custom("close"), Listen::Bubble, 2);

        assert_eq!(
            table.matching(&1, EventKind::Activate, Phase::Capture).as_slice(),
            &[capture]
        );
        assert_eq!(
            table.matching(&1, EventKind::Activate, Phase::Bubble).as_slice(),
            &[bubble]
        );
        assert_eq!(
            table.matching(&1, EventKind::Custom("close"), Phase::Target).as_slice(),
            &[custom]
        );
        assert!(table.matching(&2, EventKind::Activate, Phase::Target).is_empty());
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut table: ListenerTable<u32, ()> = ListenerTable::new();
        let a = table.add(1, EventKind::Activate, Listen::Bubble, ());
        assert!(table.remove(a).is_some());
        assert!(!table.is_live(a));
        assert!(table.is_empty());

        let b = table.add(2, EventKind::Activate, Listen::Bubble, ());
        assert_eq!(a.0, b.0);
        assert!(table.is_live(b));
        assert!(!table.is_live(a));
        // A stale id must not detach the listener now living in its slot.
        assert!(table.remove(a).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn remove_node_detaches_all() {
        let mut table: ListenerTable<u32, ()> = ListenerTable::new();
        let a = table.add(1, EventKind::Activate, Listen::Bubble, ());
        let b = table.add(1, EventKind::Activate, Listen::Capture, ());
        let c = table.add(2, EventKind::Activate, Listen::Bubble, ());

        assert_eq!(table.remove_node(&1), 2);
        assert_eq!(table.remove_node(&1), 0);
        assert!(!table.is_live(a) && !table.is_live(b));
        assert!(table.is_live(c));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn retain_detaches_by_payload() {
        let mut table: ListenerTable<u32, u8> = ListenerTable::new();
        table.add(1, EventKind::Activate, Listen::Bubble, 0);
        let kept = table.add(2, EventKind::Activate, Listen::Bubble, 1);
        table.add(3, EventKind::Activate, Listen::Bubble, 0);

        assert_eq!(table.retain(|l| l.payload != 0), 2);
        assert_eq!(table.len(), 1);
        assert!(table.is_live(kept));
        assert!(table.matching(&1, EventKind::Activate, Phase::Target).is_empty());
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Reconstructs the root → target path of a node and emits the dispatch steps
//! for it: capture → target → bubble.
//!
//! Hit testing is out of scope; callers already know the target (the element
//! that was activated, or the focused element for keyboard activation).
//!
//! ## Paths
//!
//! The path is collected through a [`ParentLookup`] at routing time. Handlers
//! that restructure the tree while the sequence runs do not alter it, which
//! matches how browsers fix the propagation path before dispatching.

use alloc::vec::Vec;

use crate::types::{Dispatch, NoParent, ParentLookup, Phase};

/// Responder chain router.
///
/// ```
/// use understory_responder::router::Router;
/// use understory_responder::types::{ParentLookup, Phase};
///
/// struct Chain;
/// impl ParentLookup<u32> for Chain {
///     fn parent_of(&self, node: &u32) -> Option<u32> {
///         node.checked_sub(1)
///     }
/// }
///
/// let seq = Router::with_parent(Chain).dispatch_for(2);
/// let steps: Vec<_> = seq.iter().map(|d| (d.phase, d.node)).collect();
/// assert_eq!(steps, [
///     (Phase::Capture, 0), (Phase::Capture, 1),
///     (Phase::Target, 2),
///     (Phase::Bubble, 1), (Phase::Bubble, 0),
/// ]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Router<P = NoParent> {
    parent: P,
}

impl Router {
    /// Create a router whose nodes have no ancestors (singleton paths).
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P> Router<P> {
    /// Create a router with an explicit parent lookup provider.
    pub fn with_parent(parent: P) -> Self {
        Self { parent }
    }

    /// Access the parent lookup.
    pub fn parent(&self) -> &P {
        &self.parent
    }

    /// Emit the dispatch sequence for `target`.
    pub fn dispatch_for<K: Copy + Eq>(&self, target: K) -> Vec<Dispatch<K>>
    where
        P: ParentLookup<K>,
    {
        emit_path(&reconstruct_path(target, &self.parent))
    }
}

/// Collect `target` and its ancestors, ordered root → target.
pub fn reconstruct_path<K: Copy + Eq>(target: K, parent_lookup: &impl ParentLookup<K>) -> Vec<K> {
    let mut out = Vec::new();
    let mut cur = target;
    // Collect to root; the lookup guarantees acyclic ancestry.
    loop {
        out.push(cur);
        match parent_lookup.parent_of(&cur) {
            Some(p) => cur = p,
            None => break,
        }
    }
    out.reverse();
    out
}

/// Emit capture → target → bubble steps for a root → target path.
pub fn emit_path<K: Copy>(path: &[K]) -> Vec<Dispatch<K>> {
    let Some((&target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(ancestors.len() * 2 + 1);
    out.extend(ancestors.iter().map(|&n| Dispatch::capture(n)));
    out.push(Dispatch::target(target));
    out.extend(ancestors.iter().rev().map(|&n| Dispatch::bubble(n)));
    out
}

/// Recover the root → target path from a dispatch sequence.
pub fn path_from_dispatch<K: Copy>(seq: &[Dispatch<K>]) -> Vec<K> {
    seq.iter()
        .take_while(|d| d.phase != Phase::Bubble)
        .map(|d| d.node)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher;
    use crate::types::Outcome;
    use alloc::vec;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    struct Node(u32);

    /// 1 is the root, 2 its child, 3 the grandchild.
    struct Parents;
    impl ParentLookup<Node> for Parents {
        fn parent_of(&self, node: &Node) -> Option<Node> {
            match node.0 {
                3 => Some(Node(2)),
                2 => Some(Node(1)),
                _ => None,
            }
        }
    }

    #[test]
    fn dispatch_for_reconstructs_path() {
        let seq = Router::with_parent(Parents).dispatch_for(Node(3));
        assert_eq!(
            seq,
            vec![
                Dispatch::capture(Node(1)),
                Dispatch::capture(Node(2)),
                Dispatch::target(Node(3)),
                Dispatch::bubble(Node(2)),
                Dispatch::bubble(Node(1)),
            ]
        );
        assert_eq!(path_from_dispatch(&seq), vec![Node(1), Node(2), Node(3)]);
    }

    #[test]
    fn dispatch_for_singleton_without_parent() {
        let seq = Router::new().dispatch_for(Node(7));
        assert_eq!(seq, vec![Dispatch::target(Node(7))]);
    }

    #[test]
    fn empty_path_emits_nothing() {
        assert!(emit_path::<Node>(&[]).is_empty());
    }

    #[test]
    fn router_dispatch_and_dispatcher_stop_skips_bubble() {
        let seq = Router::with_parent(Parents).dispatch_for(Node(2));
        let mut seen = Vec::new();
        let stopped = dispatcher::run(&seq, &mut (), |d, _| {
            seen.push((d.phase, d.node.0));
            if d.phase == Phase::Target {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert_eq!(stopped, Some(&Dispatch::target(Node(2))));
        assert_eq!(seen, vec![(Phase::Capture, 1), (Phase::Target, 2)]);
    }

    #[test]
    fn target_element_receives_event_only_once() {
        let seq = Router::with_parent(Parents).dispatch_for(Node(3));
        let hits = seq.iter().filter(|d| d.node == Node(3)).count();
        assert_eq!(hits, 1);
    }
}

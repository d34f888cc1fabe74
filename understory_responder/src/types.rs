// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types shared by the router, the dispatcher and the listener table.

/// Propagation phase of a dispatch entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root → target, excluding the target.
    Capture,
    /// The target itself.
    Target,
    /// Target → root, excluding the target.
    Bubble,
}

/// Handler verdict controlling propagation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Keep propagating.
    #[default]
    Continue,
    /// Abort propagation immediately.
    Stop,
}

/// A single step of a responder sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node receiving the event at this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture-phase entry.
    pub fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// A target-phase entry.
    pub fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble-phase entry.
    pub fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Kind of event a listener subscribes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Click-equivalent activation (pointer click, Enter/Space on a focused control).
    Activate,
    /// Host-defined event, matched by name.
    Custom(&'static str),
}

/// Phase a listener is registered for.
///
/// Both kinds fire at the target; capture listeners also fire on the way
/// down and bubble listeners on the way up.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Listen {
    /// Capture phase and target.
    Capture,
    /// Target and bubble phase.
    #[default]
    Bubble,
}

impl Listen {
    /// Returns true if a listener registered this way fires during `phase`.
    pub fn fires_in(self, phase: Phase) -> bool {
        matches!(
            (self, phase),
            (_, Phase::Target) | (Self::Capture, Phase::Capture) | (Self::Bubble, Phase::Bubble)
        )
    }
}

/// Source of parent links used to reconstruct root → target paths.
pub trait ParentLookup<K> {
    /// Parent of `node`, or `None` for a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

impl<K, T: ParentLookup<K> + ?Sized> ParentLookup<K> for &T {
    fn parent_of(&self, node: &K) -> Option<K> {
        (**self).parent_of(node)
    }
}

/// Parent lookup for flat key spaces: every node is a root.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    fn parent_of(&self, _: &K) -> Option<K> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_phase_matrix() {
        assert!(Listen::Capture.fires_in(Phase::Capture));
        assert!(Listen::Capture.fires_in(Phase::Target));
        assert!(!Listen::Capture.fires_in(Phase::Bubble));
        assert!(!Listen::Bubble.fires_in(Phase::Capture));
        assert!(Listen::Bubble.fires_in(Phase::Target));
        assert!(Listen::Bubble.fires_in(Phase::Bubble));
    }
}

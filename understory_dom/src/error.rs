// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by structural document mutations.

use crate::types::NodeId;

/// Failure of a structural mutation on a [`Document`](crate::Document).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The identifier does not refer to a live node.
    #[error("node {0:?} is not alive")]
    Stale(NodeId),
    /// The node would become its own ancestor.
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Prospective parent.
        parent: NodeId,
        /// Node being inserted.
        child: NodeId,
    },
    /// The reference node of an insertion is not a child of the parent.
    #[error("{reference:?} is not a child of {parent:?}")]
    NotAChild {
        /// Parent the insertion targeted.
        parent: NodeId,
        /// Reference node that was expected among its children.
        reference: NodeId,
    },
}

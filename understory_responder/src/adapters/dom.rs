// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for Understory DOM.
//!
//! ## Feature
//!
//! Enable with `dom_adapter`.
//!
//! The document already knows every node's parent, so it is its own
//! [`ParentLookup`] and the router needs no extra bookkeeping.

use alloc::vec::Vec;

use understory_dom::{Document, NodeId};

use crate::router::Router;
use crate::types::{Dispatch, ParentLookup};

impl ParentLookup<NodeId> for Document {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        Self::parent_of(self, *node)
    }
}

/// Emit the capture → target → bubble sequence for an element of `doc`.
///
/// A detached element routes to itself only; a stale one yields nothing.
pub fn dispatch_for(doc: &Document, target: NodeId) -> Vec<Dispatch<NodeId>> {
    if !doc.is_alive(target) {
        return Vec::new();
    }
    Router::with_parent(doc).dispatch_for(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_dom::Element;

    #[test]
    fn routes_through_document_ancestry() {
        let mut doc = Document::new();
        let set = doc.insert(None, Element::new("div").with_role("tabset"));
        let bar = doc.insert(Some(set), Element::new("ul").with_role("tablist"));
        let tab = doc.insert(Some(bar), Element::new("li").with_role("tab"));

        assert_eq!(
            dispatch_for(&doc, tab),
            vec![
                Dispatch::capture(set),
                Dispatch::capture(bar),
                Dispatch::target(tab),
                Dispatch::bubble(bar),
                Dispatch::bubble(set),
            ]
        );

        doc.remove(tab);
        assert!(dispatch_for(&doc, tab).is_empty());
    }
}

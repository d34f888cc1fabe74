// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility and selection primitives.
//!
//! Thin helpers over [`Document::set_state`] that name the transitions roles
//! perform. All of them ignore stale identifiers.

use crate::document::Document;
use crate::types::{NodeId, StateFlags};

/// Clear the hidden marker.
pub fn show(doc: &mut Document, el: NodeId) {
    doc.set_state(el, StateFlags::HIDDEN, false);
}

/// Set the hidden marker.
pub fn hide(doc: &mut Document, el: NodeId) {
    doc.set_state(el, StateFlags::HIDDEN, true);
}

/// Returns true if the hidden marker is set.
pub fn is_hidden(doc: &Document, el: NodeId) -> bool {
    has(doc, el, StateFlags::HIDDEN)
}

/// Set the selected marker.
pub fn select(doc: &mut Document, el: NodeId) {
    doc.set_state(el, StateFlags::SELECTED, true);
}

/// Clear the selected marker.
pub fn deselect(doc: &mut Document, el: NodeId) {
    doc.set_state(el, StateFlags::SELECTED, false);
}

/// Returns true if the selected marker is set.
pub fn is_selected(doc: &Document, el: NodeId) -> bool {
    has(doc, el, StateFlags::SELECTED)
}

/// Set or clear the invalid marker.
pub fn set_invalid(doc: &mut Document, el: NodeId, invalid: bool) {
    doc.set_state(el, StateFlags::INVALID, invalid);
}

/// Returns true if the invalid marker is set.
pub fn is_invalid(doc: &Document, el: NodeId) -> bool {
    has(doc, el, StateFlags::INVALID)
}

fn has(doc: &Document, el: NodeId, flag: StateFlags) -> bool {
    doc.state(el).is_some_and(|s| s.contains(flag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Element, HIDDEN_ATTR, SELECTED_ATTR};

    #[test]
    fn markers_are_independent() {
        let mut doc = Document::new();
        let el = doc.insert(None, Element::new("section"));

        hide(&mut doc, el);
        select(&mut doc, el);
        set_invalid(&mut doc, el, true);
        assert!(is_hidden(&doc, el) && is_selected(&doc, el) && is_invalid(&doc, el));
        assert!(doc.has_attribute(el, HIDDEN_ATTR));

        show(&mut doc, el);
        assert!(!is_hidden(&doc, el));
        assert!(is_selected(&doc, el));

        deselect(&mut doc, el);
        set_invalid(&mut doc, el, false);
        assert!(!doc.has_attribute(el, SELECTED_ATTR));
        assert!(!is_invalid(&doc, el));
    }

    #[test]
    fn stale_nodes_read_as_unmarked() {
        let mut doc = Document::new();
        let el = doc.insert(None, Element::new("p"));
        hide(&mut doc, el);
        doc.remove(el);
        assert!(!is_hidden(&doc, el));
        // No panic on writes either.
        show(&mut doc, el);
    }
}

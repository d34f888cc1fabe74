// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element locator: find descendants by role token.
//!
//! ## Matching rule
//!
//! [`find_roles`] walks children in document order. A child that matches is
//! collected; with `deep` its subtree is searched too, otherwise the search
//! stops at that child. A child that does not match is always searched
//! through. This lets a composite find its own parts without descending into
//! nested composites of the same kind:
//!
//! ```
//! use understory_dom::{Document, Element, locate};
//!
//! let mut doc = Document::new();
//! let root = doc.insert(None, Element::new("div"));
//! let wrapper = doc.insert(Some(root), Element::new("div"));
//! let outer = doc.insert(Some(wrapper), Element::new("li").with_role("tab"));
//! let inner = doc.insert(Some(outer), Element::new("span").with_role("tab"));
//!
//! assert_eq!(locate::find_roles(&doc, root, Some("tab"), false), [outer]);
//! assert_eq!(locate::find_roles(&doc, root, Some("tab"), true), [outer, inner]);
//! assert_eq!(locate::get_role(&doc, root, "tab"), Some(outer));
//! ```

use alloc::vec::Vec;

use crate::document::Document;
use crate::types::NodeId;

/// Returns true if `el` declares `role`, or any role at all when `role` is `None`.
pub fn has_role(doc: &Document, el: NodeId, role: Option<&str>) -> bool {
    let roles = doc.roles(el);
    match role {
        Some(role) => roles.contains(role),
        None => !roles.is_empty(),
    }
}

/// Collect descendants of `container` declaring `role` (any role if `None`).
///
/// See the [module docs](self) for how `deep` affects matched subtrees.
pub fn find_roles(doc: &Document, container: NodeId, role: Option<&str>, deep: bool) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect(doc, container, role, deep, &mut out);
    out
}

/// First descendant of `container` in document order declaring `role`.
pub fn get_role(doc: &Document, container: NodeId, role: &str) -> Option<NodeId> {
    doc.descendants(container)
        .find(|&id| doc.has_role(id, role))
}

/// Collect role-bearing descendants of `container`, as [`find_roles`] with no role filter.
pub fn scan_roles(doc: &Document, container: NodeId, deep: bool) -> Vec<NodeId> {
    find_roles(doc, container, None, deep)
}

fn collect(doc: &Document, parent: NodeId, role: Option<&str>, deep: bool, out: &mut Vec<NodeId>) {
    for &child in doc.children_of(parent) {
        if has_role(doc, child, role) {
            out.push(child);
            if deep {
                collect(doc, child, role, deep, out);
            }
        } else {
            collect(doc, child, role, deep, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Element;
    use alloc::vec;

    #[test]
    fn finds_parts_through_plain_wrappers() {
        let mut doc = Document::new();
        let set = doc.insert(None, Element::new("div").with_role("tabset"));
        let bar = doc.insert(Some(set), Element::new("ul").with_role("tablist"));
        let li = doc.insert(Some(bar), Element::new("li"));
        let tab = doc.insert(Some(li), Element::new("a").with_role("tab"));
        let add = doc.insert(Some(bar), Element::new("li").with_role("addtab"));

        assert_eq!(find_roles(&doc, bar, Some("tab"), false), vec![tab]);
        assert_eq!(get_role(&doc, set, "addtab"), Some(add));
        assert_eq!(get_role(&doc, set, "tabpool"), None);
        // The container itself never matches.
        assert_eq!(get_role(&doc, set, "tabset"), None);
    }

    #[test]
    fn scan_without_role_stops_at_role_bearers_unless_deep() {
        let mut doc = Document::new();
        let root = doc.insert(None, Element::new("body"));
        let set = doc.insert(Some(root), Element::new("div").with_role("tabset"));
        let bar = doc.insert(Some(set), Element::new("ul").with_role("tablist"));
        let other = doc.insert(Some(root), Element::new("div").with_role("tabset"));

        assert_eq!(scan_roles(&doc, root, false), vec![set, other]);
        assert_eq!(scan_roles(&doc, root, true), vec![set, bar, other]);
    }

    #[test]
    fn get_role_is_pre_order() {
        let mut doc = Document::new();
        let root = doc.insert(None, Element::new("div"));
        let a = doc.insert(Some(root), Element::new("div"));
        let deep = doc.insert(Some(a), Element::new("span").with_role("closetab"));
        let _late = doc.insert(Some(root), Element::new("span").with_role("closetab"));
        assert_eq!(get_role(&doc, root, "closetab"), Some(deep));
    }
}

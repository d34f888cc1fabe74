// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, traversal.

use alloc::{borrow::Cow, string::ToString, vec::Vec};

use crate::error::DomError;
use crate::roles::RoleSet;
use crate::types::{Element, NodeId, ROLE_ATTR, StateFlags};

/// A retained tree of elements.
///
/// Nodes are addressed by generational [`NodeId`]s. A node is either attached
/// under a parent or a root; detached nodes stay alive until [`Document::remove`]
/// destroys them, so they can be re-inserted later (the way a browser keeps a
/// node removed with `removeChild`).
///
/// Every accessor tolerates stale identifiers: queries return `None` or an
/// empty value and plain mutations are ignored. Structural mutations that can
/// violate tree shape report a [`DomError`] instead.
///
/// ## Example
///
/// ```rust
/// use understory_dom::{Document, Element};
///
/// let mut doc = Document::new();
/// let list = doc.insert(None, Element::new("ul").with_role("tablist"));
/// let tab = doc.insert(Some(list), Element::new("li").with_role("tab"));
///
/// assert_eq!(doc.parent_of(tab), Some(list));
/// assert!(doc.has_role(tab, "tab"));
///
/// doc.detach(tab);
/// assert!(doc.children_of(list).is_empty());
/// assert!(doc.is_alive(tab));
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    focused: Option<NodeId>,
    /// returned for stale ids
    no_roles: RoleSet,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            focused: None,
            no_roles: RoleSet::default(),
        }
    }

    /// Insert a new element, appended under `parent` (or as a root if `None`).
    ///
    /// A stale `parent` leaves the new node as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let node = |generation| Node {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link(id, p, None);
        }
        id
    }

    /// Destroy a node and its subtree.
    ///
    /// All identifiers in the subtree become stale. Focus is cleared if it
    /// was inside the subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.detach(id);
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes[current.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(current.idx());
                if self.focused == Some(current) {
                    self.focused = None;
                }
            }
        }
    }

    /// Unlink a node from its parent; the node stays alive as a root.
    ///
    /// Returns true if the node had a parent.
    pub fn detach(&mut self, id: NodeId) -> bool {
        match self.parent_of(id) {
            Some(parent) => {
                self.unlink(id, parent);
                true
            }
            None => false,
        }
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already parented elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` right before `reference`.
    ///
    /// A `None` reference appends. The reference must be a current child of
    /// `parent`; inserting a node into its own subtree is rejected.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        for id in [parent, child] {
            if !self.is_alive(id) {
                return Err(DomError::Stale(id));
            }
        }
        if self.contains(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }
        if let Some(reference) = reference
            && (reference == child || self.parent_of(reference) != Some(parent))
        {
            return Err(DomError::NotAChild { parent, reference });
        }
        self.detach(child);
        self.link(child, parent, reference);
        Ok(())
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| &n.children)
    }

    /// Returns true if `node` is `ancestor` or lies in its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// Get the next node in depth-first (document) order.
    ///
    /// Returns `None` past the last node of the tree containing `current`, or
    /// if `current` is stale. Does not wrap around.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        let node = self.node(current)?;
        if let Some(&first_child) = node.children.first() {
            return Some(first_child);
        }
        let mut id = current;
        while let Some(parent) = self.parent_of(id) {
            if let Some(next) = self.next_sibling(id) {
                return Some(next);
            }
            id = parent;
        }
        None
    }

    /// Iterate the subtree below `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root,
            next: self.children_of(root).first().copied(),
        }
    }

    /// Tag name of a live node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| &*n.element.tag)
    }

    /// Read-only access to the element record of a live node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    // --- attributes ---

    /// Set an attribute.
    ///
    /// `role` replaces the parsed [`RoleSet`]; the ARIA state markers set
    /// their [`StateFlags`] bit regardless of `value`.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(id) {
            n.element.set_attr(name, value);
        }
    }

    /// Remove an attribute; returns true if it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.node_mut(id)
            .is_some_and(|n| n.element.remove_attr(name))
    }

    /// Returns true if the attribute is present.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.node(id).is_some_and(|n| n.element.has_attr(name))
    }

    /// Read an attribute.
    ///
    /// `role` is rendered from the token set and state markers read as
    /// `"true"` while set, so only those two cases allocate or borrow static
    /// text.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<Cow<'_, str>> {
        let el = &self.node(id)?.element;
        if name == ROLE_ATTR {
            return (!el.roles.is_empty()).then(|| Cow::Owned(el.roles.to_string()));
        }
        if let Some(flag) = StateFlags::for_attribute(name) {
            return el.state.contains(flag).then_some(Cow::Borrowed("true"));
        }
        el.attributes.get(name).map(|v| Cow::Borrowed(&**v))
    }

    // --- roles ---

    /// Role tokens of a node; empty for stale ids.
    pub fn roles(&self, id: NodeId) -> &RoleSet {
        self.node(id).map_or(&self.no_roles, |n| &n.element.roles)
    }

    /// Returns true if the node declares `role`.
    pub fn has_role(&self, id: NodeId, role: &str) -> bool {
        self.roles(id).contains(role)
    }

    /// Add a role token to a node.
    pub fn add_role(&mut self, id: NodeId, role: &str) -> bool {
        self.node_mut(id)
            .is_some_and(|n| n.element.roles.insert(role))
    }

    /// Remove a role token from a node, keeping the others in order.
    pub fn remove_role(&mut self, id: NodeId, role: &str) -> bool {
        self.node_mut(id)
            .is_some_and(|n| n.element.roles.remove(role))
    }

    // --- state ---

    /// State markers of a live node.
    pub fn state(&self, id: NodeId) -> Option<StateFlags> {
        self.node(id).map(|n| n.element.state)
    }

    /// Set or clear state markers.
    pub fn set_state(&mut self, id: NodeId, flags: StateFlags, on: bool) {
        if let Some(n) = self.node_mut(id) {
            n.element.state.set(flags, on);
        }
    }

    // --- focus ---

    /// Currently focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Move focus to a live node; stale ids are ignored.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.focused = Some(id);
        true
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children_of(self.parent_of(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Both ids must be live and `child` unparented.
    fn link(&mut self, child: NodeId, parent: NodeId, before: Option<NodeId>) {
        if let Some(p) = self.node_mut(parent) {
            let at = before
                .and_then(|r| p.children.iter().position(|&c| c == r))
                .unwrap_or(p.children.len());
            p.children.insert(at, child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn unlink(&mut self, child: NodeId, parent: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = None;
        }
    }
}

/// Pre-order iterator over a subtree, see [`Document::descendants`].
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = if let Some(&child) = self.doc.children_of(current).first() {
            Some(child)
        } else {
            // Climb until a sibling exists, without leaving the subtree.
            let mut id = current;
            loop {
                if id == self.root {
                    break None;
                }
                if let Some(sibling) = self.doc.next_sibling(id) {
                    break Some(sibling);
                }
                match self.doc.parent_of(id) {
                    Some(parent) if parent != self.root => id = parent,
                    _ => break None,
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HIDDEN_ATTR, SELECTED_ATTR};
    use alloc::vec;

    fn sample() -> (Document, NodeId, [NodeId; 4]) {
        // root
        // ├── a
        // │   └── a1
        // └── b
        //     └── b1
        let mut doc = Document::new();
        let root = doc.insert(None, Element::new("div"));
        let a = doc.insert(Some(root), Element::new("div"));
        let a1 = doc.insert(Some(a), Element::new("span"));
        let b = doc.insert(Some(root), Element::new("div"));
        let b1 = doc.insert(Some(b), Element::new("span"));
        (doc, root, [a, a1, b, b1])
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut doc = Document::new();
        let root = doc.insert(None, Element::new("div"));
        let child = doc.insert(Some(root), Element::new("p"));
        assert!(doc.is_alive(child));

        doc.remove(child);
        assert!(!doc.is_alive(child));
        assert!(doc.children_of(root).is_empty());

        // The slot is reused with a bumped generation; the old id stays stale.
        let again = doc.insert(Some(root), Element::new("p"));
        assert_eq!(again.0, child.0);
        assert_ne!(again, child);
        assert!(!doc.is_alive(child));
        assert_eq!(doc.tag(child), None);
    }

    #[test]
    fn remove_destroys_subtree_and_clears_focus() {
        let (mut doc, root, [a, a1, b, _]) = sample();
        assert!(doc.focus(a1));
        doc.remove(a);
        assert!(!doc.is_alive(a));
        assert!(!doc.is_alive(a1));
        assert_eq!(doc.children_of(root), &[b]);
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn detach_keeps_node_alive() {
        let (mut doc, root, [a, a1, b, _]) = sample();
        assert!(doc.detach(a));
        assert!(!doc.detach(a));
        assert_eq!(doc.children_of(root), &[b]);
        assert_eq!(doc.parent_of(a), None);
        assert_eq!(doc.parent_of(a1), Some(a));
    }

    #[test]
    fn insert_before_positions_and_validates() {
        let (mut doc, root, [a, a1, b, b1]) = sample();
        let c = doc.insert(None, Element::new("div"));
        doc.insert_before(root, c, Some(b)).unwrap();
        assert_eq!(doc.children_of(root), &[a, c, b]);

        // Moving an attached node re-parents it.
        doc.insert_before(root, b1, Some(a)).unwrap();
        assert_eq!(doc.children_of(root), &[b1, a, c, b]);
        assert!(doc.children_of(b).is_empty());

        assert_eq!(
            doc.insert_before(root, c, Some(a1)),
            Err(DomError::NotAChild {
                parent: root,
                reference: a1
            })
        );
        assert_eq!(
            doc.append_child(a1, root),
            Err(DomError::Cycle {
                parent: a1,
                child: root
            })
        );
        assert_eq!(doc.append_child(a, a), Err(DomError::Cycle { parent: a, child: a }));
    }

    #[test]
    fn stale_ids_are_reported() {
        let (mut doc, root, [a, ..]) = sample();
        doc.remove(a);
        assert_eq!(doc.append_child(root, a), Err(DomError::Stale(a)));
        assert!(!doc.focus(a));
        assert!(!doc.contains(root, a));
    }

    #[test]
    fn descendants_are_pre_order_and_bounded() {
        let (doc, root, [a, a1, b, b1]) = sample();
        assert_eq!(doc.descendants(root).collect::<Vec<_>>(), vec![a, a1, b, b1]);
        // Iterating a subtree does not escape into the following siblings.
        assert_eq!(doc.descendants(a).collect::<Vec<_>>(), vec![a1]);
        assert_eq!(doc.descendants(b1).count(), 0);
    }

    #[test]
    fn depth_first_traversal() {
        let (doc, root, [a, a1, b, b1]) = sample();
        assert_eq!(doc.next_depth_first(root), Some(a));
        assert_eq!(doc.next_depth_first(a), Some(a1));
        assert_eq!(doc.next_depth_first(a1), Some(b));
        assert_eq!(doc.next_depth_first(b), Some(b1));
        assert_eq!(doc.next_depth_first(b1), None);
    }

    #[test]
    fn attributes_route_roles_and_state() {
        let mut doc = Document::new();
        let el = doc.insert(None, Element::new("li"));
        doc.set_attribute(el, ROLE_ATTR, "tab closetab");
        doc.set_attribute(el, SELECTED_ATTR, "false");
        doc.set_attribute(el, "title", "Inbox");

        assert_eq!(doc.attribute(el, ROLE_ATTR).as_deref(), Some("tab closetab"));
        // Markers are presence based, like the attributes they mirror.
        assert_eq!(doc.attribute(el, SELECTED_ATTR).as_deref(), Some("true"));
        assert_eq!(doc.attribute(el, HIDDEN_ATTR), None);
        assert_eq!(doc.attribute(el, "title").as_deref(), Some("Inbox"));

        assert!(doc.remove_role(el, "closetab"));
        assert_eq!(doc.attribute(el, ROLE_ATTR).as_deref(), Some("tab"));
        assert!(doc.remove_attribute(el, SELECTED_ATTR));
        assert_eq!(doc.state(el), Some(StateFlags::empty()));
    }
}

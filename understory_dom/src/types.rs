// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, state markers, and element records.

use alloc::boxed::Box;

use hashbrown::HashMap;

use crate::roles::RoleSet;

/// Attribute carrying the whitespace-separated role tokens of an element.
pub const ROLE_ATTR: &str = "role";
/// Presence-based marker for a selected element (for example an active tab header).
pub const SELECTED_ATTR: &str = "aria-selected";
/// Presence-based marker for a hidden element (for example an inactive tab panel).
pub const HIDDEN_ATTR: &str = "aria-hidden";
/// Presence-based marker for an element that failed validation.
pub const INVALID_ATTR: &str = "aria-invalid";

/// Identifier for a node in the document (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// State markers toggled on elements.
    ///
    /// Each flag mirrors a presence-based ARIA attribute: reading or writing
    /// [`SELECTED_ATTR`], [`HIDDEN_ATTR`] or [`INVALID_ATTR`] through the
    /// attribute API of [`Document`](crate::Document) reads or writes these bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StateFlags: u8 {
        /// `aria-selected` is present.
        const SELECTED = 0b0000_0001;
        /// `aria-hidden` is present.
        const HIDDEN   = 0b0000_0010;
        /// `aria-invalid` is present.
        const INVALID  = 0b0000_0100;
    }
}

impl StateFlags {
    /// Map a state attribute name to its flag, if it is one.
    pub fn for_attribute(name: &str) -> Option<Self> {
        match name {
            SELECTED_ATTR => Some(Self::SELECTED),
            HIDDEN_ATTR => Some(Self::HIDDEN),
            INVALID_ATTR => Some(Self::INVALID),
            _ => None,
        }
    }
}

/// Construction record for an element.
///
/// Passed to [`Document::insert`](crate::Document::insert). Attributes set
/// through [`Element::with_attr`] are routed the same way as
/// [`Document::set_attribute`](crate::Document::set_attribute): `role` is
/// parsed into [`Element::roles`] and the ARIA state markers land in
/// [`Element::state`].
#[derive(Clone, Debug, Default)]
pub struct Element {
    /// Tag name, informational only.
    pub tag: Box<str>,
    /// Parsed role tokens.
    pub roles: RoleSet,
    /// Plain attributes (never contains `role` or the state markers).
    pub attributes: HashMap<Box<str>, Box<str>>,
    /// State markers.
    pub state: StateFlags,
}

impl Element {
    /// Create an element with the given tag and nothing else.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder form of [`Element::set_attr`].
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Shorthand for `with_attr("role", roles)`.
    pub fn with_role(self, roles: &str) -> Self {
        self.with_attr(ROLE_ATTR, roles)
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: &str) {
        if name == ROLE_ATTR {
            self.roles = RoleSet::parse(value);
        } else if let Some(flag) = StateFlags::for_attribute(name) {
            self.state.insert(flag);
        } else {
            self.attributes.insert(name.into(), value.into());
        }
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> bool {
        if name == ROLE_ATTR {
            let had = !self.roles.is_empty();
            self.roles = RoleSet::default();
            had
        } else if let Some(flag) = StateFlags::for_attribute(name) {
            let had = self.state.contains(flag);
            self.state.remove(flag);
            had
        } else {
            self.attributes.remove(name).is_some()
        }
    }

    pub(crate) fn has_attr(&self, name: &str) -> bool {
        if name == ROLE_ATTR {
            !self.roles.is_empty()
        } else if let Some(flag) = StateFlags::for_attribute(name) {
            self.state.contains(flag)
        } else {
            self.attributes.contains_key(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_routes_role_and_state_attributes() {
        let el = Element::new("li")
            .with_role("tab  closetab")
            .with_attr(SELECTED_ATTR, "true")
            .with_attr("title", "first");
        assert!(el.roles.contains("tab"));
        assert!(el.roles.contains("closetab"));
        assert_eq!(el.state, StateFlags::SELECTED);
        assert_eq!(el.attributes.len(), 1);
        assert!(el.has_attr("title"));
        assert!(el.has_attr(SELECTED_ATTR));
        assert!(!el.has_attr(HIDDEN_ATTR));
    }

    #[test]
    fn remove_attr_reports_presence() {
        let mut el = Element::new("div").with_attr(HIDDEN_ATTR, "");
        assert!(el.remove_attr(HIDDEN_ATTR));
        assert!(!el.remove_attr(HIDDEN_ATTR));
        assert!(!el.remove_attr(ROLE_ATTR));
    }
}

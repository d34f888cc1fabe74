// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DOM: a retained element tree for declarative role bindings.
//!
//! Understory DOM is the document model under `understory_roles`. It keeps just
//! enough of a browser document to let markup declare behavior:
//!
//! - Elements in a parent/child hierarchy addressed by generational [`NodeId`]s.
//! - A parsed [`RoleSet`] per element, read from and written to the `role` attribute.
//! - Presence-based state markers ([`StateFlags`]) mirrored as `aria-selected`,
//!   `aria-hidden` and `aria-invalid`.
//! - Plain string attributes, used for option discovery.
//! - A single focused element.
//!
//! ## Not a browser
//!
//! There is no layout, styling, parsing of markup, or script. Hosts build the
//! tree through [`Document::insert`] and the structural mutations, and read
//! it back through the accessors. Event delivery lives in
//! `understory_responder`.
//!
//! ## API overview
//!
//! - [`Document`]: the tree.
//! - [`Element`]: construction record with builder helpers.
//! - [`locate`]: find descendants by role ([`locate::find_roles`], [`locate::get_role`], [`locate::scan_roles`]).
//! - [`state`]: [`state::show`]/[`state::hide`], [`state::select`]/[`state::deselect`] and the invalid marker.
//! - [`DomError`]: structural mutation failures.
//!
//! ```rust
//! use understory_dom::{Document, Element, locate, state};
//!
//! let mut doc = Document::new();
//! let set = doc.insert(None, Element::new("div").with_role("tabset"));
//! let bar = doc.insert(Some(set), Element::new("ul").with_role("tablist"));
//! let tab = doc.insert(Some(bar), Element::new("li").with_role("tab"));
//!
//! assert_eq!(locate::get_role(&doc, set, "tablist"), Some(bar));
//! state::select(&mut doc, tab);
//! assert!(doc.has_attribute(tab, "aria-selected"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod error;
pub mod locate;
mod roles;
pub mod state;
mod types;

pub use document::{Descendants, Document};
pub use error::DomError;
pub use roles::RoleSet;
pub use types::{Element, HIDDEN_ATTR, INVALID_ATTR, NodeId, ROLE_ATTR, SELECTED_ATTR, StateFlags};

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Roles: behaviors bound to document elements by role name.
//!
//! An element opts into a behavior by listing its name in the `role`
//! attribute. A [`Roles`] host looks names up in a [`RoleRegistry`], binds the
//! matching controllers, and routes activations (clicks, key presses) from the
//! document to the controllers whose listeners lie on the event path.
//!
//! The built-in role is [`tabset`](crate::tabset): paired tab headers and
//! panels with at most one active pair.
//!
//! - [`registry`]: the [`Role`]/[`RoleSpec`] traits, [`Ctx`] and the registry.
//! - [`options`]: option discovery from attributes over declared defaults.
//! - [`tabset`]: the tabset controller.
//! - [`emitter`]: broadcast of controller notifications.
//! - [`validate`]: the invalid-marker validation primitive.
//!
//! ## Example
//!
//! ```
//! use understory_dom::{Document, Element, state};
//! use understory_roles::Roles;
//! use understory_roles::tabset::{Tabset, TabsetOptions};
//!
//! let mut doc = Document::new();
//! let root = doc.insert(None, Element::new("div"));
//! let bar = doc.insert(Some(root), Element::new("nav").with_role("tablist"));
//! let tab = doc.insert(Some(bar), Element::new("a").with_role("tab"));
//! let close = doc.insert(Some(tab), Element::new("button").with_role("closetab"));
//! let panel = doc.insert(Some(root), Element::new("section").with_role("tabpanel"));
//!
//! let mut roles = Roles::default();
//! let options = TabsetOptions::default().closable(true);
//! let binding = roles.bind::<Tabset>(&mut doc, root, Some(options)).unwrap();
//!
//! roles.activate(&mut doc, tab);
//! assert!(state::is_selected(&doc, tab));
//!
//! roles.activate(&mut doc, close);
//! assert_eq!(doc.parent_of(panel), None);
//! assert!(roles.get::<Tabset>(binding).is_some_and(Tabset::is_empty));
//! ```
//!
//! ## Features
//!
//! - `std` (default): std support in dependencies.
//! - `libm`: `no_std` float math for pointer positions.
//! - `pattern`: `validate::Validator::Pattern`, backed by `regex`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod emitter;
mod error;
mod host;
pub mod options;
pub mod registry;
pub mod tabset;
pub mod validate;

pub use error::BindError;
pub use host::Roles;
pub use registry::{BindingId, Command, Ctx, Role, RoleRegistry, RoleSpec};

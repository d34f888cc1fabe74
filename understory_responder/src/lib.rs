// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Responder: deterministic, `no_std` event delivery for UI trees.
//!
//! ## Overview
//!
//! This crate answers three questions for an event aimed at a node:
//!
//! - **Who listens?** A [`ListenerTable`](crate::listeners::ListenerTable) maps nodes to
//!   listener registrations carrying a caller-defined payload, detachable by
//!   [`ListenerId`](crate::listeners::ListenerId).
//! - **In which order?** The [`Router`](crate::router::Router) reconstructs the
//!   root → target path through a [`ParentLookup`](crate::types::ParentLookup) and emits the
//!   capture → target → bubble sequence.
//! - **When to stop?** [`dispatcher::run`] walks that sequence and honors
//!   [`Outcome::Stop`](crate::types::Outcome::Stop).
//!
//! Raw pointer input becomes an activation through [`click::ClickState`].
//!
//! ## Layering
//!
//! Listeners are data, not closures. Whoever drives the dispatcher resolves
//! the payloads of matching listeners and invokes its own handlers, which
//! keeps application state borrowable while an event is in flight.
//!
//! ```
//! use understory_responder::dispatcher;
//! use understory_responder::listeners::ListenerTable;
//! use understory_responder::router::Router;
//! use understory_responder::types::{EventKind, Listen, Outcome, ParentLookup};
//!
//! // 0 is the root, 1 a child of it.
//! struct Parents;
//! impl ParentLookup<u32> for Parents {
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         (*node == 1).then_some(0)
//!     }
//! }
//!
//! let mut table = ListenerTable::new();
//! table.add(0, EventKind::Activate, Listen::Bubble, "root saw it");
//! table.add(1, EventKind::Activate, Listen::Bubble, "child saw it");
//!
//! let seq = Router::with_parent(Parents).dispatch_for(1);
//! let mut log = Vec::new();
//! dispatcher::run(&seq, &mut log, |d, log| {
//!     for id in table.matching(&d.node, EventKind::Activate, d.phase) {
//!         if let Some(l) = table.get(id) {
//!             log.push(l.payload);
//!         }
//!     }
//!     Outcome::Continue
//! });
//! assert_eq!(log, ["child saw it", "root saw it"]);
//! ```
//!
//! ## Adapters
//!
//! - **DOM adapter** (`dom_adapter` feature): routes over an `understory_dom::Document`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod click;
pub mod dispatcher;
pub mod listeners;
pub mod router;
pub mod types;

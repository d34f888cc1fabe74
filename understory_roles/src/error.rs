// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced when binding a role to an element.

use alloc::boxed::Box;

use understory_dom::NodeId;

/// Binding a role failed; no controller was created.
///
/// Lookup failures inside operations on an existing controller are not
/// errors: they resolve to `None`/`false` and leave state untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// No factory is registered under this role name.
    #[error("no role named `{0}` is registered")]
    UnknownRole(Box<str>),
    /// A required part of the composite is missing from the markup.
    #[error("required `{role}` element not found")]
    MissingRole {
        /// Role token that was looked for.
        role: &'static str,
    },
    /// The markup declares a different number of tab headers and panels.
    #[error("found {tabs} tab headers but {panels} tab panels")]
    MismatchedCount {
        /// Discovered headers.
        tabs: usize,
        /// Discovered panels.
        panels: usize,
    },
    /// The element to bind is not alive.
    #[error("element {0:?} is not alive")]
    Stale(NodeId),
}

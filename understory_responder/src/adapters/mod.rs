// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters for integrating with other Understory crates.
//!
//! These are optional and gated behind features:
//! - `dom_adapter`: routing over an `understory_dom::Document`.

#[cfg(feature = "dom_adapter")]
pub mod dom;

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validation primitive: sets or clears the invalid marker on an element.
//!
//! ```
//! use understory_dom::{Document, Element};
//! use understory_roles::validate::{Validator, is_valid, validate};
//!
//! let mut doc = Document::new();
//! let input = doc.insert(None, Element::new("input").with_attr("value", ""));
//! let non_empty = Validator::Check(|doc, el| doc.attribute(el, "value").is_some_and(|v| !v.is_empty()));
//!
//! assert!(!validate(&mut doc, input, &non_empty));
//! assert!(!is_valid(&doc, input));
//! doc.set_attribute(input, "value", "x");
//! assert!(validate(&mut doc, input, &non_empty));
//! assert!(is_valid(&doc, input));
//! ```

use understory_dom::{Document, NodeId, state};

/// How [`validate`] decides validity.
#[derive(Copy, Clone, Debug)]
pub enum Validator {
    /// A verdict decided by the caller.
    Valid(bool),
    /// A predicate over the element.
    Check(fn(&Document, NodeId) -> bool),
    /// The element's `value` attribute must match the regular expression in
    /// its `pattern` attribute (unanchored). Elements without a pattern, and
    /// patterns that fail to compile, count as valid.
    #[cfg(feature = "pattern")]
    Pattern,
}

/// Decide validity, mark the element accordingly and return the verdict.
pub fn validate(doc: &mut Document, el: NodeId, validator: &Validator) -> bool {
    let valid = match validator {
        Validator::Valid(valid) => *valid,
        Validator::Check(check) => check(doc, el),
        #[cfg(feature = "pattern")]
        Validator::Pattern => matches_pattern(doc, el),
    };
    state::set_invalid(doc, el, !valid);
    valid
}

/// Returns true unless the element carries the invalid marker.
pub fn is_valid(doc: &Document, el: NodeId) -> bool {
    !state::is_invalid(doc, el)
}

#[cfg(feature = "pattern")]
fn matches_pattern(doc: &Document, el: NodeId) -> bool {
    let Some(pattern) = doc.attribute(el, "pattern") else {
        return true;
    };
    let value = doc.attribute(el, "value").unwrap_or_default();
    match regex::Regex::new(&pattern) {
        Ok(re) => re.is_match(&value),
        Err(err) => {
            log::warn!("ignoring pattern {pattern:?}: {err}");
            true
        }
    }
}

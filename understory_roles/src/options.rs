// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option discovery: declared defaults merged with values found in markup.
//!
//! A role declares its options as a [`Configure`] type whose [`Default`] is
//! the declared defaults. For every key in [`Configure::KEYS`], the bound
//! element may override the default through, in order of precedence:
//!
//! 1. a plain attribute (`closable`),
//! 2. a role-prefixed attribute (`tabset-closable`),
//! 3. a data attribute (`data-tabset-closable`).
//!
//! ```
//! use understory_dom::{Document, Element};
//! use understory_roles::options::find_options;
//!
//! let mut doc = Document::new();
//! let el = doc.insert(
//!     None,
//!     Element::new("div")
//!         .with_attr("data-tabset-drawer", "")
//!         .with_attr("tabset-closable", "false"),
//! );
//! let found = find_options(&doc, el, "tabset", &["closable", "drawer", "missing"]);
//! assert_eq!(found, [("closable", String::from("false")), ("drawer", String::new())]);
//! ```

use alloc::{format, string::String, vec::Vec};

use understory_dom::{Document, NodeId};

/// Options of a role, configurable from markup.
pub trait Configure: Default {
    /// Keys looked up on the bound element.
    const KEYS: &'static [&'static str];

    /// Apply a value discovered for `key`. Unparseable values are ignored.
    fn configure(&mut self, key: &str, value: &str);
}

/// Collect markup-provided values for `keys`, in key order.
pub fn find_options(
    doc: &Document,
    el: NodeId,
    role: &str,
    keys: &[&'static str],
) -> Vec<(&'static str, String)> {
    let mut found = Vec::new();
    for &key in keys {
        let candidates = [
            String::from(key),
            format!("{role}-{key}"),
            format!("data-{role}-{key}"),
        ];
        if let Some(value) = candidates
            .iter()
            .find_map(|name| doc.attribute(el, name))
        {
            found.push((key, value.into_owned()));
        }
    }
    found
}

/// Declared defaults overridden by whatever the element carries.
pub fn options_from_markup<O: Configure>(doc: &Document, el: NodeId, role: &str) -> O {
    let mut options = O::default();
    for (key, value) in find_options(doc, el, role, O::KEYS) {
        options.configure(key, &value);
    }
    options
}

/// Parse a boolean attribute value.
///
/// Presence means true (`""`, `"true"`, or the key repeated as in
/// `closable="closable"`); `false`, `0`, `no` and `off` mean false. Anything
/// else is unparseable.
pub fn parse_flag(key: &str, value: &str) -> Option<bool> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case(key) {
        return Some(true);
    }
    ["false", "0", "no", "off"]
        .iter()
        .any(|f| value.eq_ignore_ascii_case(f))
        .then_some(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_dom::Element;

    #[derive(Debug, Default, PartialEq)]
    struct Opts {
        closable: bool,
        drawer: bool,
    }

    impl Configure for Opts {
        const KEYS: &'static [&'static str] = &["closable", "drawer"];

        fn configure(&mut self, key: &str, value: &str) {
            let Some(flag) = parse_flag(key, value) else {
                return;
            };
            match key {
                "closable" => self.closable = flag,
                "drawer" => self.drawer = flag,
                _ => {}
            }
        }
    }

    #[test]
    fn plain_attribute_wins_over_prefixed_forms() {
        let mut doc = Document::new();
        let el = doc.insert(
            None,
            Element::new("div")
                .with_attr("closable", "no")
                .with_attr("tabset-closable", "")
                .with_attr("data-tabset-closable", ""),
        );
        let found = find_options(&doc, el, "tabset", Opts::KEYS);
        assert_eq!(found, [("closable", String::from("no"))]);
    }

    #[test]
    fn markup_overrides_declared_defaults() {
        let mut doc = Document::new();
        let plain = doc.insert(None, Element::new("div"));
        let marked = doc.insert(None, Element::new("div").with_attr("data-tabset-drawer", "drawer"));

        assert_eq!(options_from_markup::<Opts>(&doc, plain, "tabset"), Opts::default());
        assert_eq!(
            options_from_markup::<Opts>(&doc, marked, "tabset"),
            Opts {
                closable: false,
                drawer: true
            }
        );
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("drawer", ""), Some(true));
        assert_eq!(parse_flag("drawer", "TRUE"), Some(true));
        assert_eq!(parse_flag("drawer", "drawer"), Some(true));
        assert_eq!(parse_flag("drawer", "off"), Some(false));
        assert_eq!(parse_flag("drawer", "0"), Some(false));
        assert_eq!(parse_flag("drawer", "sometimes"), None);
    }
}

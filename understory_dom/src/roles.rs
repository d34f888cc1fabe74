// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parsed role tokens.

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

/// The set of role tokens declared on an element.
///
/// Tokens are parsed once from the whitespace-separated `role` attribute.
/// Order of first appearance is preserved and duplicates are collapsed, so
/// membership checks never need pattern matching over the raw string.
///
/// ```
/// use understory_dom::RoleSet;
///
/// let roles = RoleSet::parse("  tab closetab tab ");
/// assert!(roles.contains("tab"));
/// assert!(!roles.contains("ta"));
/// assert_eq!(roles.to_string(), "tab closetab");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleSet {
    tokens: SmallVec<[Box<str>; 2]>,
}

impl RoleSet {
    /// Parse a whitespace-separated token list.
    pub fn parse(list: &str) -> Self {
        let mut set = Self::default();
        for token in list.split_whitespace() {
            set.insert(token);
        }
        set
    }

    /// Returns true if `role` is one of the tokens.
    pub fn contains(&self, role: &str) -> bool {
        self.tokens.iter().any(|t| &**t == role)
    }

    /// Add a token; returns false if it was already present or is blank.
    pub fn insert(&mut self, role: &str) -> bool {
        let role = role.trim();
        if role.is_empty() || self.contains(role) {
            return false;
        }
        self.tokens.push(role.into());
        true
    }

    /// Remove a token; returns false if it was not present.
    pub fn remove(&mut self, role: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| &**t != role);
        self.tokens.len() != before
    }

    /// Iterate tokens in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(|t| &**t)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if no token is declared.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    #[test]
    fn parse_collapses_whitespace_and_duplicates() {
        let roles = RoleSet::parse("\ttablist   addtab\ntablist");
        assert_eq!(roles.iter().collect::<Vec<_>>(), ["tablist", "addtab"]);
        assert_eq!(roles.len(), 2);
    }

    #[test]
    fn membership_is_by_whole_token() {
        let roles = RoleSet::parse("tablist");
        assert!(roles.contains("tablist"));
        assert!(!roles.contains("tab"));
        assert!(!roles.contains("list"));
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut roles = RoleSet::parse("a tabset b");
        assert!(roles.remove("tabset"));
        assert!(!roles.remove("tabset"));
        assert_eq!(roles.to_string(), "a b");
    }

    #[test]
    fn blank_tokens_are_rejected() {
        let mut roles = RoleSet::default();
        assert!(!roles.insert("   "));
        assert!(roles.is_empty());
        assert_eq!(roles.to_string(), "");
    }
}

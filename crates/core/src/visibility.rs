use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::code::family_of;

/// What a hide toggle applies to. A family hides every code sharing the prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HideTarget {
    Family(String),
    Code(String),
}

/// A user's hidden families and codes. Built from persisted rows and passed
/// around explicitly; hiding never touches inventory data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityFilter {
    hidden_families: BTreeSet<String>,
    hidden_codes: BTreeSet<String>,
}

impl VisibilityFilter {
    pub fn new(hidden_families: BTreeSet<String>, hidden_codes: BTreeSet<String>) -> Self {
        Self {
            hidden_families,
            hidden_codes,
        }
    }

    pub fn from_targets<'a>(targets: impl IntoIterator<Item = &'a HideTarget>) -> Self {
        let mut filter = Self::default();
        for target in targets {
            filter.apply(target, true);
        }
        filter
    }

    /// Hidden when the code itself or its family is hidden. The two bits are
    /// independent: neither toggle clears the other.
    pub fn is_hidden(&self, code: &str) -> bool {
        self.hidden_codes.contains(code) || self.hidden_families.contains(family_of(code))
    }

    pub fn is_family_hidden(&self, family: &str) -> bool {
        self.hidden_families.contains(family)
    }

    pub fn is_code_hidden(&self, code: &str) -> bool {
        self.hidden_codes.contains(code)
    }

    /// Local mirror of a persisted toggle, for optimistic rendering.
    pub fn apply(&mut self, target: &HideTarget, hidden: bool) {
        let set = match target {
            HideTarget::Family(_) => &mut self.hidden_families,
            HideTarget::Code(_) => &mut self.hidden_codes,
        };
        let value = match target {
            HideTarget::Family(v) | HideTarget::Code(v) => v,
        };
        if hidden {
            set.insert(value.clone());
        } else {
            set.remove(value);
        }
    }

    pub fn hidden_families(&self) -> &BTreeSet<String> {
        &self.hidden_families
    }

    pub fn hidden_codes(&self) -> &BTreeSet<String> {
        &self.hidden_codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(f: &str) -> HideTarget {
        HideTarget::Family(f.to_string())
    }

    fn code(c: &str) -> HideTarget {
        HideTarget::Code(c.to_string())
    }

    #[test]
    fn family_hide_covers_every_code_in_family() {
        let filter = VisibilityFilter::from_targets(&[family("A")]);
        assert!(filter.is_hidden("A1"));
        assert!(filter.is_hidden("A10"));
        assert!(!filter.is_hidden("AB1"));
        assert!(!filter.is_hidden("B1"));
    }

    #[test]
    fn other_family_covers_codes_without_letters() {
        let filter = VisibilityFilter::from_targets(&[family("Other")]);
        assert!(filter.is_hidden("123"));
        assert!(!filter.is_hidden("A1"));
    }

    #[test]
    fn code_hide_survives_family_unhide() {
        let mut filter = VisibilityFilter::default();
        filter.apply(&code("A3"), true);
        filter.apply(&family("A"), true);
        filter.apply(&family("A"), false);

        assert!(filter.is_hidden("A3"));
        assert!(!filter.is_hidden("A4"));
        assert!(filter.is_code_hidden("A3"));
        assert!(!filter.is_family_hidden("A"));
    }

    #[test]
    fn either_bit_hides() {
        let mut filter = VisibilityFilter::default();
        filter.apply(&family("A"), true);
        filter.apply(&code("A3"), false);
        assert!(filter.is_hidden("A3"));
    }

    #[test]
    fn toggles_are_idempotent() {
        let mut filter = VisibilityFilter::default();
        filter.apply(&code("B2"), true);
        filter.apply(&code("B2"), true);
        assert!(filter.is_hidden("B2"));
        assert_eq!(filter.hidden_codes().len(), 1);

        filter.apply(&code("C9"), false);
        assert!(!filter.is_hidden("C9"));
        assert_eq!(filter.hidden_codes().len(), 1);
    }
}

//! Modifier Group Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// `max_selections` value meaning "no upper bound"
pub const UNLIMITED_SELECTIONS: i32 = -1;

fn default_true() -> bool {
    true
}

fn default_max() -> i32 {
    UNLIMITED_SELECTIONS
}

/// Modifier option (embedded in ModifierGroup)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierOption {
    /// Unique within its group
    pub name: String,
    /// Additional price in currency unit (zero or positive)
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// Modifier group entity (e.g. "Size", "Add-ons")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierGroup {
    pub id: String,
    /// Display label
    pub name: String,
    /// Embedded options, in display order
    pub options: Vec<ModifierOption>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub min_selections: i32,
    /// Max selections (-1 = unlimited)
    #[serde(default = "default_max")]
    pub max_selections: i32,
}

impl ModifierGroup {
    /// Required groups with exactly one choice use replace semantics
    ///
    /// An optional "up to one" group is not single-select: the choice must
    /// stay clearable.
    pub fn is_single_select(&self) -> bool {
        self.is_required && self.max_selections == 1
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_selections < 0
    }

    /// Whether `count` more selections stay within the upper bound
    pub fn has_room_for(&self, count: usize) -> bool {
        self.is_unbounded() || count <= self.max_selections as usize
    }

    pub fn option(&self, name: &str) -> Option<&ModifierOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Looks up an option that can currently be selected and priced
    pub fn available_option(&self, name: &str) -> Option<&ModifierOption> {
        self.option(name).filter(|o| o.is_available)
    }

    /// Checks the cardinality invariants of the group definition
    ///
    /// - `min_selections >= 0`
    /// - `max_selections == -1` or `max_selections >= 1`
    /// - `min_selections <= max_selections` when bounded
    /// - option names unique
    pub fn is_well_formed(&self) -> bool {
        if self.min_selections < 0 {
            return false;
        }
        if !self.is_unbounded() {
            if self.max_selections < 1 || self.min_selections > self.max_selections {
                return false;
            }
        } else if self.max_selections != UNLIMITED_SELECTIONS {
            return false;
        }
        let mut seen = HashSet::new();
        self.options.iter().all(|o| seen.insert(o.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(name: &str, cents: i64, is_available: bool) -> ModifierOption {
        ModifierOption {
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            is_available,
        }
    }

    fn group(min: i32, max: i32) -> ModifierGroup {
        ModifierGroup {
            id: "addons".to_string(),
            name: "Add-ons".to_string(),
            options: vec![option("Cheese", 100, true), option("Bacon", 150, false)],
            is_required: false,
            min_selections: min,
            max_selections: max,
        }
    }

    #[test]
    fn test_available_option_skips_unavailable() {
        let g = group(0, 2);
        assert!(g.available_option("Cheese").is_some());
        assert!(g.option("Bacon").is_some());
        assert!(g.available_option("Bacon").is_none());
        assert!(g.option("Onion").is_none());
    }

    #[test]
    fn test_single_select() {
        let mut required = group(1, 1);
        required.is_required = true;
        assert!(required.is_single_select());

        // optional max-1 stays toggleable
        assert!(!group(0, 1).is_single_select());
        assert!(!group(0, 2).is_single_select());
        assert!(!group(0, UNLIMITED_SELECTIONS).is_single_select());
    }

    #[test]
    fn test_has_room_for() {
        let g = group(0, 2);
        assert!(g.has_room_for(2));
        assert!(!g.has_room_for(3));
        assert!(group(0, UNLIMITED_SELECTIONS).has_room_for(100));
    }

    #[test]
    fn test_well_formed() {
        assert!(group(0, 2).is_well_formed());
        assert!(group(2, 2).is_well_formed());
        assert!(group(3, UNLIMITED_SELECTIONS).is_well_formed());
        assert!(!group(3, 2).is_well_formed());
        assert!(!group(-1, 2).is_well_formed());
        assert!(!group(0, 0).is_well_formed());
        assert!(!group(0, -5).is_well_formed());

        let mut dup = group(0, 2);
        dup.options.push(option("Cheese", 0, true));
        assert!(!dup.is_well_formed());
    }
}

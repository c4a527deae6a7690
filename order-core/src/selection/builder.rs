//! Selection builder - one session's in-progress cart
//!
//! The builder is single-owner and needs no locking. Callers read it through
//! [`SelectionBuilder::snapshot`], which hands out owned values so views never
//! alias the live state.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Item, ModifierGroup};
use shared::order::DrinkTemperature;

use super::error::ValidationError;
use super::pricing::PricingPolicy;
use super::validator::check_item_supply;
use crate::money::{normalize_note, validate_quantity};

/// One cart entry before it is frozen into an order line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSelection {
    pub item_id: String,
    pub quantity: i32,
    /// group id -> chosen option names
    #[serde(default)]
    pub selections: BTreeMap<String, BTreeSet<String>>,
    /// Only meaningful for items that bundle a drink
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<DrinkTemperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LineSelection {
    pub fn new(item_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            selections: BTreeMap::new(),
            temperature: None,
            note: None,
        }
    }

    /// Option names chosen in a group (sorted)
    pub fn selected<'a>(&'a self, group_id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.selections
            .get(group_id)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    pub fn is_selected(&self, group_id: &str, option: &str) -> bool {
        self.selections
            .get(group_id)
            .is_some_and(|names| names.contains(option))
    }

    /// Number of chosen options that are currently selectable
    pub fn available_count(&self, group: &ModifierGroup) -> usize {
        self.selected(&group.id)
            .filter(|name| group.available_option(name).is_some())
            .count()
    }
}

/// How a modifier tap is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Clear the group, then select the option
    Replace,
    /// Add if absent and under the maximum, remove if present
    Toggle,
}

impl SelectionMode {
    /// Single-select groups replace; everything else toggles
    pub fn for_group(group: &ModifierGroup) -> Self {
        if group.is_single_select() {
            SelectionMode::Replace
        } else {
            SelectionMode::Toggle
        }
    }
}

/// Outcome of a modifier tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
    /// Already selected, or the group is full
    Unchanged,
}

/// Accumulates a customer's choices and reports the live price delta
#[derive(Debug, Clone, Default)]
pub struct SelectionBuilder {
    policy: PricingPolicy,
    lines: Vec<LineSelection>,
}

impl SelectionBuilder {
    pub fn new(policy: PricingPolicy) -> Self {
        Self {
            policy,
            lines: Vec::new(),
        }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    // ========== Reads ==========

    pub fn lines(&self) -> &[LineSelection] {
        &self.lines
    }

    pub fn line(&self, item_id: &str) -> Option<&LineSelection> {
        self.lines.iter().find(|l| l.item_id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Owned copy of the current lines
    pub fn snapshot(&self) -> Vec<LineSelection> {
        self.lines.clone()
    }

    /// Live price delta for one item's line
    ///
    /// An item without a line is priced as if nothing were chosen yet.
    pub fn compute_addition(&self, item: &Item, groups: &[ModifierGroup]) -> Decimal {
        match self.line(&item.id) {
            Some(line) => self.policy.compute_addition(line, item, groups),
            None => self
                .policy
                .compute_addition(&LineSelection::new(&item.id, 0), item, groups),
        }
    }

    // ========== Mutations ==========

    /// Set a line's quantity; `0` removes the line
    pub fn set_quantity(&mut self, item: &Item, quantity: i32) -> Result<(), ValidationError> {
        validate_quantity(&item.id, quantity)?;
        if quantity == 0 {
            self.remove(&item.id);
            return Ok(());
        }
        check_item_supply(item, quantity)?;
        match self.line_mut(&item.id) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(LineSelection::new(&item.id, quantity)),
        }
        Ok(())
    }

    pub fn choose_drink_temperature(
        &mut self,
        item: &Item,
        temperature: DrinkTemperature,
    ) -> Result<(), ValidationError> {
        if !item.bundles_drink() {
            return Err(ValidationError::NotADrink(item.id.clone()));
        }
        self.ensure_line(item)?.temperature = Some(temperature);
        Ok(())
    }

    /// Apply a modifier tap to `item`'s line, creating the line if needed
    ///
    /// Availability is only checked when an option is being added; removing
    /// a stale choice always succeeds.
    pub fn select_modifier_option(
        &mut self,
        item: &Item,
        group: &ModifierGroup,
        option: &str,
        mode: SelectionMode,
    ) -> Result<SelectionChange, ValidationError> {
        if !item.exposes_group(&group.id) {
            return Err(ValidationError::UnknownGroup {
                item: item.id.clone(),
                group: group.id.clone(),
            });
        }
        let Some(opt) = group.option(option) else {
            return Err(ValidationError::UnknownOption {
                group: group.id.clone(),
                option: option.to_string(),
            });
        };

        let already = self
            .line(&item.id)
            .is_some_and(|l| l.is_selected(&group.id, option));
        if !already && !opt.is_available {
            return Err(ValidationError::OptionUnavailable {
                group: group.id.clone(),
                option: option.to_string(),
            });
        }

        let line = self.ensure_line(item)?;
        let change = match mode {
            SelectionMode::Replace => {
                let names = line.selections.entry(group.id.clone()).or_default();
                if already && names.len() == 1 {
                    SelectionChange::Unchanged
                } else {
                    names.clear();
                    names.insert(option.to_string());
                    SelectionChange::Added
                }
            }
            SelectionMode::Toggle if already => {
                if let Some(names) = line.selections.get_mut(&group.id) {
                    names.remove(option);
                }
                SelectionChange::Removed
            }
            SelectionMode::Toggle => {
                if group.has_room_for(line.available_count(group) + 1) {
                    line.selections
                        .entry(group.id.clone())
                        .or_default()
                        .insert(option.to_string());
                    SelectionChange::Added
                } else {
                    SelectionChange::Unchanged
                }
            }
        };
        line.selections.retain(|_, names| !names.is_empty());
        Ok(change)
    }

    /// Attach a free-text cooking note to an existing line
    pub fn set_note(&mut self, item_id: &str, note: &str) -> Result<(), ValidationError> {
        let note = normalize_note(note)?;
        let line = self
            .line_mut(item_id)
            .ok_or_else(|| ValidationError::LineNotFound(item_id.to_string()))?;
        line.note = note;
        Ok(())
    }

    pub fn remove(&mut self, item_id: &str) -> Option<LineSelection> {
        let idx = self.lines.iter().position(|l| l.item_id == item_id)?;
        Some(self.lines.remove(idx))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, item_id: &str) -> Option<&mut LineSelection> {
        self.lines.iter_mut().find(|l| l.item_id == item_id)
    }

    /// Existing line, or a new one with quantity 1
    fn ensure_line(&mut self, item: &Item) -> Result<&mut LineSelection, ValidationError> {
        let idx = match self.lines.iter().position(|l| l.item_id == item.id) {
            Some(idx) => idx,
            None => {
                check_item_supply(item, 1)?;
                self.lines.push(LineSelection::new(&item.id, 1));
                self.lines.len() - 1
            }
        };
        Ok(&mut self.lines[idx])
    }
}

//! Selection validator - gates finalization of a line
//!
//! Groups are checked in the order the item declares them. Choices that are
//! no longer available count as absent but never raise an error on their
//! own.

use shared::models::{Item, ModifierGroup};

use super::builder::LineSelection;
use super::error::ValidationError;
use crate::money::validate_quantity;

/// Whether `quantity` units of `item` can be ordered right now
pub(crate) fn check_item_supply(item: &Item, quantity: i32) -> Result<(), ValidationError> {
    if !item.is_available {
        return Err(ValidationError::ItemUnavailable(item.id.clone()));
    }
    if !item.can_supply(quantity) {
        return Err(ValidationError::InsufficientStock {
            item: item.id.clone(),
            requested: quantity,
            available: item.stock,
        });
    }
    Ok(())
}

/// Cardinality and supply checks for a single line
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionValidator;

impl SelectionValidator {
    /// First violation, or `Ok` when the line may be frozen
    pub fn validate(
        &self,
        line: &LineSelection,
        item: &Item,
        groups: &[ModifierGroup],
    ) -> Result<(), ValidationError> {
        match self.validate_all(line, item, groups).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every violation, in check order
    ///
    /// At most one cardinality violation is reported per group.
    pub fn validate_all(
        &self,
        line: &LineSelection,
        item: &Item,
        groups: &[ModifierGroup],
    ) -> Vec<ValidationError> {
        let mut violations = Vec::new();

        if line.quantity < 1 {
            violations.push(ValidationError::InvalidQuantity {
                item: item.id.clone(),
                quantity: line.quantity,
            });
        } else if let Err(e) = validate_quantity(&item.id, line.quantity)
            .and_then(|_| check_item_supply(item, line.quantity))
        {
            violations.push(e);
        }

        if line.temperature.is_some() && !item.bundles_drink() {
            violations.push(ValidationError::NotADrink(item.id.clone()));
        }

        for group_id in &item.modifier_group_ids {
            let Some(group) = groups.iter().find(|g| &g.id == group_id) else {
                violations.push(ValidationError::UnknownGroup {
                    item: item.id.clone(),
                    group: group_id.clone(),
                });
                continue;
            };
            if let Some(e) = Self::check_group(line, group) {
                violations.push(e);
            }
        }

        // choices recorded against groups the item no longer exposes
        for group_id in line.selections.keys() {
            if !item.exposes_group(group_id) {
                violations.push(ValidationError::UnknownGroup {
                    item: item.id.clone(),
                    group: group_id.clone(),
                });
            }
        }

        violations
    }

    fn check_group(line: &LineSelection, group: &ModifierGroup) -> Option<ValidationError> {
        let count = line.available_count(group) as i32;
        if group.is_required && count == 0 {
            return Some(ValidationError::MissingRequiredSelection {
                group: group.id.clone(),
            });
        }
        if count < group.min_selections {
            return Some(ValidationError::BelowMinimum {
                group: group.id.clone(),
                min: group.min_selections,
            });
        }
        if !group.is_unbounded() && count > group.max_selections {
            return Some(ValidationError::AboveMaximum {
                group: group.id.clone(),
                max: group.max_selections,
            });
        }
        None
    }
}

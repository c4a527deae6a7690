//! Additive pricing of a line's choices
//!
//! Pricing never depends on the order choices were made in: the addition is
//! a pure sum over the current selection, so deselecting an option restores
//! the previous price exactly.

use rust_decimal::Decimal;
use shared::models::{Item, ModifierGroup};
use shared::order::DrinkTemperature;
use shared::order::money::round_money;

use super::builder::LineSelection;

/// Fixed surcharges applied on top of option prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Added when a bundled drink is served iced
    pub iced_surcharge: Decimal,
    /// Implicit combo charge for items that declare no drink capability
    pub combo_surcharge: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            iced_surcharge: Decimal::new(300, 2),
            combo_surcharge: Decimal::new(1500, 2),
        }
    }
}

impl PricingPolicy {
    /// Sum of selected-and-available option prices plus drink and combo
    /// surcharges
    ///
    /// Only groups the item exposes are priced; stale or unavailable
    /// choices contribute nothing.
    pub fn compute_addition(
        &self,
        line: &LineSelection,
        item: &Item,
        groups: &[ModifierGroup],
    ) -> Decimal {
        let options: Decimal = groups
            .iter()
            .filter(|group| item.exposes_group(&group.id))
            .flat_map(|group| {
                line.selected(&group.id)
                    .filter_map(|name| group.available_option(name))
                    .map(|option| option.price)
            })
            .sum();

        options + self.drink_surcharge(item, line.temperature) + self.combo_surcharge(item)
    }

    /// Unit price of one line: base price plus its addition
    pub fn unit_price(&self, line: &LineSelection, item: &Item, groups: &[ModifierGroup]) -> Decimal {
        round_money(item.price + self.compute_addition(line, item, groups))
    }

    pub fn drink_surcharge(&self, item: &Item, temperature: Option<DrinkTemperature>) -> Decimal {
        match temperature {
            Some(DrinkTemperature::Iced) if item.bundles_drink() => self.iced_surcharge,
            _ => Decimal::ZERO,
        }
    }

    pub fn combo_surcharge(&self, item: &Item) -> Decimal {
        if item.has_drink_capability() {
            Decimal::ZERO
        } else {
            self.combo_surcharge
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ModifierOption;

    fn d(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn item(bundled_drink: Option<bool>) -> Item {
        Item {
            id: "x".into(),
            name: "X".into(),
            price: d(1000),
            category: "c".into(),
            is_available: true,
            stock: -1,
            bundled_drink,
            modifier_group_ids: vec!["extras".into()],
        }
    }

    fn extras() -> ModifierGroup {
        ModifierGroup {
            id: "extras".into(),
            name: "Extras".into(),
            options: vec![
                ModifierOption { name: "A".into(), price: d(100), is_available: true },
                ModifierOption { name: "B".into(), price: d(250), is_available: false },
            ],
            is_required: false,
            min_selections: 0,
            max_selections: -1,
        }
    }

    fn line_with(options: &[&str]) -> LineSelection {
        let mut line = LineSelection::new("x", 1);
        for o in options {
            line.selections
                .entry("extras".into())
                .or_default()
                .insert(o.to_string());
        }
        line
    }

    #[test]
    fn test_unavailable_options_are_not_priced() {
        let policy = PricingPolicy::default();
        let it = item(Some(false));
        assert_eq!(policy.compute_addition(&line_with(&["A", "B"]), &it, &[extras()]), d(100));
        assert_eq!(policy.compute_addition(&line_with(&[]), &it, &[extras()]), Decimal::ZERO);
    }

    #[test]
    fn test_iced_surcharge_only_for_bundled_drinks() {
        let policy = PricingPolicy::default();
        let mut line = line_with(&[]);
        line.temperature = Some(DrinkTemperature::Iced);
        assert_eq!(policy.compute_addition(&line, &item(Some(true)), &[]), d(300));
        assert_eq!(policy.compute_addition(&line, &item(Some(false)), &[]), Decimal::ZERO);

        line.temperature = Some(DrinkTemperature::Hot);
        assert_eq!(policy.compute_addition(&line, &item(Some(true)), &[]), Decimal::ZERO);
    }

    #[test]
    fn test_combo_surcharge_without_drink_capability() {
        let policy = PricingPolicy::default();
        let it = item(None);
        assert_eq!(policy.compute_addition(&line_with(&[]), &it, &[extras()]), d(1500));
        assert_eq!(policy.compute_addition(&line_with(&["A"]), &it, &[extras()]), d(1600));
        assert_eq!(policy.unit_price(&line_with(&[]), &it, &[extras()]), d(2500));
    }

    #[test]
    fn test_groups_not_exposed_by_item_are_ignored() {
        let policy = PricingPolicy::default();
        let mut it = item(Some(false));
        it.modifier_group_ids.clear();
        assert_eq!(policy.compute_addition(&line_with(&["A"]), &it, &[extras()]), Decimal::ZERO);
    }
}

//! Order assembler - freezes validated selections into an order
//!
//! Assembly is pure: it never touches the store. Line validation happens
//! before anything is allocated, so a rejected cart never consumes an order
//! number.

use rust_decimal::Decimal;
use shared::models::{Item, ModifierGroup};
use shared::order::{Order, OrderLine, OrderType};

use super::error::{OrderError, OrderResult};
use crate::selection::{LineSelection, PricingPolicy, SelectionValidator};

/// A selection together with the catalog records it refers to
#[derive(Debug, Clone)]
pub struct ResolvedLine {
    pub selection: LineSelection,
    pub item: Item,
    /// The item's groups, in declared order
    pub groups: Vec<ModifierGroup>,
}

/// Tax and service-charge rates applied to the subtotal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRates {
    pub tax_rate: Decimal,
    pub service_charge_rate: Decimal,
}

impl Default for OrderRates {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            service_charge_rate: Decimal::ZERO,
        }
    }
}

/// Order header fields supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub order_type: OrderType,
    pub user_id: Option<String>,
    pub table_number: Option<String>,
    pub payment_method: Option<String>,
}

impl OrderDraft {
    pub fn online(user_id: impl Into<String>) -> Self {
        Self {
            order_type: OrderType::Online,
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn table(table_number: impl Into<String>) -> Self {
        Self {
            order_type: OrderType::Table,
            table_number: Some(table_number.into()),
            ..Default::default()
        }
    }
}

/// Converts selections into priced order lines and orders
#[derive(Debug, Clone, Default)]
pub struct OrderAssembler {
    policy: PricingPolicy,
    validator: SelectionValidator,
}

impl OrderAssembler {
    pub fn new(policy: PricingPolicy) -> Self {
        Self {
            policy,
            validator: SelectionValidator,
        }
    }

    /// Validate every line, then freeze them in cart order
    ///
    /// Line ids are `{order_id}-{n}`, counting from 1.
    pub fn freeze_lines(&self, order_id: &str, lines: &[ResolvedLine]) -> OrderResult<Vec<OrderLine>> {
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        for line in lines {
            self.validator
                .validate(&line.selection, &line.item, &line.groups)?;
        }

        Ok(lines
            .iter()
            .enumerate()
            .map(|(idx, line)| self.freeze(order_id, idx + 1, line))
            .collect())
    }

    fn freeze(&self, order_id: &str, position: usize, line: &ResolvedLine) -> OrderLine {
        let unit_price = self
            .policy
            .unit_price(&line.selection, &line.item, &line.groups);
        let mut frozen = OrderLine::new(
            &line.item.id,
            &line.item.name,
            line.selection.quantity,
            unit_price,
        )
        .with_customization(describe_customization(
            &line.selection,
            &line.item,
            &line.groups,
        ))
        .with_cooking_details(line.selection.note.clone());
        frozen.order_item_id = Some(format!("{}-{}", order_id, position));
        frozen
    }

    /// Build a `pending` order from already frozen lines
    pub fn build_order(
        &self,
        order_id: String,
        order_number: u32,
        draft: OrderDraft,
        lines: Vec<OrderLine>,
        rates: OrderRates,
        now: i64,
    ) -> Order {
        let mut order = Order::new(
            order_id,
            order_number,
            draft.order_type,
            lines,
            rates.tax_rate,
            rates.service_charge_rate,
            now,
        );
        order.user_id = draft.user_id;
        order.table_number = draft.table_number;
        order.payment_method = draft.payment_method;
        order
    }

    /// Freeze and build in one step
    pub fn assemble(
        &self,
        order_id: String,
        order_number: u32,
        draft: OrderDraft,
        lines: &[ResolvedLine],
        rates: OrderRates,
        now: i64,
    ) -> OrderResult<Order> {
        let frozen = self.freeze_lines(&order_id, lines)?;
        Ok(self.build_order(order_id, order_number, draft, frozen, rates, now))
    }
}

/// Human-readable summary of a line's choices
///
/// Groups follow the item's declared order and options their display order;
/// unavailable choices are left out. Example:
/// `Size: Large; Add-ons: Cheese, Bacon; Iced`.
pub fn describe_customization(
    line: &LineSelection,
    item: &Item,
    groups: &[ModifierGroup],
) -> Option<String> {
    let mut parts: Vec<String> = item
        .modifier_group_ids
        .iter()
        .filter_map(|id| groups.iter().find(|g| &g.id == id))
        .filter_map(|group| {
            let names: Vec<&str> = group
                .options
                .iter()
                .filter(|o| o.is_available && line.is_selected(&group.id, &o.name))
                .map(|o| o.name.as_str())
                .collect();
            (!names.is_empty()).then(|| format!("{}: {}", group.name, names.join(", ")))
        })
        .collect();

    if item.bundles_drink()
        && let Some(temperature) = line.temperature
    {
        parts.push(temperature.to_string());
    }

    (!parts.is_empty()).then(|| parts.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::ValidationError;
    use shared::models::ModifierOption;
    use shared::order::{DrinkTemperature, OrderStatus};

    fn d(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn opt(name: &str, cents: i64) -> ModifierOption {
        ModifierOption {
            name: name.into(),
            price: d(cents),
            is_available: true,
        }
    }

    fn burger_line(picks: &[(&str, &str)], quantity: i32) -> ResolvedLine {
        let mut selection = LineSelection::new("burger", quantity);
        for (g, o) in picks {
            selection
                .selections
                .entry(g.to_string())
                .or_default()
                .insert(o.to_string());
        }
        ResolvedLine {
            selection,
            item: Item {
                id: "burger".into(),
                name: "Burger".into(),
                price: d(1000),
                category: "Burgers".into(),
                is_available: true,
                stock: -1,
                bundled_drink: Some(false),
                modifier_group_ids: vec!["size".into(), "addons".into()],
            },
            groups: vec![
                ModifierGroup {
                    id: "size".into(),
                    name: "Size".into(),
                    options: vec![opt("Small", 0), opt("Large", 200)],
                    is_required: true,
                    min_selections: 1,
                    max_selections: 1,
                },
                ModifierGroup {
                    id: "addons".into(),
                    name: "Add-ons".into(),
                    options: vec![opt("Cheese", 100), opt("Bacon", 150)],
                    is_required: false,
                    min_selections: 0,
                    max_selections: 2,
                },
            ],
        }
    }

    #[test]
    fn test_burger_scenario_totals() {
        let assembler = OrderAssembler::default();
        let line = burger_line(&[("size", "Large"), ("addons", "Cheese"), ("addons", "Bacon")], 2);
        let order = assembler
            .assemble(
                "o-1".into(),
                1,
                OrderDraft::table("T3"),
                &[line],
                OrderRates::default(),
                1_000,
            )
            .unwrap();

        let frozen = &order.items()[0];
        assert_eq!(frozen.unit_price(), d(1450));
        assert_eq!(frozen.total_price(), d(2900));
        assert_eq!(frozen.order_item_id.as_deref(), Some("o-1-1"));
        assert_eq!(
            frozen.customization.as_deref(),
            Some("Size: Large; Add-ons: Cheese, Bacon")
        );

        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.subtotal(), d(2900));
        assert_eq!(order.tax(), d(290));
        assert_eq!(order.total(), d(3190));
        assert_eq!(order.table_number.as_deref(), Some("T3"));
        assert_eq!(order.order_type, OrderType::Table);
    }

    #[test]
    fn test_empty_cart_refused() {
        let assembler = OrderAssembler::default();
        let result = assembler.assemble(
            "o-1".into(),
            1,
            OrderDraft::default(),
            &[],
            OrderRates::default(),
            1,
        );
        assert!(matches!(result, Err(OrderError::EmptyOrder)));
    }

    #[test]
    fn test_invalid_line_refuses_whole_order() {
        let assembler = OrderAssembler::default();
        let good = burger_line(&[("size", "Small")], 1);
        let missing_size = burger_line(&[("addons", "Cheese")], 1);
        let result = assembler.freeze_lines("o-1", &[good, missing_size]);
        assert!(matches!(
            result,
            Err(OrderError::Validation(ValidationError::MissingRequiredSelection { .. }))
        ));
    }

    #[test]
    fn test_service_charge_and_notes() {
        let assembler = OrderAssembler::default();
        let mut line = burger_line(&[("size", "Small")], 1);
        line.selection.note = Some("no pickles".into());
        let rates = OrderRates {
            tax_rate: d(10),
            service_charge_rate: d(5),
        };
        let order = assembler
            .assemble("o-2".into(), 2, OrderDraft::online("u1"), &[line], rates, 1)
            .unwrap();
        assert_eq!(order.service_charge(), d(50));
        assert_eq!(order.total(), d(1150));
        assert_eq!(order.items()[0].cooking_details.as_deref(), Some("no pickles"));
        assert_eq!(order.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_describe_drink_temperature() {
        let mut line = burger_line(&[], 1);
        line.item.bundled_drink = Some(true);
        line.item.modifier_group_ids.clear();
        line.selection.temperature = Some(DrinkTemperature::Iced);
        assert_eq!(
            describe_customization(&line.selection, &line.item, &line.groups).as_deref(),
            Some("Iced")
        );

        line.selection.temperature = None;
        assert_eq!(describe_customization(&line.selection, &line.item, &line.groups), None);
    }
}

use std::sync::Arc;

use order_core::{
    Catalog, OrderDraft, OrderService, RedbOrderStore, SelectionMode, StaticCatalog,
    setup_environment,
};
use shared::order::{DrinkTemperature, OrderFilter, OrderStatus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment()?;
    tracing::info!(work_dir = %config.work_dir, "Order core demo starting...");

    // 2. 打开存储与目录
    let store = Arc::new(RedbOrderStore::open(config.db_path())?);
    let catalog: Arc<dyn Catalog> = Arc::new(StaticCatalog::bundled()?);
    let service = OrderService::new(catalog.clone(), store, &config);

    // 3. 厨房看板订阅
    let kitchen = service
        .subscribe_orders(OrderFilter::Kitchen, |patch| {
            tracing::info!(
                revision = patch.revision,
                ops = patch.ops.len(),
                board = ?patch.orders.iter().map(|o| o.order_number).collect::<Vec<_>>(),
                "Kitchen board updated"
            );
        })
        .await?;

    // 4. 点单: Burger (Large + Cheese + Bacon) x2, iced milk tea
    let burger = catalog.get_item("burger").await?;
    let tea = catalog.get_item("milk-tea").await?;
    let size = catalog.get_modifier_group("size").await?;
    let addons = catalog.get_modifier_group("addons").await?;
    let sugar = catalog.get_modifier_group("sugar").await?;

    let mut cart = service.build_selection();
    cart.set_quantity(&burger, 2)?;
    for (group, option) in [(&size, "Large"), (&addons, "Cheese"), (&addons, "Bacon")] {
        cart.select_modifier_option(&burger, group, option, SelectionMode::for_group(group))?;
    }
    cart.set_note(&burger.id, "no pickles")?;
    cart.set_quantity(&tea, 1)?;
    cart.choose_drink_temperature(&tea, DrinkTemperature::Iced)?;
    cart.select_modifier_option(&tea, &sugar, "Less Sugar", SelectionMode::for_group(&sugar))?;

    let burger_groups = [size, addons];
    tracing::info!(
        burger_addition = %cart.compute_addition(&burger, &burger_groups),
        tea_addition = %cart.compute_addition(&tea, std::slice::from_ref(&sugar)),
        "Cart priced"
    );

    let order = service
        .assemble_order(OrderDraft::table("T12"), &cart.snapshot())
        .await?;
    tracing::info!(
        order_number = order.order_number,
        subtotal = %order.subtotal(),
        tax = %order.tax(),
        total = %order.total(),
        "Order placed"
    );

    // 5. 厨房推进状态
    for next in [OrderStatus::Preparing, OrderStatus::Ready, OrderStatus::Completed] {
        service.transition_status(&order.order_id, next).await?;
        tokio::time::sleep(std::time::Duration::from_millis(config.sync_debounce_ms * 2)).await;
    }

    // 6. 结束订阅
    kitchen.shutdown().await;
    tracing::info!("Order core demo finished");
    Ok(())
}

//! Order Core - 点单、定价校验、订单生命周期与实时同步引擎
//!
//! # 架构概述
//!
//! ```text
//! Catalog → SelectionBuilder → SelectionValidator → OrderAssembler
//!         → (persist) → OrderLifecycle → OrderSyncEngine → observers
//! ```
//!
//! - **目录** (`catalog`): 商品与加料组的只读来源，支持内置数据兜底
//! - **选择** (`selection`): 顾客的进行中选择、校验与加价
//! - **订单** (`orders`): 组装、状态机、订单号分配、redb 存储
//! - **同步** (`sync`): 防抖订阅与增量补丁
//!
//! # 模块结构
//!
//! ```text
//! order-core/src/
//! ├── core/          # 配置
//! ├── catalog/       # Catalog trait 及实现
//! ├── selection/     # 选择构建、校验、定价
//! ├── orders/        # 组装、生命周期、存储、服务门面
//! ├── sync/          # diff + 订阅引擎
//! ├── money.rs       # 金额与数量边界
//! └── utils/         # 日志
//! ```

pub mod catalog;
pub mod core;
pub mod money;
pub mod orders;
pub mod selection;
pub mod sync;
pub mod utils;

// Re-export 公共类型
pub use catalog::{Catalog, CatalogError, FallbackCatalog, MemoryCatalog, StaticCatalog};
pub use core::Config;
pub use orders::{
    MemoryOrderStore, OrderDraft, OrderError, OrderRates, OrderService, OrderStore, RedbOrderStore,
    StoreError,
};
pub use selection::{PricingPolicy, SelectionBuilder, SelectionMode, SelectionValidator, ValidationError};
pub use sync::{OrderPatch, OrderSubscription, OrderSyncEngine, PatchOp};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv, 工作目录, 日志)
pub fn setup_environment() -> std::io::Result<Config> {
    dotenv::dotenv().ok();
    let config = Config::from_env();

    std::fs::create_dir_all(&config.work_dir)?;
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let log_to_file = config.is_production().then_some(log_dir.as_path());
    init_logger_with_file(Some(&config.log_level), Some(config.is_production()), log_to_file);
    Ok(config)
}

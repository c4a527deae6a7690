//! Orders - assembly, lifecycle, numbering and persistence
//!
//! # 模块结构
//!
//! - [`OrderAssembler`] - 选择 → 订单行 → 订单
//! - [`OrderLifecycle`] - 状态机转换与编辑
//! - [`SequenceAllocator`] - 1..=1000 循环订单号
//! - [`storage`] - 存储抽象 (redb / 内存)
//! - [`OrderService`] - 对外门面

pub mod assembler;
pub mod error;
pub mod lifecycle;
pub mod sequence;
pub mod service;
pub mod storage;

pub use assembler::{OrderAssembler, OrderDraft, OrderRates, ResolvedLine, describe_customization};
pub use error::{OrderError, OrderResult};
pub use lifecycle::OrderLifecycle;
pub use sequence::SequenceAllocator;
pub use service::OrderService;
pub use storage::{MemoryOrderStore, OrderChange, OrderStore, RedbOrderStore, StoreError, StoreResult};

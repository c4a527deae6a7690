//! 核心模块 - 运行配置
//!
//! # 模块结构
//!
//! - [`Config`] - 引擎配置 (环境变量驱动)

pub mod config;

pub use config::Config;

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::orders::OrderRates;
use crate::orders::sequence::{DEFAULT_MAX_ATTEMPTS, DEFAULT_ORDER_NUMBER_MAX};
use crate::selection::PricingPolicy;

/// 引擎配置 - 订单核心的所有可调参数
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (orders.redb, logs/) |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | TAX_RATE | 0.10 | 税率 |
/// | SERVICE_CHARGE_RATE | 0 | 服务费率 |
/// | ICED_SURCHARGE | 3.00 | 冰饮附加费 |
/// | COMBO_SURCHARGE | 15.00 | 无饮品商品的套餐附加费 |
/// | SYNC_DEBOUNCE_MS | 300 | 同步防抖窗口(毫秒) |
/// | ORDER_NUMBER_MAX | 1000 | 订单号循环上限 |
/// | COUNTER_MAX_ATTEMPTS | 5 | 计数器事务重试次数 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/orders TAX_RATE=0.08 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// tracing 最大日志级别
    pub log_level: String,

    // === 定价 ===
    pub tax_rate: Decimal,
    pub service_charge_rate: Decimal,
    pub iced_surcharge: Decimal,
    pub combo_surcharge: Decimal,

    // === 同步与计数器 ===
    /// 防抖窗口 (毫秒)
    pub sync_debounce_ms: u64,
    /// 订单号上限，超过后回绕到 1
    pub order_number_max: u32,
    /// 计数器冲突时的最大尝试次数
    pub counter_max_attempts: u32,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = PricingPolicy::default();
        let rates = OrderRates::default();
        Self {
            work_dir: lookup("WORK_DIR").unwrap_or_else(|| "./data".into()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            tax_rate: parse_or(&lookup, "TAX_RATE", rates.tax_rate),
            service_charge_rate: parse_or(&lookup, "SERVICE_CHARGE_RATE", rates.service_charge_rate),
            iced_surcharge: parse_or(&lookup, "ICED_SURCHARGE", defaults.iced_surcharge),
            combo_surcharge: parse_or(&lookup, "COMBO_SURCHARGE", defaults.combo_surcharge),
            sync_debounce_ms: parse_or(&lookup, "SYNC_DEBOUNCE_MS", 300),
            order_number_max: parse_or(&lookup, "ORDER_NUMBER_MAX", DEFAULT_ORDER_NUMBER_MAX),
            counter_max_attempts: parse_or(&lookup, "COUNTER_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
        }
    }

    /// 使用自定义工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 订单数据库路径
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("orders.redb")
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            iced_surcharge: self.iced_surcharge,
            combo_surcharge: self.combo_surcharge,
        }
    }

    pub fn order_rates(&self) -> OrderRates {
        OrderRates {
            tax_rate: self.tax_rate,
            service_charge_rate: self.service_charge_rate,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.work_dir, "./data");
        assert!(config.is_development());
        assert_eq!(config.tax_rate, Decimal::new(10, 2));
        assert_eq!(config.service_charge_rate, Decimal::ZERO);
        assert_eq!(config.iced_surcharge, Decimal::new(300, 2));
        assert_eq!(config.combo_surcharge, Decimal::new(1500, 2));
        assert_eq!(config.sync_debounce_ms, 300);
        assert_eq!(config.order_number_max, 1000);
        assert_eq!(config.counter_max_attempts, 5);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = config_from(&[
            ("ENVIRONMENT", "production"),
            ("TAX_RATE", "0.08"),
            ("SYNC_DEBOUNCE_MS", "not-a-number"),
            ("ORDER_NUMBER_MAX", " 50 "),
        ]);
        assert!(config.is_production());
        assert_eq!(config.tax_rate, Decimal::new(8, 2));
        assert_eq!(config.sync_debounce_ms, 300);
        assert_eq!(config.order_number_max, 50);
    }

    #[test]
    fn test_derived_values() {
        let config = config_from(&[("WORK_DIR", "/tmp/orders"), ("ICED_SURCHARGE", "2.5")]);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/orders/orders.redb"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/orders/logs"));
        assert_eq!(config.pricing_policy().iced_surcharge, Decimal::new(25, 1));
        assert_eq!(config.order_rates().tax_rate, Decimal::new(10, 2));
    }
}

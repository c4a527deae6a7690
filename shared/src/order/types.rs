//! Shared enums for order records

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Order Type
// ============================================================================

/// 订单来源
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// 线上点单
    #[default]
    Online,
    /// 堂食桌台点单
    Table,
}

// ============================================================================
// Payment Status
// ============================================================================

/// Payment status (recorded only, never processed here)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

// ============================================================================
// Drink Temperature
// ============================================================================

/// Temperature choice for items that bundle a drink
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DrinkTemperature {
    Hot,
    Iced,
}

impl fmt::Display for DrinkTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrinkTemperature::Hot => write!(f, "Hot"),
            DrinkTemperature::Iced => write!(f, "Iced"),
        }
    }
}

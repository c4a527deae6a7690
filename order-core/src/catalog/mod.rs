//! Catalog - read-only source of items and modifier groups
//!
//! The engine only depends on the [`Catalog`] trait. Implementations:
//!
//! - [`MemoryCatalog`]: warmable in-memory cache, the live catalog
//! - [`StaticCatalog`]: immutable dataset bundled with the crate
//! - [`FallbackCatalog`]: serves reads from a fallback while the primary is
//!   unreachable

mod bundled;
mod fallback;
mod memory;

pub use bundled::StaticCatalog;
pub use fallback::FallbackCatalog;
pub use memory::MemoryCatalog;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{Item, ModifierGroup};
use thiserror::Error;

/// Catalog errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Modifier group not found: {0}")]
    GroupNotFound(String),

    /// The backing source could not be reached; readers may fall back
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid catalog data: {0}")]
    InvalidData(String),
}

impl CatalogError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::ItemNotFound(_) => ErrorCode::ItemNotFound,
            CatalogError::GroupNotFound(_) => ErrorCode::ModifierGroupNotFound,
            CatalogError::Unavailable(_) => ErrorCode::CatalogUnavailable,
            CatalogError::InvalidData(_) => ErrorCode::ValidationFailed,
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog dataset (bundled JSON shape, warmup payload)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub modifier_groups: Vec<ModifierGroup>,
}

impl CatalogData {
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let data: CatalogData =
            serde_json::from_str(json).map_err(|e| CatalogError::InvalidData(e.to_string()))?;
        data.check()?;
        Ok(data)
    }

    /// Rejects malformed groups and item references to unknown groups
    pub fn check(&self) -> CatalogResult<()> {
        if let Some(group) = self.modifier_groups.iter().find(|g| !g.is_well_formed()) {
            return Err(CatalogError::InvalidData(format!(
                "modifier group {} violates its cardinality bounds",
                group.id
            )));
        }
        for item in &self.items {
            if item.price.is_sign_negative() {
                return Err(CatalogError::InvalidData(format!(
                    "item {} has a negative price",
                    item.id
                )));
            }
            if let Some(missing) = item
                .modifier_group_ids
                .iter()
                .find(|id| !self.modifier_groups.iter().any(|g| &g.id == *id))
            {
                return Err(CatalogError::InvalidData(format!(
                    "item {} references unknown modifier group {}",
                    item.id, missing
                )));
            }
        }
        Ok(())
    }
}

/// Read-only, eventually consistent catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn get_item(&self, id: &str) -> CatalogResult<Item>;

    /// Available items, optionally restricted to one category, sorted by
    /// category then name
    async fn list_available_items(&self, category: Option<&str>) -> CatalogResult<Vec<Item>>;

    async fn get_modifier_group(&self, id: &str) -> CatalogResult<ModifierGroup>;

    /// All groups an item exposes, in the item's declared order
    async fn get_modifier_groups(&self, item: &Item) -> CatalogResult<Vec<ModifierGroup>> {
        try_join_all(
            item.modifier_group_ids
                .iter()
                .map(|id| self.get_modifier_group(id)),
        )
        .await
    }
}

/// Filter + sort shared by the in-process implementations
fn available_sorted<'a>(
    items: impl Iterator<Item = &'a Item>,
    category: Option<&str>,
) -> Vec<Item> {
    let mut list: Vec<Item> = items
        .filter(|item| item.is_available)
        .filter(|item| category.is_none_or(|c| item.category == c))
        .cloned()
        .collect();
    list.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_rejects_unknown_group_reference() {
        let json = r#"{
            "items": [{"id": "a", "name": "A", "price": 1.0, "category": "x",
                       "modifier_group_ids": ["missing"]}],
            "modifier_groups": []
        }"#;
        let err = CatalogData::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidData(_)));
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_check_rejects_malformed_group() {
        let json = r#"{
            "items": [],
            "modifier_groups": [{"id": "g", "name": "G", "options": [],
                                 "min_selections": 3, "max_selections": 1}]
        }"#;
        assert!(CatalogData::from_json(json).is_err());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CatalogError::Unavailable("down".into()).code(),
            ErrorCode::CatalogUnavailable
        );
        assert_eq!(
            CatalogError::GroupNotFound("g".into()).code(),
            ErrorCode::ModifierGroupNotFound
        );
    }
}

//! Bundled static catalog, used when the live catalog is unreachable

use std::collections::HashMap;

use async_trait::async_trait;
use shared::models::{Item, ModifierGroup};

use super::{Catalog, CatalogData, CatalogError, CatalogResult, available_sorted};

const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Immutable catalog built once from a JSON dataset
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    items: HashMap<String, Item>,
    groups: HashMap<String, ModifierGroup>,
}

impl StaticCatalog {
    /// The dataset shipped with the crate
    pub fn bundled() -> CatalogResult<Self> {
        Ok(Self::from_data(Self::bundled_data()?))
    }

    pub fn bundled_data() -> CatalogResult<CatalogData> {
        CatalogData::from_json(BUNDLED_CATALOG)
    }

    pub fn from_json(json: &str) -> CatalogResult<Self> {
        Ok(Self::from_data(CatalogData::from_json(json)?))
    }

    fn from_data(data: CatalogData) -> Self {
        Self {
            items: data
                .items
                .into_iter()
                .map(|item| (item.id.clone(), item))
                .collect(),
            groups: data
                .modifier_groups
                .into_iter()
                .map(|group| (group.id.clone(), group))
                .collect(),
        }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn get_item(&self, id: &str) -> CatalogResult<Item> {
        self.items
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::ItemNotFound(id.to_string()))
    }

    async fn list_available_items(&self, category: Option<&str>) -> CatalogResult<Vec<Item>> {
        Ok(available_sorted(self.items.values(), category))
    }

    async fn get_modifier_group(&self, id: &str) -> CatalogResult<ModifierGroup> {
        self.groups
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::GroupNotFound(id.to_string()))
    }
}

//! In-memory catalog cache

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{Item, ModifierGroup};

use super::{Catalog, CatalogData, CatalogError, CatalogResult, available_sorted};

/// Warmable in-memory catalog
///
/// Cloning is cheap and every clone sees the same cache, so an admin surface
/// can flip availability while ordering sessions keep reading.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    /// Items cache: id -> Item
    items: Arc<RwLock<HashMap<String, Item>>>,
    /// Groups cache: id -> ModifierGroup
    groups: Arc<RwLock<HashMap<String, ModifierGroup>>>,
}

impl std::fmt::Debug for MemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCatalog")
            .field("items_count", &self.items.read().len())
            .field("groups_count", &self.groups.read().len())
            .finish()
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: CatalogData) -> CatalogResult<Self> {
        let catalog = Self::new();
        catalog.warmup(data)?;
        Ok(catalog)
    }

    /// Replace the whole cache with `data`
    pub fn warmup(&self, data: CatalogData) -> CatalogResult<()> {
        data.check()?;
        let items: HashMap<_, _> = data
            .items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        let groups: HashMap<_, _> = data
            .modifier_groups
            .into_iter()
            .map(|group| (group.id.clone(), group))
            .collect();

        tracing::info!(
            items = items.len(),
            modifier_groups = groups.len(),
            "Catalog cache warmed up"
        );
        *self.items.write() = items;
        *self.groups.write() = groups;
        Ok(())
    }

    pub fn upsert_item(&self, item: Item) -> CatalogResult<()> {
        if item.price.is_sign_negative() {
            return Err(CatalogError::InvalidData(format!(
                "item {} has a negative price",
                item.id
            )));
        }
        self.items.write().insert(item.id.clone(), item);
        Ok(())
    }

    pub fn upsert_group(&self, group: ModifierGroup) -> CatalogResult<()> {
        if !group.is_well_formed() {
            return Err(CatalogError::InvalidData(format!(
                "modifier group {} violates its cardinality bounds",
                group.id
            )));
        }
        self.groups.write().insert(group.id.clone(), group);
        Ok(())
    }

    pub fn set_item_availability(&self, item_id: &str, available: bool) -> CatalogResult<()> {
        let mut items = self.items.write();
        let item = items
            .get_mut(item_id)
            .ok_or_else(|| CatalogError::ItemNotFound(item_id.to_string()))?;
        item.is_available = available;
        tracing::debug!(item_id, available, "Item availability changed");
        Ok(())
    }

    pub fn set_item_stock(&self, item_id: &str, stock: i32) -> CatalogResult<()> {
        let mut items = self.items.write();
        let item = items
            .get_mut(item_id)
            .ok_or_else(|| CatalogError::ItemNotFound(item_id.to_string()))?;
        item.stock = stock;
        Ok(())
    }

    pub fn set_option_availability(
        &self,
        group_id: &str,
        option: &str,
        available: bool,
    ) -> CatalogResult<()> {
        let mut groups = self.groups.write();
        let group = groups
            .get_mut(group_id)
            .ok_or_else(|| CatalogError::GroupNotFound(group_id.to_string()))?;
        let opt = group
            .options
            .iter_mut()
            .find(|o| o.name == option)
            .ok_or_else(|| {
                CatalogError::InvalidData(format!("option {} not in group {}", option, group_id))
            })?;
        opt.is_available = available;
        tracing::debug!(group_id, option, available, "Option availability changed");
        Ok(())
    }

    pub fn item_count(&self) -> usize {
        self.items.read().len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.read().len()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn get_item(&self, id: &str) -> CatalogResult<Item> {
        self.items
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::ItemNotFound(id.to_string()))
    }

    async fn list_available_items(&self, category: Option<&str>) -> CatalogResult<Vec<Item>> {
        Ok(available_sorted(self.items.read().values(), category))
    }

    async fn get_modifier_group(&self, id: &str) -> CatalogResult<ModifierGroup> {
        self.groups
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::GroupNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use rust_decimal::Decimal;

    fn item(id: &str, category: &str) -> Item {
        Item {
            id: id.to_string(),
            name: id.to_uppercase(),
            price: Decimal::new(500, 2),
            category: category.to_string(),
            is_available: true,
            stock: -1,
            bundled_drink: Some(false),
            modifier_group_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let catalog = MemoryCatalog::new();
        catalog.upsert_item(item("b", "mains")).unwrap();
        catalog.upsert_item(item("a", "mains")).unwrap();
        catalog.upsert_item(item("c", "drinks")).unwrap();

        assert_eq!(catalog.get_item("a").await.unwrap().name, "A");
        assert!(matches!(
            catalog.get_item("zzz").await,
            Err(CatalogError::ItemNotFound(_))
        ));

        let all = catalog.list_available_items(None).await.unwrap();
        let ids: Vec<_> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);

        let mains = catalog.list_available_items(Some("mains")).await.unwrap();
        assert_eq!(mains.len(), 2);
    }

    #[tokio::test]
    async fn test_availability_changes_visible_to_clones() {
        let catalog = MemoryCatalog::new();
        catalog.upsert_item(item("a", "mains")).unwrap();
        let reader = catalog.clone();

        catalog.set_item_availability("a", false).unwrap();
        assert!(reader.list_available_items(None).await.unwrap().is_empty());
        assert!(!reader.get_item("a").await.unwrap().is_available);
        assert!(catalog.set_item_availability("nope", false).is_err());
    }

    #[tokio::test]
    async fn test_warmup_from_bundled_data() {
        let data = StaticCatalog::bundled_data().unwrap();
        let catalog = MemoryCatalog::from_data(data).unwrap();
        assert!(catalog.item_count() > 0);

        let burger = catalog.get_item("burger").await.unwrap();
        let groups = catalog.get_modifier_groups(&burger).await.unwrap();
        let ids: Vec<_> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["size", "addons"]);

        catalog.set_option_availability("addons", "Bacon", false).unwrap();
        let addons = catalog.get_modifier_group("addons").await.unwrap();
        assert!(addons.available_option("Bacon").is_none());
        assert!(catalog.set_option_availability("addons", "Nope", false).is_err());
    }
}

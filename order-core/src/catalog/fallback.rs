//! Primary/fallback catalog composite

use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{Item, ModifierGroup};

use super::{Catalog, CatalogError, CatalogResult};

/// Reads from `primary`; switches to `fallback` only when the primary
/// reports [`CatalogError::Unavailable`]
///
/// Not-found answers from a reachable primary are authoritative and are
/// never retried against the fallback.
#[derive(Clone)]
pub struct FallbackCatalog {
    primary: Arc<dyn Catalog>,
    fallback: Arc<dyn Catalog>,
}

impl FallbackCatalog {
    pub fn new(primary: Arc<dyn Catalog>, fallback: Arc<dyn Catalog>) -> Self {
        Self { primary, fallback }
    }

    fn note_fallback(op: &str, reason: &str) {
        tracing::warn!(op, reason, "Primary catalog unreachable, serving bundled data");
    }
}

#[async_trait]
impl Catalog for FallbackCatalog {
    async fn get_item(&self, id: &str) -> CatalogResult<Item> {
        match self.primary.get_item(id).await {
            Err(CatalogError::Unavailable(reason)) => {
                Self::note_fallback("get_item", &reason);
                self.fallback.get_item(id).await
            }
            other => other,
        }
    }

    async fn list_available_items(&self, category: Option<&str>) -> CatalogResult<Vec<Item>> {
        match self.primary.list_available_items(category).await {
            Err(CatalogError::Unavailable(reason)) => {
                Self::note_fallback("list_available_items", &reason);
                self.fallback.list_available_items(category).await
            }
            other => other,
        }
    }

    async fn get_modifier_group(&self, id: &str) -> CatalogResult<ModifierGroup> {
        match self.primary.get_modifier_group(id).await {
            Err(CatalogError::Unavailable(reason)) => {
                Self::note_fallback("get_modifier_group", &reason);
                self.fallback.get_modifier_group(id).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemoryCatalog, StaticCatalog};

    /// Catalog whose backing source is always unreachable
    struct OfflineCatalog;

    #[async_trait]
    impl Catalog for OfflineCatalog {
        async fn get_item(&self, _id: &str) -> CatalogResult<Item> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }

        async fn list_available_items(&self, _category: Option<&str>) -> CatalogResult<Vec<Item>> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }

        async fn get_modifier_group(&self, _id: &str) -> CatalogResult<ModifierGroup> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }
    }

    fn bundled() -> Arc<dyn Catalog> {
        Arc::new(StaticCatalog::bundled().unwrap())
    }

    #[tokio::test]
    async fn test_unreachable_primary_uses_fallback() {
        let catalog = FallbackCatalog::new(Arc::new(OfflineCatalog), bundled());

        let burger = catalog.get_item("burger").await.unwrap();
        assert_eq!(burger.id, "burger");
        assert!(!catalog.list_available_items(None).await.unwrap().is_empty());

        let groups = catalog.get_modifier_groups(&burger).await.unwrap();
        assert_eq!(groups.len(), burger.modifier_group_ids.len());
    }

    #[tokio::test]
    async fn test_not_found_from_primary_is_authoritative() {
        let catalog = FallbackCatalog::new(Arc::new(MemoryCatalog::new()), bundled());
        assert!(matches!(
            catalog.get_item("burger").await,
            Err(CatalogError::ItemNotFound(_))
        ));
        assert!(catalog.list_available_items(None).await.unwrap().is_empty());
    }
}

//! In-memory storage backend.

use super::{DateFilter, StorageError, ToggleStore};
use crate::feature_toggle::FeatureToggle;
use async_trait::async_trait;
use dashmap::DashMap;

/// In-memory storage backend.
///
/// Each package maps to its toggles in insertion order, mirroring the natural
/// order of a document collection.
#[derive(Default)]
pub struct MemoryStore {
    packages: DashMap<String, Vec<FeatureToggle>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ToggleStore for MemoryStore {
    async fn insert(&self, package: &str, toggle: &FeatureToggle) -> Result<(), StorageError> {
        log::debug!("MemoryStore: insert {} into {}", toggle.id, package);
        self.packages
            .entry(package.to_string())
            .or_default()
            .push(toggle.clone());
        Ok(())
    }

    async fn find_all(&self, package: &str) -> Result<Vec<FeatureToggle>, StorageError> {
        Ok(self
            .packages
            .get(package)
            .map(|toggles| toggles.clone())
            .unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        package: &str,
        id: &str,
    ) -> Result<Option<FeatureToggle>, StorageError> {
        Ok(self
            .packages
            .get(package)
            .and_then(|toggles| toggles.iter().find(|t| t.id == id).cloned()))
    }

    async fn find_matching(
        &self,
        package: &str,
        filter: DateFilter,
    ) -> Result<Vec<FeatureToggle>, StorageError> {
        Ok(self
            .packages
            .get(package)
            .map(|toggles| {
                toggles
                    .iter()
                    .filter(|t| filter.matches(t))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn replace(&self, package: &str, toggle: &FeatureToggle) -> Result<bool, StorageError> {
        let Some(mut toggles) = self.packages.get_mut(package) else {
            return Ok(false);
        };

        match toggles.iter_mut().find(|t| t.id == toggle.id) {
            Some(existing) => {
                *existing = toggle.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all(&self, package: &str) -> Result<u64, StorageError> {
        // The emptied collection stays known, as it does in a document store.
        let removed = self
            .packages
            .get_mut(package)
            .map(|mut toggles| toggles.drain(..).count())
            .unwrap_or(0);
        log::debug!("MemoryStore: removed {} toggles from {}", removed, package);
        Ok(removed as u64)
    }

    async fn packages(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.packages.iter().map(|e| e.key().clone()).collect())
    }
}

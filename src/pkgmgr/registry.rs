//! Registry of configured package managers.
//!
//! Built once at startup from the persisted registrations and passed by
//! reference into the reconciler.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::PackageManager;

/// Table from manager ID (the `installedBy` value of a manifest entry) to adapter.
pub struct ManagerRegistry {
    managers: HashMap<String, Arc<dyn PackageManager>>,
}

impl ManagerRegistry {
    pub fn new() -> Self {
        Self {
            managers: HashMap::new(),
        }
    }

    /// Register an adapter under `id`, replacing any previous one.
    pub fn register(&mut self, id: impl Into<String>, manager: Arc<dyn PackageManager>) {
        self.managers.insert(id.into(), manager);
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn PackageManager>> {
        self.managers.get(id)
    }

    /// Like [`get`](Self::get), but an unknown ID is an error.
    pub fn resolve(&self, id: &str) -> Result<&Arc<dyn PackageManager>> {
        self.managers
            .get(id)
            .with_context(|| format!("Package manager '{}' is not configured", id))
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// Registered IDs, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.managers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for ManagerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkgmgr::{ManagerKind, MockPackageManager};

    fn make_mock_manager(kind: ManagerKind) -> Arc<dyn PackageManager> {
        let mut mock = MockPackageManager::new();
        mock.expect_kind().return_const(kind);
        Arc::new(mock)
    }

    #[test]
    fn test_registry_new() {
        let registry = ManagerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.ids().is_empty());
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ManagerRegistry::new();
        registry.register("scoop", make_mock_manager(ManagerKind::Scoop));

        assert!(registry.get("brew").is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("scoop").unwrap().kind(), ManagerKind::Scoop);
        assert!(registry.get("Scoop").is_none());
    }

    #[test]
    fn test_registry_register_replaces() {
        let mut registry = ManagerRegistry::new();
        registry.register("scoop", make_mock_manager(ManagerKind::Scoop));
        registry.register("scoop", make_mock_manager(ManagerKind::Scoop));

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_ids_sorted() {
        let mut registry = ManagerRegistry::new();
        registry.register("scoop", make_mock_manager(ManagerKind::Scoop));
        registry.register("brew", make_mock_manager(ManagerKind::Brew));

        assert_eq!(registry.ids(), vec!["brew", "scoop"]);
    }

    #[test]
    fn test_resolve_missing_manager_error() {
        let registry = ManagerRegistry::new();
        let err = registry.resolve("scoop").err().unwrap();
        assert_eq!(err.to_string(), "Package manager 'scoop' is not configured");
    }
}

//! Builds adapters from persisted package manager registrations.

use log::{debug, warn};
use std::sync::Arc;

use super::{ManagerKind, ManagerRegistry, PackageManager, ScoopManager};
use crate::config::{Config, ManagerRegistration};

/// Create the adapter for `kind`, or `None` when devctl has no adapter for it yet.
pub fn build_manager(
    kind: ManagerKind,
    registration: &ManagerRegistration,
) -> Option<Arc<dyn PackageManager>> {
    match kind {
        ManagerKind::Scoop => Some(Arc::new(ScoopManager::new(
            registration.executable_path.clone(),
        ))),
        ManagerKind::Pwsh | ManagerKind::Brew | ManagerKind::Apt => None,
    }
}

/// Build the registry from the registrations in `config`.
///
/// Registrations without an executable path, with an unknown ID, or for a
/// kind without an adapter are left out.
pub fn build_registry(config: &Config) -> ManagerRegistry {
    let mut registry = ManagerRegistry::new();

    for (id, registration) in &config.package_managers {
        if registration.executable_path.as_os_str().is_empty() {
            warn!("Package manager '{}' has no executable path, ignoring", id);
            continue;
        }
        let kind = match id.parse::<ManagerKind>() {
            Ok(kind) => kind,
            Err(e) => {
                warn!("{}, ignoring its registration", e);
                continue;
            }
        };
        match build_manager(kind, registration) {
            Some(manager) => {
                debug!(
                    "Registered {} at {}",
                    id,
                    registration.executable_path.display()
                );
                registry.register(id.clone(), manager);
            }
            None => debug!("No adapter available for {}, skipping", kind),
        }
    }

    debug!("{} package managers available: {:?}", registry.len(), registry.ids());
    registry
}

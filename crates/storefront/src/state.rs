//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use market_eaze_core::Catalog;

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the process-wide catalog.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: RwLock<Catalog>,
}

impl AppState {
    /// Create a new application state around an existing catalog.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: RwLock::new(catalog),
            }),
        }
    }

    /// Create application state holding the starter catalog.
    #[must_use]
    pub fn seeded(config: StorefrontConfig) -> Self {
        Self::new(config, Catalog::seeded())
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Shared access to the catalog for rendering.
    pub async fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        self.inner.catalog.read().await
    }

    /// Exclusive access to the catalog for one command.
    ///
    /// Hold the guard for the whole read-modify-write of a command.
    pub async fn catalog_mut(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.inner.catalog.write().await
    }
}

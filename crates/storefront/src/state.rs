//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::controller::{Controller, PageStore};
use crate::middleware::session::session_idle_timeout;

/// Upper bound on live pages held at once.
const MAX_PAGES: u64 = 100_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog client, the live pages and the
/// configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    pages: PageStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let pages = PageStore::new(MAX_PAGES, session_idle_timeout());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                pages,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Live page sessions.
    #[must_use]
    pub fn pages(&self) -> &PageStore {
        &self.inner.pages
    }

    /// View controller bound to this state's catalog and categories.
    #[must_use]
    pub fn controller(&self) -> Controller<'_> {
        Controller::new(&self.inner.catalog, &self.inner.config.catalog.categories)
    }
}

//! Category taxonomy cache

use crate::backend::MarketplaceApi;
use crate::notify::{Notification, Notifier};
use homecook_api_client::endpoints::Category;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Categories loaded once and shared between views
pub struct CategoryStore {
    api: Arc<dyn MarketplaceApi>,
    notifier: Arc<dyn Notifier>,
    cached: RwLock<Option<Vec<Category>>>,
}

impl CategoryStore {
    /// Create an empty cache
    pub fn new(api: Arc<dyn MarketplaceApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            cached: RwLock::new(None),
        }
    }

    /// Categories, fetching them on first use
    ///
    /// `None` means the fetch failed; the next call tries again.
    pub async fn load(&self) -> Option<Vec<Category>> {
        if let Some(categories) = self.cached() {
            return Some(categories);
        }

        match self.api.categories().await {
            Ok(categories) => {
                debug!(count = categories.len(), "Categories loaded");
                if let Ok(mut guard) = self.cached.write() {
                    *guard = Some(categories.clone());
                }
                Some(categories)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load categories");
                self.notifier.notify(Notification::error(
                    "fetchCategories-error-toast",
                    "Error fetching categories list from database.",
                ));
                None
            }
        }
    }

    /// Categories already loaded
    #[must_use]
    pub fn cached(&self) -> Option<Vec<Category>> {
        self.cached.read().ok().and_then(|g| g.clone())
    }

    /// Look up a loaded category by id
    #[must_use]
    pub fn find(&self, id: i64) -> Option<Category> {
        self.cached()?.into_iter().find(|c| c.id == id)
    }

    /// Forget the loaded categories
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.cached.write() {
            *guard = None;
        }
    }
}

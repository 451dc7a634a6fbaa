//! Start-up check of the restaurant collections.
//!
//! Reads every collection once through the API so that an unreachable
//! database or an undecodable stored document is reported before the
//! HTTP layer starts taking requests.

use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::StartupError;
use restaurant_api_repository::RestaurantApi;

/// What the start-up check found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub menu_items: usize,
    pub event_items: usize,
    pub reviews: usize,
    /// Names of the registered credential plugins.
    pub auth_plugins: Vec<String>,
}

/// Runs the start-up check against a `RestaurantApi`.
pub struct StartupCheck {
    api: Arc<dyn RestaurantApi>,
}

impl StartupCheck {
    /// Create a new check over `api`.
    pub fn new(api: Arc<dyn RestaurantApi>) -> Self {
        Self { api }
    }

    /// Read and decode every menu item, event and review.
    ///
    /// # Returns
    ///
    /// * `Ok(StartupReport)` - Counts of the decoded records
    /// * `Err(StartupError::StoreError)` - If a read fails or a stored
    ///   document does not decode
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<StartupReport, StartupError> {
        let menu_items = self.api.get_menu_items().await.map_err(|e| {
            error!(error = %e, "Could not read menu items");
            e
        })?;

        let event_items = self.api.get_event_items().await.map_err(|e| {
            error!(error = %e, "Could not read events");
            e
        })?;

        let reviews = self.api.get_reviews().await.map_err(|e| {
            error!(error = %e, "Could not read reviews");
            e
        })?;

        let report = StartupReport {
            menu_items: menu_items.len(),
            event_items: event_items.len(),
            reviews: reviews.len(),
            auth_plugins: self
                .api
                .credentials()
                .plugins()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        info!(
            menu_items = report.menu_items,
            event_items = report.event_items,
            reviews = report.reviews,
            auth_plugins = ?report.auth_plugins,
            "Start-up check passed"
        );

        Ok(report)
    }
}

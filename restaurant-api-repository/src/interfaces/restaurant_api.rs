//! Restaurant API trait definition.
//!
//! The capability interface the HTTP layer calls into. Every operation takes
//! explicit typed arguments and resolves exactly once to a `Result`.

use async_trait::async_trait;
use restaurant_api_shared::{EventItem, MenuItem, ReviewItem};

use crate::auth::Credentials;
use crate::errors::ApiError;
use crate::types::{EventEdit, MenuItemEdit, NewEvent, NewMenuItem, NewReview, ReviewEdit};

/// Data-access contract over the menu item, event and review collections.
///
/// Identifiers are the database's `ObjectId`s as hex strings. An identifier
/// that does not parse, or that matches no document, fails with
/// `ApiError::DatabaseError`. A stored document that does not decode fails
/// with `ApiError::ParseError`.
#[async_trait]
pub trait RestaurantApi: Send + Sync {
    /// Credential plugins used by the HTTP layer to guard JWT protected routes.
    fn credentials(&self) -> &Credentials;

    // Menu items

    /// Return every menu item.
    async fn get_menu_items(&self) -> Result<Vec<MenuItem>, ApiError>;

    /// Return the menu item stored under `id`.
    async fn get_menu_item(&self, id: &str) -> Result<MenuItem, ApiError>;

    /// Insert a new menu item, stamping its date, and return it with the
    /// identifier the database assigned.
    async fn add_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, ApiError>;

    /// Overlay the `Some` fields of `edit` on the stored item, re-stamp the
    /// date and replace the stored document.
    ///
    /// If the item is deleted between the load and the replace, the edit
    /// fails with `ApiError::DatabaseError` and nothing is written.
    async fn edit_menu_item(&self, edit: MenuItemEdit) -> Result<MenuItem, ApiError>;

    /// Delete the menu item stored under `id`.
    async fn delete_menu_item(&self, id: &str) -> Result<(), ApiError>;

    /// Delete every menu item.
    async fn clear_menu_items(&self) -> Result<(), ApiError>;

    /// Return the menu items of one type, or of one sub-type.
    ///
    /// When `sub_type` is `Some`, only the sub-type is matched and
    /// `item_type` is ignored entirely; the two are never combined.
    async fn get_items_by_type(
        &self,
        item_type: &str,
        sub_type: Option<&str>,
    ) -> Result<Vec<MenuItem>, ApiError>;

    /// Count the menu items.
    async fn count_menu_items(&self) -> Result<u64, ApiError>;

    // Events

    /// Return every event.
    async fn get_event_items(&self) -> Result<Vec<EventItem>, ApiError>;

    /// Return the event stored under `id`.
    async fn get_event_item(&self, id: &str) -> Result<EventItem, ApiError>;

    /// Insert a new event. Empty required fields fail with
    /// `ApiError::ParseError` before the database is touched.
    async fn add_event(&self, event: NewEvent) -> Result<EventItem, ApiError>;

    /// Overlay the `Some` fields of `edit` on the stored event and re-stamp it.
    async fn edit_event(&self, edit: EventEdit) -> Result<EventItem, ApiError>;

    /// Delete the event stored under `id`.
    async fn delete_event(&self, id: &str) -> Result<(), ApiError>;

    /// Count the events.
    async fn count_event_items(&self) -> Result<u64, ApiError>;

    /// Delete every event.
    async fn clear_event_items(&self) -> Result<(), ApiError>;

    // Reviews

    /// Return every review, newest first.
    async fn get_reviews(&self) -> Result<Vec<ReviewItem>, ApiError>;

    /// Return the reviews of one menu item or event, newest first.
    async fn get_all_reviews_for_item(&self, parent_id: &str)
        -> Result<Vec<ReviewItem>, ApiError>;

    /// Return the review stored under `id`.
    async fn get_review_by_id(&self, id: &str) -> Result<ReviewItem, ApiError>;

    /// Insert a new review, stamping its post date.
    async fn add_review(&self, review: NewReview) -> Result<ReviewItem, ApiError>;

    /// Overlay the `Some` fields of `edit` on the stored review and re-stamp
    /// its post date. Author and parent are kept.
    async fn edit_review(&self, edit: ReviewEdit) -> Result<ReviewItem, ApiError>;

    /// Delete the review stored under `id`.
    async fn delete_review(&self, id: &str) -> Result<(), ApiError>;

    /// Count the reviews of one menu item or event.
    async fn count_reviews(&self, parent_id: &str) -> Result<u64, ApiError>;

    /// Delete every review.
    async fn clear_reviews(&self) -> Result<(), ApiError>;
}

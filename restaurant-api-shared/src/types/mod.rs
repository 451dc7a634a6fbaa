//! This module defines the entity types returned by the restaurant API.
//! It re-exports `MenuItem`, `EventItem` and `ReviewItem`.

pub mod event_item;
pub mod menu_item;
pub mod review_item;

pub use event_item::EventItem;
pub use menu_item::MenuItem;
pub use review_item::ReviewItem;

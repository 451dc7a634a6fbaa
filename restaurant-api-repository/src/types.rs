//! Request types for restaurant API operations.

/// Request to add a menu item. The identifier and date are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    /// Menu section, e.g. "Entree".
    pub item_type: String,
    /// Finer grouping inside the section, e.g. "Pasta".
    pub sub_type: String,
    /// Display name.
    pub name: String,
    /// Price.
    pub price: f64,
    /// Image location.
    pub img_url: String,
}

/// Request to edit a stored menu item.
///
/// Only fields that are `Some` change; fields that are `None` keep the value
/// currently stored. The date is always re-stamped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItemEdit {
    /// Identifier of the item to edit.
    pub id: String,
    pub item_type: Option<String>,
    pub sub_type: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub img_url: Option<String>,
}

impl MenuItemEdit {
    /// Create an edit for `id` that changes nothing but the date.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Request to add an event. All three fields must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    /// When the event takes place.
    pub event_date: String,
    pub event_description: String,
}

/// Request to edit a stored event. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventEdit {
    pub id: String,
    pub name: Option<String>,
    pub event_date: Option<String>,
    pub event_description: Option<String>,
}

impl EventEdit {
    /// Create an edit for `id` that changes nothing but the date.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Request to add a review to a menu item or event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    /// Identifier of the reviewed menu item or event.
    pub parent_id: String,
    pub user_id: String,
    pub review_title: String,
    pub review_content: String,
    pub rating: i64,
}

/// Request to edit a stored review.
///
/// The author and the reviewed item cannot change; they are carried over
/// from the stored document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewEdit {
    pub id: String,
    pub review_title: Option<String>,
    pub review_content: Option<String>,
    pub rating: Option<i64>,
}

impl ReviewEdit {
    /// Create an edit for `id` that changes nothing but the post date.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

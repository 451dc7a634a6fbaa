//! Menu item entity.

use serde::{Deserialize, Serialize};

/// A dish or drink on the restaurant menu.
///
/// `date` is the formatted "last modified" stamp written on every insert and
/// edit, not a structured timestamp.
///
/// # Fields
///
/// - `id`: Database-assigned identifier, as a hex string
/// - `name`: Display name
/// - `price`: Price in the restaurant's currency
/// - `item_type`: Menu section (e.g. "Entree"), serialized as `type`
/// - `sub_type`: Finer grouping inside the section (e.g. "Pasta")
/// - `img_url`: Image location
/// - `date`: Last modified stamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub item_type: String,
    pub sub_type: String,
    pub img_url: String,
    pub date: String,
}

impl MenuItem {
    /// Returns `true` if both items carry the same content, ignoring the
    /// identifier and the modification stamp.
    pub fn same_content(&self, other: &MenuItem) -> bool {
        self.name == other.name
            && self.price == other.price
            && self.item_type == other.item_type
            && self.sub_type == other.sub_type
            && self.img_url == other.img_url
    }
}

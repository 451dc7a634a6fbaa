//! Mapping between stored documents and entity types.
//!
//! Decoding is strict: every field an entity needs must be present with the
//! expected type, otherwise the whole record is rejected with a parse error.
//! No field is ever filled with a default.

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Bson, DateTime as BsonDateTime, Document};
use restaurant_api_shared::{EventItem, MenuItem, ReviewItem};

use crate::errors::ApiError;

pub const MENU_ITEMS: &str = "menu_items";
pub const EVENT_ITEMS: &str = "event_items";
pub const REVIEWS: &str = "reviews";

pub const ID: &str = "_id";
pub const DATE: &str = "date";

pub const ITEM_NAME: &str = "itemname";
pub const ITEM_PRICE: &str = "itemprice";
pub const ITEM_TYPE: &str = "itemtype";
pub const ITEM_SUB_TYPE: &str = "itemsubtype";
pub const IMG_URL: &str = "imgurl";

pub const EVENT_NAME: &str = "eventname";
pub const EVENT_DATE: &str = "eventdate";
pub const EVENT_DESCRIPTION: &str = "eventdescription";

pub const PARENT_ID: &str = "parentid";
pub const USER_ID: &str = "userid";
pub const REVIEW_TITLE: &str = "reviewtitle";
pub const REVIEW_CONTENT: &str = "reviewcontent";
pub const RATING: &str = "rating";

fn missing(field: &str) -> ApiError {
    ApiError::parse(format!("Missing or mistyped field '{}'", field))
}

fn required_str(document: &Document, field: &str) -> Result<String, ApiError> {
    document
        .get_str(field)
        .map(str::to_string)
        .map_err(|_| missing(field))
}

fn required_f64(document: &Document, field: &str) -> Result<f64, ApiError> {
    match document.get(field) {
        Some(Bson::Double(value)) => Ok(*value),
        Some(Bson::Int32(value)) => Ok(f64::from(*value)),
        Some(Bson::Int64(value)) => Ok(*value as f64),
        _ => Err(missing(field)),
    }
}

fn required_i64(document: &Document, field: &str) -> Result<i64, ApiError> {
    match document.get(field) {
        Some(Bson::Int32(value)) => Ok(i64::from(*value)),
        Some(Bson::Int64(value)) => Ok(*value),
        _ => Err(missing(field)),
    }
}

fn required_datetime(document: &Document, field: &str) -> Result<DateTime<Utc>, ApiError> {
    let stamp = document.get_datetime(field).map_err(|_| missing(field))?;
    from_bson_datetime(*stamp).ok_or_else(|| missing(field))
}

fn required_id(document: &Document) -> Result<String, ApiError> {
    document
        .get_object_id(ID)
        .map(|id| id.to_hex())
        .map_err(|_| missing(ID))
}

/// Convert a chrono timestamp into a BSON datetime (millisecond precision).
pub fn to_bson_datetime(value: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(value.timestamp_millis())
}

/// Convert a BSON datetime back into a chrono timestamp.
pub fn from_bson_datetime(value: BsonDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value.timestamp_millis())
}

/// Drop sub-millisecond precision so a timestamp survives a store round trip
/// unchanged.
pub fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    from_bson_datetime(to_bson_datetime(value)).unwrap_or(value)
}

// ---------------------------------------------------------------------------
// Menu items
// ---------------------------------------------------------------------------

/// Stored fields of a menu item, without its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemFields {
    pub name: String,
    pub price: f64,
    pub item_type: String,
    pub sub_type: String,
    pub img_url: String,
}

impl MenuItemFields {
    pub fn from_document(document: &Document) -> Result<Self, ApiError> {
        Ok(Self {
            name: required_str(document, ITEM_NAME)?,
            price: required_f64(document, ITEM_PRICE)?,
            item_type: required_str(document, ITEM_TYPE)?,
            sub_type: required_str(document, ITEM_SUB_TYPE)?,
            img_url: required_str(document, IMG_URL)?,
        })
    }

    pub fn to_document(&self, date: &str) -> Document {
        doc! {
            ITEM_TYPE: self.item_type.as_str(),
            ITEM_SUB_TYPE: self.sub_type.as_str(),
            ITEM_NAME: self.name.as_str(),
            ITEM_PRICE: self.price,
            IMG_URL: self.img_url.as_str(),
            DATE: date,
        }
    }

    pub fn into_item(self, id: String, date: String) -> MenuItem {
        MenuItem {
            id,
            name: self.name,
            price: self.price,
            item_type: self.item_type,
            sub_type: self.sub_type,
            img_url: self.img_url,
            date,
        }
    }
}

/// Decode a full menu item record, including `_id` and `date`.
pub fn menu_item_from_document(document: &Document) -> Result<MenuItem, ApiError> {
    let id = required_id(document)?;
    let date = required_str(document, DATE)?;
    Ok(MenuItemFields::from_document(document)?.into_item(id, date))
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Stored fields of an event, without its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub name: String,
    pub event_date: String,
    pub event_description: String,
}

impl EventFields {
    pub fn from_document(document: &Document) -> Result<Self, ApiError> {
        Ok(Self {
            name: required_str(document, EVENT_NAME)?,
            event_date: required_str(document, EVENT_DATE)?,
            event_description: required_str(document, EVENT_DESCRIPTION)?,
        })
    }

    pub fn to_document(&self, date: &str) -> Document {
        doc! {
            EVENT_NAME: self.name.as_str(),
            EVENT_DATE: self.event_date.as_str(),
            DATE: date,
            EVENT_DESCRIPTION: self.event_description.as_str(),
        }
    }

    pub fn into_item(self, id: String, date: String) -> EventItem {
        EventItem {
            id,
            name: self.name,
            event_date: self.event_date,
            date,
            event_description: self.event_description,
        }
    }
}

/// Decode a full event record, including `_id` and `date`.
pub fn event_item_from_document(document: &Document) -> Result<EventItem, ApiError> {
    let id = required_id(document)?;
    let date = required_str(document, DATE)?;
    Ok(EventFields::from_document(document)?.into_item(id, date))
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Stored fields of a review, without its identifier and post date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFields {
    pub parent_id: String,
    pub user_id: String,
    pub review_title: String,
    pub review_content: String,
    pub rating: i64,
}

impl ReviewFields {
    pub fn from_document(document: &Document) -> Result<Self, ApiError> {
        Ok(Self {
            parent_id: required_str(document, PARENT_ID)?,
            user_id: required_str(document, USER_ID)?,
            review_title: required_str(document, REVIEW_TITLE)?,
            review_content: required_str(document, REVIEW_CONTENT)?,
            rating: required_i64(document, RATING)?,
        })
    }

    pub fn to_document(&self, post_date: DateTime<Utc>) -> Document {
        doc! {
            PARENT_ID: self.parent_id.as_str(),
            USER_ID: self.user_id.as_str(),
            REVIEW_TITLE: self.review_title.as_str(),
            REVIEW_CONTENT: self.review_content.as_str(),
            RATING: self.rating,
            DATE: to_bson_datetime(post_date),
        }
    }

    pub fn into_item(self, review_id: String, post_date: DateTime<Utc>) -> ReviewItem {
        ReviewItem {
            review_id,
            user_id: self.user_id,
            review_title: self.review_title,
            review_content: self.review_content,
            post_date,
            rating: self.rating,
            parent_item: self.parent_id,
        }
    }
}

/// Decode a full review record, including `_id` and `date`.
pub fn review_item_from_document(document: &Document) -> Result<ReviewItem, ApiError> {
    let id = required_id(document)?;
    let post_date = required_datetime(document, DATE)?;
    Ok(ReviewFields::from_document(document)?.into_item(id, post_date))
}
